use serde::{Deserialize, Serialize};

use packtrace_core::{AggregateId, Entity};
use packtrace_products::{ProductId, ProductTemplateId};

/// Bill of materials identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BomId(pub AggregateId);

impl BomId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for BomId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// BOM type.
///
/// `Phantom` is a kit: the finished product is never built, its components
/// are delivered in its place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BomType {
    Normal,
    Phantom,
}

/// Component line of a BOM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomLine {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
}

impl BomLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
        }
    }
}

/// A bill of materials.
///
/// Always attached to a template. When `product_id` is set the BOM applies to
/// that variant only; otherwise it is shared by every variant of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillOfMaterials {
    pub id: BomId,
    pub product_template_id: ProductTemplateId,
    pub product_id: Option<ProductId>,
    pub bom_type: BomType,
    pub lines: Vec<BomLine>,
}

impl BillOfMaterials {
    /// Phantom BOM shared by all variants of `template`.
    pub fn phantom_for_template(template: ProductTemplateId, lines: Vec<BomLine>) -> Self {
        Self {
            id: BomId::new(AggregateId::new()),
            product_template_id: template,
            product_id: None,
            bom_type: BomType::Phantom,
            lines,
        }
    }

    /// Phantom BOM restricted to one variant.
    pub fn phantom_for_variant(
        template: ProductTemplateId,
        variant: ProductId,
        lines: Vec<BomLine>,
    ) -> Self {
        Self {
            product_id: Some(variant),
            ..Self::phantom_for_template(template, lines)
        }
    }

    pub fn with_type(mut self, bom_type: BomType) -> Self {
        self.bom_type = bom_type;
        self
    }

    pub fn is_phantom(&self) -> bool {
        self.bom_type == BomType::Phantom
    }

    /// True when this BOM names `product` as its finished variant.
    pub fn is_variant_bom_for(&self, product: ProductId) -> bool {
        self.product_id == Some(product)
    }

    /// True when this BOM is defined for `template` without a specific variant.
    pub fn is_template_bom_for(&self, template: ProductTemplateId) -> bool {
        self.product_template_id == template && self.product_id.is_none()
    }

    /// Component products, skipping lines without a product.
    pub fn component_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.lines.iter().filter_map(|l| l.product_id)
    }
}

impl Entity for BillOfMaterials {
    type Id = BomId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
