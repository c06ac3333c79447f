use packtrace_core::TenantId;
use packtrace_products::{PackLine, ProductId, ProductTemplateId};

use super::SourceError;
use crate::read_model::{InMemoryTenantStore, TenantStore};

/// Read contract of the external pack module.
///
/// `Ok(None)` means the product (or template) carries no pack relation at
/// all, which is different from a pack relation with zero lines.
pub trait PackSource: Send + Sync {
    fn variant_pack_lines(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Vec<PackLine>>, SourceError>;

    fn template_pack_lines(
        &self,
        tenant_id: TenantId,
        template_id: ProductTemplateId,
    ) -> Result<Option<Vec<PackLine>>, SourceError>;
}

/// In-memory pack module for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryPackSource {
    variants: InMemoryTenantStore<ProductId, Vec<PackLine>>,
    templates: InMemoryTenantStore<ProductTemplateId, Vec<PackLine>>,
}

impl InMemoryPackSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variant_lines(&self, tenant_id: TenantId, product_id: ProductId, lines: Vec<PackLine>) {
        self.variants.upsert(tenant_id, product_id, lines);
    }

    pub fn set_template_lines(
        &self,
        tenant_id: TenantId,
        template_id: ProductTemplateId,
        lines: Vec<PackLine>,
    ) {
        self.templates.upsert(tenant_id, template_id, lines);
    }
}

impl PackSource for InMemoryPackSource {
    fn variant_pack_lines(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Vec<PackLine>>, SourceError> {
        Ok(self.variants.get(tenant_id, &product_id))
    }

    fn template_pack_lines(
        &self,
        tenant_id: TenantId,
        template_id: ProductTemplateId,
    ) -> Result<Option<Vec<PackLine>>, SourceError> {
        Ok(self.templates.get(tenant_id, &template_id))
    }
}
