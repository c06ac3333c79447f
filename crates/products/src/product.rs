use serde::{Deserialize, Serialize};

use packtrace_core::{AggregateId, Entity};

/// Product (variant) identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Product template identifier (shared by all variants of a product).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductTemplateId(pub AggregateId);

impl ProductTemplateId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductTemplateId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Catalog product (a sellable variant of a template).
///
/// `default_code` is the SKU. It is optional: many components carry no code,
/// and callers that need a string get `""` through [`Product::sku`].
///
/// `component_ids` is the locally-defined "pack components" relation. It is a
/// set: adding the same component twice keeps a single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    template_id: ProductTemplateId,
    name: String,
    default_code: Option<String>,
    component_ids: Vec<ProductId>,
}

impl Product {
    pub fn new(id: ProductId, template_id: ProductTemplateId, name: impl Into<String>) -> Self {
        Self {
            id,
            template_id,
            name: name.into(),
            default_code: None,
            component_ids: Vec::new(),
        }
    }

    pub fn with_default_code(mut self, code: impl Into<String>) -> Self {
        self.set_default_code(Some(code.into()));
        self
    }

    pub fn with_components(mut self, components: impl IntoIterator<Item = ProductId>) -> Self {
        for component in components {
            self.add_component(component);
        }
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn template_id(&self) -> ProductTemplateId {
        self.template_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_code(&self) -> Option<&str> {
        self.default_code.as_deref()
    }

    /// SKU as captured in audit records: the default code, or `""` when unset.
    pub fn sku(&self) -> &str {
        self.default_code().unwrap_or("")
    }

    /// `"[CODE] Name"` when the product has a code, `"Name"` otherwise.
    pub fn display_name(&self) -> String {
        match self.default_code() {
            Some(code) => format!("[{code}] {}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn component_ids(&self) -> &[ProductId] {
        &self.component_ids
    }

    /// Blank codes are stored as "no code".
    pub fn set_default_code(&mut self, code: Option<String>) {
        self.default_code = code.filter(|c| !c.trim().is_empty());
    }

    pub fn add_component(&mut self, component: ProductId) {
        if !self.component_ids.contains(&component) {
            self.component_ids.push(component);
        }
    }

    pub fn remove_component(&mut self, component: ProductId) {
        self.component_ids.retain(|c| *c != component);
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
