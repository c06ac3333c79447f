//! Product catalog lookups used when resolving and logging kit components.

use packtrace_core::{Entity, TenantId};
use packtrace_products::{Product, ProductId};

use crate::read_model::TenantStore;

/// Read access to the product catalog.
pub trait ProductCatalog: Send + Sync {
    fn product(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product>;
}

impl<P> ProductCatalog for std::sync::Arc<P>
where
    P: ProductCatalog + ?Sized,
{
    fn product(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product> {
        (**self).product(tenant_id, product_id)
    }
}

/// Catalog backed by a [`TenantStore`].
#[derive(Debug)]
pub struct StoredProductCatalog<S> {
    store: S,
}

impl<S> StoredProductCatalog<S>
where
    S: TenantStore<ProductId, Product>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert or replace a product.
    pub fn register(&self, tenant_id: TenantId, product: Product) {
        self.store.upsert(tenant_id, *product.id(), product);
    }

    /// Change a product's SKU. Existing audit records keep the old value.
    pub fn set_default_code(&self, tenant_id: TenantId, product_id: ProductId, code: Option<String>) -> bool {
        match self.store.get(tenant_id, &product_id) {
            Some(mut product) => {
                product.set_default_code(code);
                self.store.upsert(tenant_id, product_id, product);
                true
            }
            None => false,
        }
    }

    pub fn list(&self, tenant_id: TenantId) -> Vec<Product> {
        self.store.list(tenant_id)
    }
}

impl<S> ProductCatalog for StoredProductCatalog<S>
where
    S: TenantStore<ProductId, Product>,
{
    fn product(&self, tenant_id: TenantId, product_id: ProductId) -> Option<Product> {
        self.store.get(tenant_id, &product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_model::InMemoryTenantStore;
    use packtrace_core::AggregateId;
    use packtrace_products::ProductTemplateId;

    #[test]
    fn register_then_update_code() {
        let catalog = StoredProductCatalog::new(InMemoryTenantStore::new());
        let tenant = TenantId::new();
        let id = ProductId::new(AggregateId::new());
        let template = ProductTemplateId::new(AggregateId::new());
        catalog.register(tenant, Product::new(id, template, "Bolt").with_default_code("B-1"));

        assert!(catalog.set_default_code(tenant, id, Some("B-2".to_string())));
        assert_eq!(catalog.product(tenant, id).unwrap().sku(), "B-2");

        assert!(catalog.product(TenantId::new(), id).is_none());
        assert!(!catalog.set_default_code(tenant, ProductId::new(AggregateId::new()), None));
    }
}
