use packtrace_core::{Entity, TenantId};
use packtrace_mrp::{BillOfMaterials, BomId};
use packtrace_products::{ProductId, ProductTemplateId};

use super::SourceError;
use crate::read_model::TenantStore;

/// Query contract of the bills-of-materials subsystem.
///
/// Both lookups return phantom (kit) BOMs only.
pub trait BomSource: Send + Sync {
    /// Phantom BOMs whose finished variant is exactly `product_id`.
    fn phantom_boms_for_variant(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<BillOfMaterials>, SourceError>;

    /// Phantom BOMs defined on `template_id` without a specific variant.
    fn phantom_boms_for_template(
        &self,
        tenant_id: TenantId,
        template_id: ProductTemplateId,
    ) -> Result<Vec<BillOfMaterials>, SourceError>;
}

/// BOM source backed by a [`TenantStore`].
#[derive(Debug)]
pub struct StoredBomSource<S> {
    store: S,
}

impl<S> StoredBomSource<S>
where
    S: TenantStore<BomId, BillOfMaterials>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn register(&self, tenant_id: TenantId, bom: BillOfMaterials) {
        self.store.upsert(tenant_id, *bom.id(), bom);
    }

    pub fn remove(&self, tenant_id: TenantId, bom_id: BomId) -> Option<BillOfMaterials> {
        self.store.remove(tenant_id, &bom_id)
    }
}

impl<S> BomSource for StoredBomSource<S>
where
    S: TenantStore<BomId, BillOfMaterials>,
{
    fn phantom_boms_for_variant(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<BillOfMaterials>, SourceError> {
        Ok(self
            .store
            .list(tenant_id)
            .into_iter()
            .filter(|b| b.is_phantom() && b.is_variant_bom_for(product_id))
            .collect())
    }

    fn phantom_boms_for_template(
        &self,
        tenant_id: TenantId,
        template_id: ProductTemplateId,
    ) -> Result<Vec<BillOfMaterials>, SourceError> {
        Ok(self
            .store
            .list(tenant_id)
            .into_iter()
            .filter(|b| b.is_phantom() && b.is_template_bom_for(template_id))
            .collect())
    }
}
