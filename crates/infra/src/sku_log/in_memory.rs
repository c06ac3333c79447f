use std::sync::RwLock;

use chrono::Utc;

use packtrace_core::TenantId;
use packtrace_sales::{OrderLineId, SalesOrderId};

use super::query::{Pagination, SkuLogFilter, SkuLogPage, SkuLogQuery};
use super::{NewSkuLogEntry, SkuLogEntry, SkuLogStore, SkuLogStoreError};

/// In-memory audit table for tests/dev.
#[derive(Debug, Default)]
pub struct InMemorySkuLogStore {
    entries: RwLock<Vec<SkuLogEntry>>,
}

impl InMemorySkuLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record of a tenant, in append order.
    pub fn all(&self, tenant_id: TenantId) -> Result<Vec<SkuLogEntry>, SkuLogStoreError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SkuLogStoreError::Storage("sku log lock poisoned".to_string()))?;
        Ok(entries.iter().filter(|e| e.tenant_id == tenant_id).cloned().collect())
    }

    fn remove_where(&self, keep: impl Fn(&SkuLogEntry) -> bool) -> Result<u64, SkuLogStoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SkuLogStoreError::Storage("sku log lock poisoned".to_string()))?;
        let before = entries.len();
        entries.retain(|e| keep(e));
        Ok((before - entries.len()) as u64)
    }
}

impl SkuLogStore for InMemorySkuLogStore {
    fn append(&self, tenant_id: TenantId, entry: NewSkuLogEntry) -> Result<SkuLogEntry, SkuLogStoreError> {
        let stored = entry.into_entry(tenant_id, Utc::now());
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SkuLogStoreError::Storage("sku log lock poisoned".to_string()))?;
        entries.push(stored.clone());
        Ok(stored)
    }

    fn delete_for_order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<u64, SkuLogStoreError> {
        self.remove_where(|e| !(e.tenant_id == tenant_id && e.order_id == order_id))
    }

    fn delete_for_line(&self, tenant_id: TenantId, line_id: OrderLineId) -> Result<u64, SkuLogStoreError> {
        self.remove_where(|e| !(e.tenant_id == tenant_id && e.order_line_id == line_id))
    }
}

#[async_trait::async_trait]
impl SkuLogQuery for InMemorySkuLogStore {
    async fn query(
        &self,
        tenant_id: TenantId,
        filter: SkuLogFilter,
        pagination: Pagination,
    ) -> Result<SkuLogPage, SkuLogStoreError> {
        let mut matching: Vec<SkuLogEntry> = {
            let entries = self
                .entries
                .read()
                .map_err(|_| SkuLogStoreError::Storage("sku log lock poisoned".to_string()))?;
            entries
                .iter()
                .filter(|e| e.tenant_id == tenant_id && filter.matches(e))
                .cloned()
                .collect()
        };

        matching.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| a.id.0.as_uuid().cmp(b.id.0.as_uuid()))
        });

        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect();

        Ok(SkuLogPage::new(page, total, pagination))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packtrace_core::AggregateId;
    use packtrace_products::ProductId;

    fn record(order_id: SalesOrderId, line_id: OrderLineId, sku: &str) -> NewSkuLogEntry {
        NewSkuLogEntry {
            order_id,
            order_line_id: line_id,
            pack_product_id: ProductId::new(AggregateId::new()),
            component_product_id: ProductId::new(AggregateId::new()),
            sku: sku.to_string(),
            date: None,
        }
    }

    fn order() -> SalesOrderId {
        SalesOrderId::new(AggregateId::new())
    }

    fn line() -> OrderLineId {
        OrderLineId::new(AggregateId::new())
    }

    #[test]
    fn append_assigns_id_and_tenant() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();

        let a = store.append(tenant, record(order(), line(), "A")).unwrap();
        let b = store.append(tenant, record(order(), line(), "B")).unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.tenant_id, tenant);
        assert_eq!(store.all(tenant).unwrap().len(), 2);
        assert!(store.all(TenantId::new()).unwrap().is_empty());
    }

    #[test]
    fn delete_for_order_cascades_only_that_order() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();
        let (kept, dropped) = (order(), order());
        store.append(tenant, record(dropped, line(), "A")).unwrap();
        store.append(tenant, record(dropped, line(), "B")).unwrap();
        store.append(tenant, record(kept, line(), "C")).unwrap();

        assert_eq!(store.delete_for_order(TenantId::new(), dropped).unwrap(), 0);
        assert_eq!(store.delete_for_order(tenant, dropped).unwrap(), 2);

        let left = store.all(tenant).unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].order_id, kept);
    }

    #[test]
    fn delete_for_line_cascades_only_that_line() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();
        let so = order();
        let (l1, l2) = (line(), line());
        store.append(tenant, record(so, l1, "A")).unwrap();
        store.append(tenant, record(so, l2, "B")).unwrap();

        assert_eq!(store.delete_for_line(tenant, l1).unwrap(), 1);
        assert_eq!(store.all(tenant).unwrap()[0].order_line_id, l2);
    }

    #[test]
    fn poisoned_lock_is_a_storage_error() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();
        store.append(tenant, record(order(), line(), "A")).unwrap();

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.entries.write().unwrap();
            panic!("writer died");
        }));
        assert!(poisoned.is_err());

        assert!(matches!(store.all(tenant), Err(SkuLogStoreError::Storage(_))));
    }

    #[tokio::test]
    async fn for_line_reads_past_one_page() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();
        let (so, l) = (order(), line());
        let count = Pagination::MAX_LIMIT as usize + 25;
        for i in 0..count {
            store.append(tenant, record(so, l, &format!("SKU-{i}"))).unwrap();
        }
        store.append(tenant, record(so, line(), "OTHER")).unwrap();

        let entries = store.for_line(tenant, l).await.unwrap();
        assert_eq!(entries.len(), count);
        let distinct: std::collections::HashSet<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(distinct.len(), count);
    }

    #[tokio::test]
    async fn query_filters_and_paginates() {
        let store = InMemorySkuLogStore::new();
        let tenant = TenantId::new();
        let so = order();
        let l = line();
        for sku in ["A", "B", "C"] {
            store.append(tenant, record(so, l, sku)).unwrap();
        }
        store.append(tenant, record(order(), line(), "X")).unwrap();

        let first = store
            .query(tenant, SkuLogFilter::for_order(so), Pagination::new(Some(2), None))
            .await
            .unwrap();
        assert_eq!(first.total, 3);
        assert_eq!(first.entries.len(), 2);
        assert!(first.has_more);

        let rest = store
            .query(tenant, SkuLogFilter::for_order(so), Pagination::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(rest.entries.len(), 1);
        assert!(!rest.has_more);

        assert_eq!(store.for_line(tenant, l).await.unwrap().len(), 3);
        assert!(store.for_line(TenantId::new(), l).await.unwrap().is_empty());
    }
}
