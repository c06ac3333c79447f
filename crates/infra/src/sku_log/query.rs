//! Read-only query surface over the SKU audit table.
//!
//! All queries are tenant-scoped and paginated by default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use packtrace_core::TenantId;
use packtrace_products::ProductId;
use packtrace_sales::{OrderLineId, SalesOrderId};

use super::{SkuLogEntry, SkuLogStoreError};

/// Pagination parameters for audit queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { limit: 50, offset: 0 }
    }
}

impl Pagination {
    pub const MAX_LIMIT: u32 = 1000;

    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(50).min(Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

/// Filter criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuLogFilter {
    pub order_id: Option<SalesOrderId>,
    pub order_line_id: Option<OrderLineId>,
    pub pack_product_id: Option<ProductId>,
    pub component_product_id: Option<ProductId>,
    /// Inclusive lower bound on `date`.
    pub recorded_after: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `date`.
    pub recorded_before: Option<DateTime<Utc>>,
}

impl SkuLogFilter {
    pub fn for_order(order_id: SalesOrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, entry: &SkuLogEntry) -> bool {
        self.order_id.is_none_or(|id| id == entry.order_id)
            && self.order_line_id.is_none_or(|id| id == entry.order_line_id)
            && self.pack_product_id.is_none_or(|id| id == entry.pack_product_id)
            && self
                .component_product_id
                .is_none_or(|id| id == entry.component_product_id)
            && self.recorded_after.is_none_or(|t| entry.date >= t)
            && self.recorded_before.is_none_or(|t| entry.date <= t)
    }
}

/// One page of audit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuLogPage {
    pub entries: Vec<SkuLogEntry>,
    /// Total number of records matching the filter (across all pages).
    pub total: u64,
    pub pagination: Pagination,
    pub has_more: bool,
}

impl SkuLogPage {
    pub fn new(entries: Vec<SkuLogEntry>, total: u64, pagination: Pagination) -> Self {
        let has_more = total > u64::from(pagination.offset) + u64::from(pagination.limit);
        Self {
            entries,
            total,
            pagination,
            has_more,
        }
    }
}

/// Async query interface over the audit table.
///
/// Results are ordered by `date` descending, then by record id.
#[async_trait::async_trait]
pub trait SkuLogQuery: Send + Sync {
    async fn query(
        &self,
        tenant_id: TenantId,
        filter: SkuLogFilter,
        pagination: Pagination,
    ) -> Result<SkuLogPage, SkuLogStoreError>;

    /// Every record for one order line, fetched page by page.
    async fn for_line(
        &self,
        tenant_id: TenantId,
        line_id: OrderLineId,
    ) -> Result<Vec<SkuLogEntry>, SkuLogStoreError> {
        let filter = SkuLogFilter {
            order_line_id: Some(line_id),
            ..Default::default()
        };
        let mut pagination = Pagination::new(Some(Pagination::MAX_LIMIT), None);
        let mut entries = Vec::new();
        loop {
            let page = self.query(tenant_id, filter.clone(), pagination).await?;
            let fetched = page.entries.len();
            entries.extend(page.entries);
            if !page.has_more || fetched == 0 {
                return Ok(entries);
            }
            pagination.offset = pagination.offset.saturating_add(pagination.limit);
        }
    }
}

#[async_trait::async_trait]
impl<Q> SkuLogQuery for std::sync::Arc<Q>
where
    Q: SkuLogQuery + ?Sized,
{
    async fn query(
        &self,
        tenant_id: TenantId,
        filter: SkuLogFilter,
        pagination: Pagination,
    ) -> Result<SkuLogPage, SkuLogStoreError> {
        (**self).query(tenant_id, filter, pagination).await
    }
}
