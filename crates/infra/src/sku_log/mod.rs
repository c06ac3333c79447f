//! Component SKU audit table.
//!
//! One record per (order line × resolved component) written during a successful
//! order confirmation. Records are append-only: the trait has no update
//! operation. They disappear only when their order or order line is deleted.

pub mod in_memory;
pub mod postgres;
pub mod query;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use packtrace_core::{AggregateId, Entity, TenantId};
use packtrace_products::ProductId;
use packtrace_sales::{OrderLineId, SalesOrderId};

pub use in_memory::InMemorySkuLogStore;
pub use postgres::PostgresSkuLogStore;
pub use query::{Pagination, SkuLogFilter, SkuLogPage, SkuLogQuery};

/// Audit record identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuLogEntryId(pub AggregateId);

impl SkuLogEntryId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SkuLogEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A persisted component SKU record.
///
/// `sku` is a copy of the component's code at confirmation time (empty when the
/// component had none). Later catalog edits never reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuLogEntry {
    pub id: SkuLogEntryId,
    pub tenant_id: TenantId,
    pub date: DateTime<Utc>,
    pub order_id: SalesOrderId,
    pub order_line_id: OrderLineId,
    pub pack_product_id: ProductId,
    pub component_product_id: ProductId,
    pub sku: String,
}

impl Entity for SkuLogEntry {
    type Id = SkuLogEntryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Record to append. `date` defaults to the append time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSkuLogEntry {
    pub order_id: SalesOrderId,
    pub order_line_id: OrderLineId,
    pub pack_product_id: ProductId,
    pub component_product_id: ProductId,
    pub sku: String,
    pub date: Option<DateTime<Utc>>,
}

impl NewSkuLogEntry {
    pub fn into_entry(self, tenant_id: TenantId, now: DateTime<Utc>) -> SkuLogEntry {
        SkuLogEntry {
            id: SkuLogEntryId::new(AggregateId::new()),
            tenant_id,
            date: self.date.unwrap_or(now),
            order_id: self.order_id,
            order_line_id: self.order_line_id,
            pack_product_id: self.pack_product_id,
            component_product_id: self.component_product_id,
            sku: self.sku,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkuLogStoreError {
    #[error("sku log storage failure: {0}")]
    Storage(String),

    #[error("no async runtime available: {0}")]
    Runtime(String),

    #[error("corrupt sku log row: {0}")]
    Corrupt(String),
}

/// Append-only, tenant-scoped audit table.
pub trait SkuLogStore: Send + Sync {
    fn append(&self, tenant_id: TenantId, entry: NewSkuLogEntry) -> Result<SkuLogEntry, SkuLogStoreError>;

    /// Cascade for a deleted order. Returns the number of records removed.
    fn delete_for_order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<u64, SkuLogStoreError>;

    /// Cascade for a deleted order line. Returns the number of records removed.
    fn delete_for_line(&self, tenant_id: TenantId, line_id: OrderLineId) -> Result<u64, SkuLogStoreError>;
}

impl<S> SkuLogStore for std::sync::Arc<S>
where
    S: SkuLogStore + ?Sized,
{
    fn append(&self, tenant_id: TenantId, entry: NewSkuLogEntry) -> Result<SkuLogEntry, SkuLogStoreError> {
        (**self).append(tenant_id, entry)
    }

    fn delete_for_order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<u64, SkuLogStoreError> {
        (**self).delete_for_order(tenant_id, order_id)
    }

    fn delete_for_line(&self, tenant_id: TenantId, line_id: OrderLineId) -> Result<u64, SkuLogStoreError> {
        (**self).delete_for_line(tenant_id, line_id)
    }
}
