//! Permission-guarded read access to the SKU audit table.
//!
//! Reads need `sku_logs.read` and are scoped to the principal's active tenant.
//! Nothing here deletes records; they go away only when
//! [`SalesOrderBook`](crate::confirmation::SalesOrderBook) deletes their order
//! or removes their line.

use thiserror::Error;

use packtrace_auth::{authorize, AuthzError, Permission, Principal};

use crate::sku_log::{Pagination, SkuLogFilter, SkuLogPage, SkuLogQuery, SkuLogStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error(transparent)]
    Denied(#[from] AuthzError),

    #[error(transparent)]
    Store(#[from] SkuLogStoreError),
}

#[derive(Debug)]
pub struct SkuLogAccess<S> {
    store: S,
}

impl<S> SkuLogAccess<S>
where
    S: SkuLogQuery,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn list(
        &self,
        principal: &Principal,
        filter: SkuLogFilter,
        pagination: Pagination,
    ) -> Result<SkuLogPage, AccessError> {
        authorize(principal, &Permission::SKU_LOGS_READ)?;
        Ok(self
            .store
            .query(principal.active_tenant_id, filter, pagination)
            .await?)
    }
}
