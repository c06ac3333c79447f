//! Order confirmation and the component SKU logging that observes it.
//!
//! [`OrderConfirmation`] is the seam: the order book implements it, and the
//! [`ConfirmationInterceptor`] wraps any implementation, adding the component
//! logging pass after a successful confirmation.

pub mod interceptor;
pub mod orders;

use std::collections::HashSet;

use packtrace_core::TenantId;
use packtrace_sales::{SalesOrder, SalesOrderId};

pub use interceptor::{ComponentLogSummary, ConfirmationInterceptor, SKU_LOG_TARGET};
pub use orders::{ConfirmationError, SalesOrderBook};

/// Confirms a batch of orders.
pub trait OrderConfirmation {
    type Output;
    type Error;

    fn confirm(&self, tenant_id: TenantId, order_ids: &[SalesOrderId]) -> Result<Self::Output, Self::Error>;
}

impl<C> OrderConfirmation for std::sync::Arc<C>
where
    C: OrderConfirmation + ?Sized,
{
    type Output = C::Output;
    type Error = C::Error;

    fn confirm(&self, tenant_id: TenantId, order_ids: &[SalesOrderId]) -> Result<Self::Output, Self::Error> {
        (**self).confirm(tenant_id, order_ids)
    }
}

/// Read access to orders (name and lines) after confirmation.
pub trait SalesOrderReader: Send + Sync {
    fn order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Option<SalesOrder>;
}

impl<R> SalesOrderReader for std::sync::Arc<R>
where
    R: SalesOrderReader + ?Sized,
{
    fn order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Option<SalesOrder> {
        (**self).order(tenant_id, order_id)
    }
}

/// Order ids in request order, repeats dropped.
pub(crate) fn distinct(order_ids: &[SalesOrderId]) -> Vec<SalesOrderId> {
    let mut seen = HashSet::with_capacity(order_ids.len());
    order_ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
