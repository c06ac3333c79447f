use chrono::Utc;
use thiserror::Error;

use packtrace_core::{execute, Aggregate, DomainError, TenantId};
use packtrace_sales::{
    CancelOrder, ConfirmOrder, OrderConfirmed, OrderLineId, RemoveLine, SalesOrder, SalesOrderCommand,
    SalesOrderEvent, SalesOrderId, SalesOrderStatus,
};

use super::{distinct, OrderConfirmation, SalesOrderReader};
use crate::read_model::TenantStore;
use crate::sku_log::{SkuLogStore, SkuLogStoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("sales order {0} not found")]
    NotFound(SalesOrderId),

    #[error("sales order {order_id} rejected: {source}")]
    Rejected {
        order_id: SalesOrderId,
        #[source]
        source: DomainError,
    },

    #[error("sku log cascade failed: {0}")]
    Cascade(#[from] SkuLogStoreError),
}

impl ConfirmationError {
    fn from_domain(order_id: SalesOrderId, err: DomainError) -> Self {
        match err {
            DomainError::NotFound => ConfirmationError::NotFound(order_id),
            source => ConfirmationError::Rejected { order_id, source },
        }
    }
}

/// Order repository over a [`TenantStore`].
///
/// Commands go through the `SalesOrder` aggregate; the store only ever sees
/// states the aggregate accepted. Deletions cascade into the SKU audit table.
#[derive(Debug)]
pub struct SalesOrderBook<S> {
    store: S,
}

impl<S> SalesOrderBook<S>
where
    S: TenantStore<SalesOrderId, SalesOrder>,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Run one command against its order and store the result.
    pub fn execute(&self, command: SalesOrderCommand) -> Result<Vec<SalesOrderEvent>, ConfirmationError> {
        let tenant_id = command.tenant_id();
        let order_id = command.order_id();

        let mut order = self
            .store
            .get(tenant_id, &order_id)
            .unwrap_or_else(|| SalesOrder::empty(order_id));

        let events = execute(&mut order, &command).map_err(|e| ConfirmationError::from_domain(order_id, e))?;
        if !events.is_empty() {
            self.store.upsert(tenant_id, order_id, order);
        }
        Ok(events)
    }

    pub fn get(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Option<SalesOrder> {
        self.store.get(tenant_id, &order_id)
    }

    pub fn cancel(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<(), ConfirmationError> {
        self.execute(SalesOrderCommand::CancelOrder(CancelOrder {
            tenant_id,
            order_id,
            occurred_at: Utc::now(),
        }))
        .map(|_| ())
    }

    /// Remove a draft order line and its audit records.
    pub fn remove_line<L>(
        &self,
        tenant_id: TenantId,
        order_id: SalesOrderId,
        line_id: OrderLineId,
        sku_logs: &L,
    ) -> Result<u64, ConfirmationError>
    where
        L: SkuLogStore + ?Sized,
    {
        let mut order = self
            .store
            .get(tenant_id, &order_id)
            .ok_or(ConfirmationError::NotFound(order_id))?;
        let command = SalesOrderCommand::RemoveLine(RemoveLine {
            tenant_id,
            order_id,
            line_id,
            occurred_at: Utc::now(),
        });

        let events = order
            .handle(&command)
            .map_err(|e| ConfirmationError::from_domain(order_id, e))?;
        let removed = sku_logs.delete_for_line(tenant_id, line_id)?;

        for event in &events {
            order.apply(event);
        }
        self.store.upsert(tenant_id, order_id, order);
        Ok(removed)
    }

    /// Delete a draft or cancelled order together with its audit records.
    ///
    /// Confirmed orders must be cancelled first. Returns the number of audit
    /// records removed.
    pub fn delete_order<L>(
        &self,
        tenant_id: TenantId,
        order_id: SalesOrderId,
        sku_logs: &L,
    ) -> Result<u64, ConfirmationError>
    where
        L: SkuLogStore + ?Sized,
    {
        let order = self
            .store
            .get(tenant_id, &order_id)
            .ok_or(ConfirmationError::NotFound(order_id))?;

        if order.status() == SalesOrderStatus::Confirmed {
            return Err(ConfirmationError::Rejected {
                order_id,
                source: DomainError::conflict("confirmed orders must be cancelled before deletion"),
            });
        }

        let removed = sku_logs.delete_for_order(tenant_id, order_id)?;
        self.store.remove(tenant_id, &order_id);

        tracing::debug!(order_id = %order_id, sku_logs_removed = removed, "sales order deleted");
        Ok(removed)
    }
}

impl<S> OrderConfirmation for SalesOrderBook<S>
where
    S: TenantStore<SalesOrderId, SalesOrder>,
{
    type Output = Vec<OrderConfirmed>;
    type Error = ConfirmationError;

    /// All-or-nothing: if any order is rejected, none is stored as confirmed.
    fn confirm(&self, tenant_id: TenantId, order_ids: &[SalesOrderId]) -> Result<Self::Output, Self::Error> {
        let occurred_at = Utc::now();
        let mut staged = Vec::new();
        let mut confirmed = Vec::new();

        for order_id in distinct(order_ids) {
            let mut order = self
                .store
                .get(tenant_id, &order_id)
                .ok_or(ConfirmationError::NotFound(order_id))?;

            let command = SalesOrderCommand::ConfirmOrder(ConfirmOrder {
                tenant_id,
                order_id,
                occurred_at,
            });
            let events = execute(&mut order, &command).map_err(|e| ConfirmationError::from_domain(order_id, e))?;

            confirmed.extend(events.into_iter().filter_map(|ev| match ev {
                SalesOrderEvent::OrderConfirmed(c) => Some(c),
                _ => None,
            }));
            staged.push(order);
        }

        for order in staged {
            self.store.upsert(tenant_id, order.id_typed(), order);
        }
        Ok(confirmed)
    }
}

impl<S> SalesOrderReader for SalesOrderBook<S>
where
    S: TenantStore<SalesOrderId, SalesOrder>,
{
    fn order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Option<SalesOrder> {
        self.get(tenant_id, order_id)
    }
}
