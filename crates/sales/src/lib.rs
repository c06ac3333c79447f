//! Sales Orders domain module.
//!
//! Business rules for sales orders (create, add/remove lines, confirm, cancel),
//! implemented as deterministic domain logic (no IO, no storage).

pub mod order;

pub use order::{
    AddLine, CancelOrder, ConfirmOrder, CreateSalesOrder, LineAdded, LineRemoved, OrderCancelled,
    OrderConfirmed, OrderLine, OrderLineId, RemoveLine, SalesOrder, SalesOrderCommand, SalesOrderCreated,
    SalesOrderEvent, SalesOrderId, SalesOrderStatus,
};
