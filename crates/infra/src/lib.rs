//! Infrastructure layer: storage adapters, optional collaborators, the component
//! resolver, and the confirmation interceptor that writes the SKU audit table.

pub mod access;
pub mod catalog;
pub mod config;
pub mod confirmation;
pub mod read_model;
pub mod resolver;
pub mod sku_log;
pub mod sources;


pub use access::{AccessError, SkuLogAccess};
pub use catalog::{ProductCatalog, StoredProductCatalog};
pub use config::{ConfigError, PackTraceConfig};
pub use confirmation::{
    ComponentLogSummary, ConfirmationError, ConfirmationInterceptor, OrderConfirmation, SalesOrderBook,
    SalesOrderReader,
};
pub use resolver::{ComponentResolver, ComponentSet, Resolution};
