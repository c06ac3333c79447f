//! Product catalog domain module.
//!
//! Products, their templates, the locally-defined component relation and the
//! pack lines exposed by the external pack module. Pure domain data (no IO).

pub mod pack;
pub mod product;

pub use pack::PackLine;
pub use product::{Product, ProductId, ProductTemplateId};
