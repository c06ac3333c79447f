use serde::{Deserialize, Serialize};

use crate::product::ProductId;

/// One line of a product pack, as exposed by the external pack module.
///
/// The pack module attaches these either to a variant or to its template.
/// A line may have lost its component (e.g. the component was archived), in
/// which case `product_id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackLine {
    pub product_id: Option<ProductId>,
    pub quantity: u32,
}

impl PackLine {
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
        }
    }

    /// A line with no component reference.
    pub fn detached(quantity: u32) -> Self {
        Self {
            product_id: None,
            quantity,
        }
    }
}
