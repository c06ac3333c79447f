//! Bills of materials (manufacturing) domain module.
//!
//! Only the data the kit detection needs: BOM type, finished product and
//! component lines. Costing and routing are out of scope.

pub mod bom;

pub use bom::{BillOfMaterials, BomId, BomLine, BomType};
