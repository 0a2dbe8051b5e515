//! Sales facts consumed by the analytics engine.
//!
//! Point-of-sale transactions and the medicine catalog are owned by external
//! collaborators; this crate only describes their shape and the few invariants
//! the engine relies on (no IO, no storage).

pub mod catalog;
pub mod record;

pub use catalog::{CategoryRef, MedicineRef};
pub use record::{lines_within, SaleLineItem, SaleRecord};
