//! `pharmacy-core`: shared building blocks for the analytics engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the half-open [`TimeWindow`], and the error taxonomy every other
//! crate reports through.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;
pub mod window;

pub use entity::Entity;
pub use error::{AnalyticsError, AnalyticsResult};
pub use id::{CategoryId, MedicineId, SaleId};
pub use value_object::ValueObject;
pub use window::TimeWindow;
