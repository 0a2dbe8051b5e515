//! Inventory-side analytics: restock recommendations and turnover.
//!
//! Stock levels are supplied fresh by the caller at recommendation time; this
//! crate never mutates them and never persists what it proposes.

pub mod reorder;
pub mod snapshot;
pub mod turnover;

pub use reorder::{
    priority_for, ForecastBasis, MethodForecast, ReorderPriority, ReorderRecommendation,
    ReorderRecommender, ReorderStatus,
};
pub use snapshot::InventorySnapshot;
pub use turnover::{inventory_turnover, InventoryTurnover};
