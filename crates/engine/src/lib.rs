//! `pharmacy-engine`: the analytics engine as collaborators see it.
//!
//! Wires configuration, the collaborator-facing source traits, and the
//! analytics/forecast/reorder crates into one facade. Still pure computation:
//! data comes in through [`source`] traits and results go back as values.

pub mod config;
pub mod engine;
pub mod source;

pub use config::EngineConfig;
pub use engine::{AnalyticsEngine, DashboardReport};
pub use source::{CatalogSource, InMemorySource, SalesSource};
