//! `pharmacy-forecast`
//!
//! **Responsibility:** per-medicine demand projection.
//!
//! - State-free: every call takes the sales history and an explicit `now`.
//! - Method-selectable: four interchangeable methods behind [`ForecastMethod`].
//! - Sparse history is the common case (new medicines), so it never errors:
//!   it degrades to a zero forecast carrying a confidence note.

pub mod forecaster;
pub mod history;
pub mod method;
pub mod model;
pub mod result;

pub use forecaster::DemandForecaster;
pub use history::DemandHistory;
pub use method::ForecastMethod;
pub use result::{ForecastComparison, ForecastParameters, ForecastReport, ForecastResult};
