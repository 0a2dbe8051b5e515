//! Sales analytics over caller-supplied facts.
//!
//! Every function here is pure: it takes an immutable slice of sales and an
//! explicit window (or an explicit `now`), and returns freshly allocated
//! results. Empty input always yields zero/empty results, never an error.

pub mod category;
pub mod growth;
pub mod movement;
pub mod performance;
pub mod summary;
pub mod trend;

pub use category::{category_breakdown, CategoryBreakdown};
pub use growth::{growth, GrowthMetrics, PeriodTotals};
pub use movement::{
    fast_moving, slow_moving, top_performers, MedicineMovement, RankMetric,
    DEFAULT_SLOW_MOVING_THRESHOLD,
};
pub use performance::{medicine_performance, MedicinePerformance};
pub use summary::{summarize, SalesSummary};
pub use trend::{daily_trend, monthly_trend, peak_hours, weekday_breakdown, DailyTrend, MonthlyTrend, TrendBucket};

#[cfg(test)]
pub(crate) mod fixtures;
