use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pharmacy_core::MedicineId;

use crate::method::ForecastMethod;

/// Method-specific inputs and fitted values behind a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastParameters {
    MovingAverage,
    Smoothing { alpha: f64 },
    Trend { slope: f64, intercept: f64, weeks_analyzed: usize },
    Weighted { days_weighted: usize },
}

/// Demand projection for one medicine (or the aggregate of all medicines).
///
/// This is a proposal for display or for the reorder recommender; it carries no
/// state and is never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// `None` means aggregated across every medicine.
    pub medicine_id: Option<MedicineId>,
    pub method: ForecastMethod,
    pub lookback_days: u32,
    pub total_quantity_sold: u64,
    pub historical_daily_rate: f64,
    /// Never negative.
    pub forecasted_quantity: f64,
    pub forecast_window_days: u32,
    pub parameters: ForecastParameters,
    /// Qualitative caveat, e.g. "low sample size".
    pub confidence_note: Option<String>,
}

impl ForecastResult {
    pub fn is_low_confidence(&self) -> bool {
        self.confidence_note.is_some()
    }
}

/// All four methods run against the same extracted history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastComparison {
    pub medicine_id: Option<MedicineId>,
    pub forecast_window_days: u32,
    pub methods: BTreeMap<ForecastMethod, ForecastResult>,
}

impl ForecastComparison {
    /// Mean forecasted quantity across the compared methods (0 when empty).
    pub fn average_forecast(&self) -> f64 {
        if self.methods.is_empty() {
            return 0.0;
        }
        self.methods.values().map(|r| r.forecasted_quantity).sum::<f64>() / self.methods.len() as f64
    }

    pub fn into_results(self) -> Vec<ForecastResult> {
        self.methods.into_values().collect()
    }
}

/// One method applied to every medicine of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub forecast_window_days: u32,
    pub method: ForecastMethod,
    pub forecasts: Vec<ForecastResult>,
}
