use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use pharmacy_core::{AnalyticsError, AnalyticsResult, MedicineId};
use pharmacy_sales::{MedicineRef, SaleRecord};

use crate::history::DemandHistory;
use crate::method::ForecastMethod;
use crate::model::{self, Projection};
use crate::result::{ForecastComparison, ForecastParameters, ForecastReport, ForecastResult};

/// Fewer observed days than this yields a "low sample size" note.
pub const MIN_CONFIDENT_DAYS: usize = 7;

/// Stateless demand forecaster.
///
/// Holds only tuning parameters; every call receives the sales history and an
/// explicit `now`, so forecasts are reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandForecaster {
    /// Trailing days of history to extract (must be > 0).
    lookback_days: u32,
    /// Exponential smoothing factor in (0, 1].
    alpha: f64,
}

impl Default for DemandForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl DemandForecaster {
    pub const DEFAULT_LOOKBACK_DAYS: u32 = 60;
    pub const DEFAULT_ALPHA: f64 = 0.3;

    pub fn new() -> Self {
        Self {
            lookback_days: Self::DEFAULT_LOOKBACK_DAYS,
            alpha: Self::DEFAULT_ALPHA,
        }
    }

    pub fn with_lookback_days(mut self, lookback_days: u32) -> Self {
        self.lookback_days = lookback_days;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.lookback_days == 0 {
            return Err(AnalyticsError::validation("lookback_days must be > 0"));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(AnalyticsError::validation(format!(
                "smoothing factor must be in (0, 1], got {}",
                self.alpha
            )));
        }
        Ok(())
    }

    /// Extract the history every method of a call will share.
    pub fn history(
        &self,
        sales: &[SaleRecord],
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
    ) -> DemandHistory {
        DemandHistory::extract(sales, medicine_id, now, self.lookback_days)
    }

    /// Forecast demand over `horizon_days` for one medicine (or all of them).
    pub fn forecast(
        &self,
        sales: &[SaleRecord],
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        horizon_days: u32,
        method: ForecastMethod,
    ) -> AnalyticsResult<ForecastResult> {
        self.validate()?;
        let history = self.history(sales, medicine_id, now);
        self.project(&history, horizon_days, method)
    }

    /// Same as [`Self::forecast`] with the method given by name.
    pub fn forecast_named(
        &self,
        sales: &[SaleRecord],
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        horizon_days: u32,
        method: &str,
    ) -> AnalyticsResult<ForecastResult> {
        let method: ForecastMethod = method.parse()?;
        self.forecast(sales, medicine_id, now, horizon_days, method)
    }

    /// Apply one method to an already-extracted history.
    pub fn project(
        &self,
        history: &DemandHistory,
        horizon_days: u32,
        method: ForecastMethod,
    ) -> AnalyticsResult<ForecastResult> {
        self.validate()?;

        let projection = if history.is_empty() {
            Projection {
                daily_rate: 0.0,
                forecasted_quantity: 0.0,
                parameters: self.empty_parameters(method),
                note: None,
            }
        } else {
            match method {
                ForecastMethod::MovingAverage => model::moving_average(history, horizon_days),
                ForecastMethod::ExponentialSmoothing => {
                    model::exponential_smoothing(history, horizon_days, self.alpha)
                }
                ForecastMethod::Trend => model::trend(history, horizon_days),
                ForecastMethod::WeightedMovingAverage => {
                    model::weighted_moving_average(history, horizon_days)
                }
            }
        };

        let note = confidence_note(history, projection.note);
        debug!(
            medicine_id = ?history.medicine_id(),
            method = %method,
            horizon_days,
            forecasted_quantity = projection.forecasted_quantity,
            low_confidence = note.is_some(),
            "demand forecast computed"
        );

        Ok(ForecastResult {
            medicine_id: history.medicine_id(),
            method,
            lookback_days: history.lookback_days(),
            total_quantity_sold: history.total_quantity(),
            historical_daily_rate: projection.daily_rate,
            forecasted_quantity: projection.forecasted_quantity,
            forecast_window_days: horizon_days,
            parameters: projection.parameters,
            confidence_note: note,
        })
    }

    /// Run all four methods over one shared history.
    pub fn compare(&self, history: &DemandHistory, horizon_days: u32) -> AnalyticsResult<ForecastComparison> {
        let mut methods = BTreeMap::new();
        for method in ForecastMethod::ALL {
            methods.insert(method, self.project(history, horizon_days, method)?);
        }
        Ok(ForecastComparison {
            medicine_id: history.medicine_id(),
            forecast_window_days: horizon_days,
            methods,
        })
    }

    /// Extract the history for `medicine_id` and compare all four methods on it.
    pub fn get_forecast_comparison(
        &self,
        sales: &[SaleRecord],
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        horizon_days: u32,
    ) -> AnalyticsResult<ForecastComparison> {
        self.validate()?;
        let history = self.history(sales, medicine_id, now);
        self.compare(&history, horizon_days)
    }

    /// Apply `method` to every medicine in `catalog`, in catalog order.
    pub fn forecast_catalog(
        &self,
        sales: &[SaleRecord],
        catalog: &[MedicineRef],
        now: DateTime<Utc>,
        horizon_days: u32,
        method: ForecastMethod,
    ) -> AnalyticsResult<ForecastReport> {
        let forecasts = catalog
            .iter()
            .map(|m| self.forecast(sales, Some(m.id), now, horizon_days, method))
            .collect::<AnalyticsResult<Vec<_>>>()?;

        Ok(ForecastReport {
            forecast_window_days: horizon_days,
            method,
            forecasts,
        })
    }

    fn empty_parameters(&self, method: ForecastMethod) -> ForecastParameters {
        match method {
            ForecastMethod::MovingAverage => ForecastParameters::MovingAverage,
            ForecastMethod::ExponentialSmoothing => ForecastParameters::Smoothing { alpha: self.alpha },
            ForecastMethod::Trend => ForecastParameters::Trend {
                slope: 0.0,
                intercept: 0.0,
                weeks_analyzed: 0,
            },
            ForecastMethod::WeightedMovingAverage => ForecastParameters::Weighted { days_weighted: 0 },
        }
    }
}

fn confidence_note(history: &DemandHistory, method_note: Option<String>) -> Option<String> {
    let sample_note = if history.is_empty() {
        Some(format!(
            "low confidence: no sales in the {}-day lookback, forecast is zero",
            history.lookback_days()
        ))
    } else if history.observed_days() < MIN_CONFIDENT_DAYS {
        Some(format!(
            "low sample size: {} day(s) with sales in the {}-day lookback",
            history.observed_days(),
            history.lookback_days()
        ))
    } else {
        None
    };

    match (sample_note, method_note) {
        (Some(a), Some(b)) => Some(format!("{a}; {b}")),
        (a, b) => a.or(b),
    }
}
