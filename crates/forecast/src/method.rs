use core::str::FromStr;

use serde::{Deserialize, Serialize};

use pharmacy_core::AnalyticsError;

/// Demand projection method.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ForecastMethod {
    /// Total quantity over the lookback spread evenly per day.
    #[default]
    #[serde(rename = "moving-average")]
    MovingAverage,
    /// Exponentially smoothed daily series; last smoothed value is the rate.
    #[serde(rename = "exponential")]
    ExponentialSmoothing,
    /// Least-squares line through weekly totals.
    #[serde(rename = "trend")]
    Trend,
    /// Daily quantities weighted linearly by recency.
    #[serde(rename = "weighted")]
    WeightedMovingAverage,
}

impl ForecastMethod {
    pub const ALL: [ForecastMethod; 4] = [
        ForecastMethod::MovingAverage,
        ForecastMethod::ExponentialSmoothing,
        ForecastMethod::Trend,
        ForecastMethod::WeightedMovingAverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::MovingAverage => "moving-average",
            ForecastMethod::ExponentialSmoothing => "exponential",
            ForecastMethod::Trend => "trend",
            ForecastMethod::WeightedMovingAverage => "weighted",
        }
    }
}

impl core::fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastMethod {
    type Err = AnalyticsError;

    /// Accepts the canonical names plus `sma` for the moving average.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "moving-average" | "sma" => Ok(ForecastMethod::MovingAverage),
            "exponential" => Ok(ForecastMethod::ExponentialSmoothing),
            "trend" => Ok(ForecastMethod::Trend),
            "weighted" => Ok(ForecastMethod::WeightedMovingAverage),
            _ => Err(AnalyticsError::unknown_method(s)),
        }
    }
}
