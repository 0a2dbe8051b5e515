//! Engine configuration.
//!
//! Loading order (later wins):
//! 1. Defaults in code
//! 2. Optional file (`PHARMACY_CONFIG`, default `config/analytics`)
//! 3. Environment variables with the `PHARMACY__` prefix and `__` separator

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use pharmacy_core::AnalyticsResult;
use pharmacy_forecast::DemandForecaster;
use pharmacy_inventory::ReorderRecommender;
use pharmacy_observability::LogConfig;

const DEFAULT_CONFIG_PATH: &str = "config/analytics";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub dashboard: DashboardConfig,
    pub movement: MovementConfig,
    pub forecast: ForecastConfig,
    pub reorder: ReorderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Length of the reporting window ending at "now".
    pub window_days: u32,
    /// Trailing days covered by the daily trend series.
    pub daily_trend_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub fast_lookback_days: u32,
    pub fast_limit: usize,
    pub slow_lookback_days: u32,
    pub slow_threshold: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub lookback_days: u32,
    pub horizon_days: u32,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReorderConfig {
    pub safety_factor: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dashboard: DashboardConfig::default(),
            movement: MovementConfig::default(),
            forecast: ForecastConfig::default(),
            reorder: ReorderConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            window_days: 30,
            daily_trend_days: 7,
        }
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            fast_lookback_days: 30,
            fast_limit: 10,
            slow_lookback_days: 90,
            slow_threshold: pharmacy_analytics::DEFAULT_SLOW_MOVING_THRESHOLD,
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lookback_days: DemandForecaster::DEFAULT_LOOKBACK_DAYS,
            horizon_days: 30,
            alpha: DemandForecaster::DEFAULT_ALPHA,
        }
    }
}

impl Default for ReorderConfig {
    fn default() -> Self {
        Self {
            safety_factor: ReorderRecommender::DEFAULT_SAFETY_FACTOR,
        }
    }
}

impl EngineConfig {
    /// Load from the file named by `PHARMACY_CONFIG` (if any) plus environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("PHARMACY_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::load_from(&path)
    }

    /// Load from `path` (extension optional, missing file allowed) plus environment overrides.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("PHARMACY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Forecaster tuned from the `forecast` section.
    pub fn forecaster(&self) -> AnalyticsResult<DemandForecaster> {
        let forecaster = DemandForecaster::new()
            .with_lookback_days(self.forecast.lookback_days)
            .with_alpha(self.forecast.alpha);
        forecaster.validate()?;
        Ok(forecaster)
    }

    /// Recommender tuned from the `reorder` section.
    pub fn recommender(&self) -> AnalyticsResult<ReorderRecommender> {
        ReorderRecommender::new(self.reorder.safety_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use pharmacy_core::AnalyticsError;
    use pharmacy_observability::LogFormat;

    fn from_toml(toml: &str) -> EngineConfig {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = EngineConfig::load_from("does/not/exist").unwrap();
        assert_eq!(cfg.forecast.lookback_days, 60);
        assert_eq!(cfg.movement.slow_threshold, 5);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = from_toml(
            r#"
            [forecast]
            alpha = 0.5

            [log]
            format = "compact"
            "#,
        );
        assert_eq!(cfg.forecast.alpha, 0.5);
        assert_eq!(cfg.forecast.horizon_days, 30);
        assert_eq!(cfg.movement, MovementConfig::default());
        assert_eq!(cfg.log.format, LogFormat::Compact);
    }

    #[test]
    fn invalid_tuning_surfaces_as_validation_error() {
        let cfg = from_toml("[forecast]\nalpha = 1.5\n");
        assert!(matches!(cfg.forecaster(), Err(AnalyticsError::Validation(_))));

        let cfg = from_toml("[reorder]\nsafety_factor = -1.0\n");
        assert!(matches!(cfg.recommender(), Err(AnalyticsError::Validation(_))));
    }

    #[test]
    fn shipped_config_file_matches_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/analytics.toml");
        let cfg = EngineConfig::load_from(path).unwrap();
        assert_eq!(cfg.dashboard, DashboardConfig::default());
        assert_eq!(cfg.forecast, ForecastConfig::default());
    }
}
