use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pharmacy_analytics::{
    category_breakdown, daily_trend, fast_moving, growth, medicine_performance, monthly_trend,
    peak_hours, slow_moving, summarize, weekday_breakdown, CategoryBreakdown, DailyTrend,
    GrowthMetrics, MedicineMovement, MedicinePerformance, MonthlyTrend, SalesSummary, TrendBucket,
};
use pharmacy_core::{AnalyticsError, AnalyticsResult, MedicineId, TimeWindow};
use pharmacy_forecast::{DemandForecaster, ForecastComparison, ForecastMethod, ForecastReport, ForecastResult};
use pharmacy_inventory::{inventory_turnover, InventoryTurnover, ReorderRecommendation, ReorderRecommender};
use pharmacy_sales::SaleRecord;

use crate::config::EngineConfig;
use crate::source::{CatalogSource, SalesSource};

/// Everything a dashboard shows for one reporting window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub window: TimeWindow,
    pub generated_at: DateTime<Utc>,
    pub summary: SalesSummary,
    pub growth: GrowthMetrics,
    pub daily_trend: Vec<DailyTrend>,
    pub monthly_trend: Vec<MonthlyTrend>,
    /// Keyed by hour of day (0-23, UTC).
    pub peak_hours: BTreeMap<u32, TrendBucket>,
    /// Keyed by weekday, 0 = Sunday.
    pub weekday_breakdown: BTreeMap<u32, TrendBucket>,
    pub categories: Vec<CategoryBreakdown>,
    pub fast_moving: Vec<MedicineMovement>,
    pub slow_moving: Vec<MedicineMovement>,
}

/// Facade over the analytics, forecast and reorder crates.
///
/// Holds only tuning; every call pulls fresh facts from the supplied sources
/// and takes `now` explicitly.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    config: EngineConfig,
    forecaster: DemandForecaster,
    recommender: ReorderRecommender,
}

impl AnalyticsEngine {
    /// Build from configuration, rejecting out-of-range tuning up front.
    pub fn new(config: EngineConfig) -> AnalyticsResult<Self> {
        let forecaster = config.forecaster()?;
        let recommender = config.recommender()?;
        Ok(Self {
            config,
            forecaster,
            recommender,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn forecaster(&self) -> &DemandForecaster {
        &self.forecaster
    }

    pub fn summary<S: SalesSource>(&self, source: &S, window: &TimeWindow) -> SalesSummary {
        summarize(&source.sales_in(window), window)
    }

    /// Assemble the full dashboard for `window`.
    ///
    /// Movement rankings and the daily series use their configured trailing
    /// lookbacks from `now`; everything else is scoped to `window`, and growth
    /// compares `window` against the equal-length window right before it.
    pub fn dashboard<S>(&self, source: &S, window: TimeWindow, now: DateTime<Utc>) -> AnalyticsResult<DashboardReport>
    where
        S: SalesSource + CatalogSource,
    {
        let dashboard = &self.config.dashboard;
        let movement = &self.config.movement;

        let previous = window.preceding();
        let longest_lookback = dashboard
            .daily_trend_days
            .max(movement.fast_lookback_days)
            .max(movement.slow_lookback_days);
        let span = TimeWindow::new(
            previous.start().min(TimeWindow::trailing(now, longest_lookback).start()),
            window.end().max(now),
        )?;
        let sales = source.sales_in(&span);
        let catalog = source.medicines();
        debug!(sales = sales.len(), catalog = catalog.len(), "dashboard inputs loaded");

        let report = DashboardReport {
            window,
            generated_at: now,
            summary: summarize(&sales, &window),
            growth: growth(&window, &previous, &sales),
            daily_trend: daily_trend(&sales, &TimeWindow::trailing(now, dashboard.daily_trend_days)),
            monthly_trend: monthly_trend(&sales, &window),
            peak_hours: peak_hours(&sales, &window),
            weekday_breakdown: weekday_breakdown(&sales, &window),
            categories: category_breakdown(&sales, &window),
            fast_moving: fast_moving(&sales, now, movement.fast_lookback_days, movement.fast_limit),
            slow_moving: slow_moving(
                &sales,
                &catalog,
                now,
                movement.slow_lookback_days,
                movement.slow_threshold,
            ),
        };

        info!(
            sales_count = report.summary.count,
            total = %report.summary.total,
            fast_moving = report.fast_moving.len(),
            slow_moving = report.slow_moving.len(),
            "dashboard report assembled"
        );
        Ok(report)
    }

    /// Forecast one medicine (or, with `None`, total demand) over the configured horizon.
    pub fn forecast<S: SalesSource>(
        &self,
        source: &S,
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        method: ForecastMethod,
    ) -> AnalyticsResult<ForecastResult> {
        let sales = self.forecast_sales(source, now);
        self.forecaster
            .forecast(&sales, medicine_id, now, self.config.forecast.horizon_days, method)
    }

    /// [`Self::forecast`] with the method named as text (`"moving-average"`, `"trend"`, ...).
    pub fn forecast_named<S: SalesSource>(
        &self,
        source: &S,
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        method: &str,
    ) -> AnalyticsResult<ForecastResult> {
        self.forecast(source, medicine_id, now, method.parse()?)
    }

    pub fn forecast_comparison<S: SalesSource>(
        &self,
        source: &S,
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<ForecastComparison> {
        let sales = self.forecast_sales(source, now);
        self.forecaster
            .get_forecast_comparison(&sales, medicine_id, now, self.config.forecast.horizon_days)
    }

    /// One method applied to every catalog medicine.
    pub fn forecast_catalog<S>(&self, source: &S, now: DateTime<Utc>, method: ForecastMethod) -> AnalyticsResult<ForecastReport>
    where
        S: SalesSource + CatalogSource,
    {
        let sales = self.forecast_sales(source, now);
        self.forecaster.forecast_catalog(
            &sales,
            &source.medicines(),
            now,
            self.config.forecast.horizon_days,
            method,
        )
    }

    /// Restock proposals for every stocked medicine, most urgent first.
    ///
    /// Each medicine is forecast with all four methods; the recommender works
    /// from their average. Medicines with a pending recommendation are skipped.
    pub fn recommend_restock<S>(&self, source: &S, now: DateTime<Utc>) -> AnalyticsResult<Vec<ReorderRecommendation>>
    where
        S: SalesSource + CatalogSource,
    {
        let sales = self.forecast_sales(source, now);
        let inventory = source.inventory();
        let pending = source.pending_reorders();
        let horizon = self.config.forecast.horizon_days;

        let mut forecasts = Vec::with_capacity(inventory.len() * ForecastMethod::ALL.len());
        for snapshot in inventory.iter().filter(|s| !pending.contains(&s.medicine_id)) {
            let history = self.forecaster.history(&sales, Some(snapshot.medicine_id), now);
            forecasts.extend(self.forecaster.compare(&history, horizon)?.into_results());
        }

        Ok(self.recommender.recommend_all(&inventory, &forecasts, &pending))
    }

    /// Turnover of every stocked medicine over the trailing `days`.
    pub fn turnover<S>(&self, source: &S, now: DateTime<Utc>, days: u32) -> Vec<InventoryTurnover>
    where
        S: SalesSource + CatalogSource,
    {
        let sales = source.sales_in(&TimeWindow::trailing(now, days));
        source
            .inventory()
            .iter()
            .map(|snapshot| inventory_turnover(&sales, snapshot, now, days))
            .collect()
    }

    /// Performance of a single catalog medicine over the trailing `days`.
    pub fn medicine_performance<S>(
        &self,
        source: &S,
        medicine_id: MedicineId,
        now: DateTime<Utc>,
        days: u32,
    ) -> AnalyticsResult<MedicinePerformance>
    where
        S: SalesSource + CatalogSource,
    {
        let medicine = source
            .medicines()
            .into_iter()
            .find(|m| m.id == medicine_id)
            .ok_or_else(|| AnalyticsError::validation(format!("medicine {medicine_id} is not in the catalog")))?;
        let sales = source.sales_in(&TimeWindow::trailing(now, days));
        Ok(medicine_performance(&sales, &medicine, now, days))
    }

    fn forecast_sales<S: SalesSource>(&self, source: &S, now: DateTime<Utc>) -> Vec<SaleRecord> {
        source.sales_in(&TimeWindow::trailing(now, self.forecaster.lookback_days()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_tuning() {
        let mut config = EngineConfig::default();
        config.forecast.alpha = 0.0;
        assert!(matches!(AnalyticsEngine::new(config), Err(AnalyticsError::Validation(_))));
    }

    #[test]
    fn defaults_build() {
        let engine = AnalyticsEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.forecaster().lookback_days(), 60);
        assert_eq!(engine.config().forecast.horizon_days, 30);
    }
}
