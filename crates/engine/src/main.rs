use std::fs::File;
use std::io::BufReader;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use serde::Serialize;

use pharmacy_core::TimeWindow;
use pharmacy_engine::{AnalyticsEngine, DashboardReport, EngineConfig, InMemorySource};
use pharmacy_forecast::{ForecastComparison, ForecastMethod, ForecastReport};
use pharmacy_inventory::{InventoryTurnover, ReorderRecommendation};

const USAGE: &str = "usage: pharmacy-report <dataset.json> [now as RFC 3339]";

#[derive(Serialize)]
struct Report {
    dashboard: DashboardReport,
    forecasts: ForecastReport,
    total_demand: ForecastComparison,
    turnover: Vec<InventoryTurnover>,
    recommendations: Vec<ReorderRecommendation>,
}

fn main() -> anyhow::Result<()> {
    let config = EngineConfig::load().context("failed to load engine configuration")?;
    pharmacy_observability::init(&config.log);

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!(USAGE);
    };
    let now = match args.next() {
        Some(raw) => DateTime::parse_from_rfc3339(&raw)
            .with_context(|| format!("invalid timestamp {raw:?}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let file = File::open(&path).with_context(|| format!("failed to open dataset {path}"))?;
    let source: InMemorySource =
        serde_json::from_reader(BufReader::new(file)).with_context(|| format!("failed to parse dataset {path}"))?;
    source.validate()?;
    tracing::info!(
        sales = source.sales.len(),
        medicines = source.medicines.len(),
        %now,
        "dataset loaded"
    );

    let engine = AnalyticsEngine::new(config)?;
    let window_days = engine.config().dashboard.window_days;
    let report = Report {
        dashboard: engine.dashboard(&source, TimeWindow::trailing(now, window_days), now)?,
        forecasts: engine.forecast_catalog(&source, now, ForecastMethod::default())?,
        total_demand: engine.forecast_comparison(&source, None, now)?,
        turnover: engine.turnover(&source, now, window_days),
        recommendations: engine.recommend_restock(&source, now)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
