//! Restock proposals from forecasts and live stock levels.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pharmacy_core::{AnalyticsError, AnalyticsResult, MedicineId};
use pharmacy_forecast::{ForecastMethod, ForecastResult};

use crate::snapshot::InventorySnapshot;

/// Float products like `60.0 × 1.2` can land a hair above an integer; ignore
/// anything closer than this when rounding up.
const CEIL_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderPriority {
    Low,
    Medium,
    High,
    Critical,
}

/// Lifecycle of a recommendation. The engine only ever emits `Pending`;
/// approval and rejection happen outside it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReorderStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodForecast {
    pub method: ForecastMethod,
    pub forecasted_quantity: f64,
}

/// Forecast values a recommendation was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBasis {
    pub forecasts: Vec<MethodForecast>,
    pub average_forecast: f64,
    pub safety_factor: f64,
    /// `ceil(average_forecast × (1 + safety_factor))`.
    pub required_quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRecommendation {
    pub medicine_id: MedicineId,
    pub current_stock: u64,
    pub min_stock: u64,
    pub recommended_quantity: u64,
    pub priority: ReorderPriority,
    pub basis: ForecastBasis,
    pub reason: String,
    pub status: ReorderStatus,
}

/// Priority from `ratio = current_stock / max(min_stock, 1)`.
///
/// Boundaries are inclusive: `stock == 0` is critical, `ratio <= 0.5` high,
/// `ratio <= 1.0` medium, anything above low.
pub fn priority_for(current_stock: u64, min_stock: u64) -> ReorderPriority {
    if current_stock == 0 {
        return ReorderPriority::Critical;
    }
    let ratio = current_stock as f64 / min_stock.max(1) as f64;
    if ratio <= 0.5 {
        ReorderPriority::High
    } else if ratio <= 1.0 {
        ReorderPriority::Medium
    } else {
        ReorderPriority::Low
    }
}

/// Turns forecasts plus an inventory snapshot into a restock proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderRecommender {
    safety_factor: f64,
}

impl Default for ReorderRecommender {
    fn default() -> Self {
        Self {
            safety_factor: Self::DEFAULT_SAFETY_FACTOR,
        }
    }
}

impl ReorderRecommender {
    /// 20% safety stock on top of forecast demand.
    pub const DEFAULT_SAFETY_FACTOR: f64 = 0.2;

    pub fn new(safety_factor: f64) -> AnalyticsResult<Self> {
        if !(safety_factor.is_finite() && safety_factor >= 0.0) {
            return Err(AnalyticsError::validation(format!(
                "safety factor must be a finite non-negative number, got {safety_factor}"
            )));
        }
        Ok(Self { safety_factor })
    }

    pub fn safety_factor(&self) -> f64 {
        self.safety_factor
    }

    /// Propose a restock for one medicine, or `None` when stock covers the
    /// buffered forecast and sits above the minimum level.
    ///
    /// Stock at or below the minimum is not enough on its own: when
    /// `max(required - stock, min_stock - stock)` is 0 (stock exactly at the
    /// minimum with demand covered, or an empty item with `min_stock == 0` and
    /// no demand) there is nothing to order and `None` is returned as well.
    ///
    /// Forecasts for other medicines (or aggregate forecasts) are ignored.
    pub fn recommend(
        &self,
        inventory: &InventorySnapshot,
        forecasts: &[ForecastResult],
    ) -> Option<ReorderRecommendation> {
        let relevant: Vec<MethodForecast> = forecasts
            .iter()
            .filter(|f| f.medicine_id == Some(inventory.medicine_id))
            .map(|f| MethodForecast {
                method: f.method,
                forecasted_quantity: f.forecasted_quantity.max(0.0),
            })
            .collect();

        if relevant.len() != forecasts.len() {
            warn!(
                medicine_id = %inventory.medicine_id,
                ignored = forecasts.len() - relevant.len(),
                "ignoring forecasts that belong to other medicines"
            );
        }

        let average_forecast = if relevant.is_empty() {
            0.0
        } else {
            relevant.iter().map(|f| f.forecasted_quantity).sum::<f64>() / relevant.len() as f64
        };
        let buffered = average_forecast * (1.0 + self.safety_factor);
        let required_quantity = (buffered - CEIL_TOLERANCE).ceil().max(0.0) as u64;

        let stock = inventory.current_stock;
        let covers_demand = stock >= required_quantity;
        let above_minimum = stock > inventory.min_stock;
        if covers_demand && above_minimum {
            debug!(
                medicine_id = %inventory.medicine_id,
                stock,
                required_quantity,
                "stock covers forecast demand; no reorder"
            );
            return None;
        }

        let recommended_quantity = required_quantity
            .saturating_sub(stock)
            .max(inventory.min_stock.saturating_sub(stock));
        if recommended_quantity == 0 {
            debug!(medicine_id = %inventory.medicine_id, "nothing to order");
            return None;
        }

        let priority = priority_for(stock, inventory.min_stock);
        let reason = if !above_minimum {
            format!(
                "current stock ({stock}) is at or below minimum level ({})",
                inventory.min_stock
            )
        } else {
            format!(
                "current stock ({stock}) does not cover forecast demand of {required_quantity} including {:.0}% safety stock",
                self.safety_factor * 100.0
            )
        };

        debug!(
            medicine_id = %inventory.medicine_id,
            recommended_quantity,
            ?priority,
            "reorder recommended"
        );

        Some(ReorderRecommendation {
            medicine_id: inventory.medicine_id,
            current_stock: stock,
            min_stock: inventory.min_stock,
            recommended_quantity,
            priority,
            basis: ForecastBasis {
                forecasts: relevant,
                average_forecast,
                safety_factor: self.safety_factor,
                required_quantity,
            },
            reason,
            status: ReorderStatus::Pending,
        })
    }

    /// Recommend across a whole inventory.
    ///
    /// Medicines in `pending` already have an open recommendation and are
    /// skipped. Output is ordered most urgent first, then by `medicine_id`.
    pub fn recommend_all(
        &self,
        inventories: &[InventorySnapshot],
        forecasts: &[ForecastResult],
        pending: &BTreeSet<MedicineId>,
    ) -> Vec<ReorderRecommendation> {
        let mut by_medicine: BTreeMap<MedicineId, Vec<ForecastResult>> = BTreeMap::new();
        for f in forecasts {
            if let Some(id) = f.medicine_id {
                by_medicine.entry(id).or_default().push(f.clone());
            }
        }

        let (eligible, skipped_pending) = without_pending(inventories, pending);
        let mut recommendations: Vec<ReorderRecommendation> = eligible
            .into_iter()
            .filter_map(|inv| {
                let own = by_medicine.get(&inv.medicine_id).map(Vec::as_slice).unwrap_or(&[]);
                self.recommend(inv, own)
            })
            .collect();

        recommendations.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.medicine_id.cmp(&b.medicine_id))
        });

        info!(
            inventories = inventories.len(),
            skipped_pending,
            recommended = recommendations.len(),
            "reorder recommendations generated"
        );
        recommendations
    }
}

/// Inventories without an open recommendation, plus how many were held back.
fn without_pending<'a>(
    inventories: &'a [InventorySnapshot],
    pending: &BTreeSet<MedicineId>,
) -> (Vec<&'a InventorySnapshot>, usize) {
    let (held, eligible): (Vec<_>, Vec<_>) = inventories
        .iter()
        .partition(|inv| pending.contains(&inv.medicine_id));
    for inv in &held {
        debug!(medicine_id = %inv.medicine_id, "pending recommendation exists; skipping");
    }
    (eligible, held.len())
}
