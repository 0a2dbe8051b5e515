//! Fast/slow-moving classification of medicines over a trailing lookback.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{MedicineId, SaleId, TimeWindow};
use pharmacy_sales::{lines_within, MedicineRef, SaleRecord};

/// Medicines selling fewer units than this over the lookback are slow movers.
pub const DEFAULT_SLOW_MOVING_THRESHOLD: u64 = 5;

/// Per-medicine totals over a lookback window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineMovement {
    pub medicine_id: MedicineId,
    pub total_quantity: u64,
    pub total_revenue: Decimal,
    /// Number of distinct sales containing the medicine.
    pub sale_count: u64,
}

impl MedicineMovement {
    pub fn zero(medicine_id: MedicineId) -> Self {
        Self {
            medicine_id,
            total_quantity: 0,
            total_revenue: Decimal::ZERO,
            sale_count: 0,
        }
    }
}

/// Ranking key for [`top_performers`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankMetric {
    Quantity,
    Revenue,
    Frequency,
}

#[derive(Default)]
struct Tally {
    quantity: u64,
    revenue: Decimal,
    sales: BTreeSet<SaleId>,
}

pub(crate) fn tally_by_medicine(
    sales: &[SaleRecord],
    window: &TimeWindow,
) -> BTreeMap<MedicineId, MedicineMovement> {
    let mut tallies: BTreeMap<MedicineId, Tally> = BTreeMap::new();
    for (sale, line) in lines_within(sales, window) {
        let t = tallies.entry(line.medicine_id).or_default();
        t.quantity += u64::from(line.quantity);
        t.revenue += line.subtotal();
        t.sales.insert(sale.id);
    }

    tallies
        .into_iter()
        .map(|(medicine_id, t)| {
            (
                medicine_id,
                MedicineMovement {
                    medicine_id,
                    total_quantity: t.quantity,
                    total_revenue: t.revenue,
                    sale_count: t.sales.len() as u64,
                },
            )
        })
        .collect()
}

/// Medicines ranked by `metric` (descending) over `[now - lookback_days, now)`.
///
/// Ties are broken by `medicine_id` ascending so the output is deterministic.
pub fn top_performers(
    sales: &[SaleRecord],
    now: DateTime<Utc>,
    lookback_days: u32,
    limit: usize,
    metric: RankMetric,
) -> Vec<MedicineMovement> {
    let window = TimeWindow::trailing(now, lookback_days);
    let mut ranked: Vec<MedicineMovement> = tally_by_medicine(sales, &window).into_values().collect();

    ranked.sort_by(|a, b| {
        let primary = match metric {
            RankMetric::Quantity => b.total_quantity.cmp(&a.total_quantity),
            RankMetric::Revenue => b.total_revenue.cmp(&a.total_revenue),
            RankMetric::Frequency => b.sale_count.cmp(&a.sale_count),
        };
        primary.then_with(|| a.medicine_id.cmp(&b.medicine_id))
    });
    ranked.truncate(limit);
    ranked
}

/// Top `limit` medicines by quantity sold over the lookback.
pub fn fast_moving(
    sales: &[SaleRecord],
    now: DateTime<Utc>,
    lookback_days: u32,
    limit: usize,
) -> Vec<MedicineMovement> {
    top_performers(sales, now, lookback_days, limit, RankMetric::Quantity)
}

/// Every catalog medicine that sold fewer than `threshold` units over the lookback.
///
/// The catalog drives the scan (left outer join against sales-by-medicine), so
/// medicines with no sales at all show up with zero totals. Sorted ascending by
/// quantity, ties by `medicine_id`.
pub fn slow_moving(
    sales: &[SaleRecord],
    catalog: &[MedicineRef],
    now: DateTime<Utc>,
    lookback_days: u32,
    threshold: u64,
) -> Vec<MedicineMovement> {
    let window = TimeWindow::trailing(now, lookback_days);
    let tallies = tally_by_medicine(sales, &window);

    let mut slow: Vec<MedicineMovement> = catalog
        .iter()
        .map(|m| {
            tallies
                .get(&m.id)
                .cloned()
                .unwrap_or_else(|| MedicineMovement::zero(m.id))
        })
        .filter(|m| m.total_quantity < threshold)
        .collect();

    slow.sort_by(|a, b| {
        a.total_quantity
            .cmp(&b.total_quantity)
            .then_with(|| a.medicine_id.cmp(&b.medicine_id))
    });
    slow.dedup_by_key(|m| m.medicine_id);
    slow
}
