use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pharmacy_core::{MedicineId, TimeWindow};
use pharmacy_sales::{lines_within, SaleRecord};

use crate::snapshot::InventorySnapshot;

/// How fast current stock turns over at the recent sales pace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryTurnover {
    pub medicine_id: MedicineId,
    pub period_days: u32,
    pub total_quantity_sold: u64,
    /// Current stock stands in for the average; no stock history is available.
    pub average_inventory: u64,
    pub turnover_rate: f64,
    pub days_to_sell: f64,
}

/// `turnover_rate = sold / stock`, `days_to_sell = days / turnover_rate`.
/// Both are 0 when there is no stock or nothing sold.
pub fn inventory_turnover(
    sales: &[SaleRecord],
    snapshot: &InventorySnapshot,
    now: DateTime<Utc>,
    days: u32,
) -> InventoryTurnover {
    let window = TimeWindow::trailing(now, days);
    let sold: u64 = lines_within(sales, &window)
        .filter(|(_, line)| line.medicine_id == snapshot.medicine_id)
        .map(|(_, line)| u64::from(line.quantity))
        .sum();

    let stock = snapshot.current_stock;
    let turnover_rate = if stock > 0 { sold as f64 / stock as f64 } else { 0.0 };
    let days_to_sell = if turnover_rate > 0.0 {
        f64::from(days) / turnover_rate
    } else {
        0.0
    };

    InventoryTurnover {
        medicine_id: snapshot.medicine_id,
        period_days: days,
        total_quantity_sold: sold,
        average_inventory: stock,
        turnover_rate,
        days_to_sell,
    }
}
