//! Revenue and volume per medicine category.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{CategoryId, MedicineId, SaleId, TimeWindow};
use pharmacy_sales::{lines_within, SaleRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// `None` groups lines that carry no category.
    pub category_id: Option<CategoryId>,
    pub total_quantity: u64,
    pub total_revenue: Decimal,
    pub sale_count: u64,
    pub medicine_count: u64,
}

#[derive(Default)]
struct Tally {
    quantity: u64,
    revenue: Decimal,
    sales: BTreeSet<SaleId>,
    medicines: BTreeSet<MedicineId>,
}

/// Per-category totals over `window`, highest revenue first.
pub fn category_breakdown(sales: &[SaleRecord], window: &TimeWindow) -> Vec<CategoryBreakdown> {
    let mut tallies: BTreeMap<Option<CategoryId>, Tally> = BTreeMap::new();
    for (sale, line) in lines_within(sales, window) {
        let t = tallies.entry(line.category_id).or_default();
        t.quantity += u64::from(line.quantity);
        t.revenue += line.subtotal();
        t.sales.insert(sale.id);
        t.medicines.insert(line.medicine_id);
    }

    let mut rows: Vec<CategoryBreakdown> = tallies
        .into_iter()
        .map(|(category_id, t)| CategoryBreakdown {
            category_id,
            total_quantity: t.quantity,
            total_revenue: t.revenue,
            sale_count: t.sales.len() as u64,
            medicine_count: t.medicines.len() as u64,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.category_id.cmp(&b.category_id))
    });
    rows
}
