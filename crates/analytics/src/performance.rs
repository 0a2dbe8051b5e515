//! Single-medicine performance over a trailing lookback.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{MedicineId, TimeWindow};
use pharmacy_sales::{MedicineRef, SaleRecord};

use crate::movement::{tally_by_medicine, MedicineMovement};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicinePerformance {
    pub medicine_id: MedicineId,
    pub name: String,
    pub sku: String,
    pub period_days: u32,
    pub total_quantity: u64,
    pub total_revenue: Decimal,
    pub sale_count: u64,
    pub avg_quantity_per_sale: Decimal,
    pub avg_revenue_per_sale: Decimal,
    pub avg_daily_quantity: Decimal,
    pub avg_daily_revenue: Decimal,
}

fn per(value: Decimal, count: u64) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        value / Decimal::from(count)
    }
}

/// Totals and per-sale / per-day averages for `medicine` over `[now - days, now)`.
pub fn medicine_performance(
    sales: &[SaleRecord],
    medicine: &MedicineRef,
    now: DateTime<Utc>,
    days: u32,
) -> MedicinePerformance {
    let window = TimeWindow::trailing(now, days);
    let movement = tally_by_medicine(sales, &window)
        .remove(&medicine.id)
        .unwrap_or_else(|| MedicineMovement::zero(medicine.id));
    let quantity = Decimal::from(movement.total_quantity);

    MedicinePerformance {
        medicine_id: medicine.id,
        name: medicine.name.clone(),
        sku: medicine.sku.clone(),
        period_days: days,
        total_quantity: movement.total_quantity,
        total_revenue: movement.total_revenue,
        sale_count: movement.sale_count,
        avg_quantity_per_sale: per(quantity, movement.sale_count),
        avg_revenue_per_sale: per(movement.total_revenue, movement.sale_count),
        avg_daily_quantity: per(quantity, u64::from(days)),
        avg_daily_revenue: per(movement.total_revenue, u64::from(days)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, med, money, sale};

    fn aspirin() -> MedicineRef {
        MedicineRef::new(med(1), "Aspirin 500mg", "ASP-500")
    }

    #[test]
    fn averages_per_sale_and_per_day() {
        let sales = vec![
            sale(1, at(6, 20, 9), med(1), 4, 3),
            sale(2, at(6, 21, 9), med(1), 2, 3),
            sale(3, at(6, 22, 9), med(2), 9, 3),
        ];

        let perf = medicine_performance(&sales, &aspirin(), at(6, 30, 12), 30);
        assert_eq!(perf.total_quantity, 6);
        assert_eq!(perf.total_revenue, money(18));
        assert_eq!(perf.sale_count, 2);
        assert_eq!(perf.avg_quantity_per_sale, money(3));
        assert_eq!(perf.avg_revenue_per_sale, money(9));
        assert_eq!(perf.avg_daily_quantity, Decimal::new(2, 1));
        assert_eq!(perf.avg_daily_revenue, Decimal::new(6, 1));
    }

    #[test]
    fn unsold_medicine_and_zero_day_period_are_zero() {
        let perf = medicine_performance(&[], &aspirin(), at(6, 30, 12), 0);
        assert_eq!(perf.sale_count, 0);
        assert_eq!(perf.avg_quantity_per_sale, Decimal::ZERO);
        assert_eq!(perf.avg_daily_revenue, Decimal::ZERO);
    }
}
