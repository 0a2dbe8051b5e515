//! Historical demand series extracted once and shared by every method.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use pharmacy_core::{MedicineId, TimeWindow};
use pharmacy_sales::{lines_within, SaleRecord};

/// Daily quantities sold over a lookback window.
///
/// Only days with at least one unit sold are stored. `medicine_id == None`
/// aggregates across every medicine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemandHistory {
    medicine_id: Option<MedicineId>,
    lookback_days: u32,
    window: TimeWindow,
    daily: BTreeMap<NaiveDate, u64>,
}

impl DemandHistory {
    /// Extract the series from `sales` over `[now - lookback_days, now)`.
    pub fn extract(
        sales: &[SaleRecord],
        medicine_id: Option<MedicineId>,
        now: DateTime<Utc>,
        lookback_days: u32,
    ) -> Self {
        let window = TimeWindow::trailing(now, lookback_days);
        let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for (sale, line) in lines_within(sales, &window) {
            if medicine_id.is_some_and(|id| id != line.medicine_id) {
                continue;
            }
            *daily.entry(sale.timestamp.date_naive()).or_insert(0) += u64::from(line.quantity);
        }

        Self {
            medicine_id,
            lookback_days,
            window,
            daily,
        }
    }

    pub fn medicine_id(&self) -> Option<MedicineId> {
        self.medicine_id
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn is_empty(&self) -> bool {
        self.daily.is_empty()
    }

    pub fn total_quantity(&self) -> u64 {
        self.daily.values().sum()
    }

    /// Number of days with sales.
    pub fn observed_days(&self) -> usize {
        self.daily.len()
    }

    /// Quantities of observed days, oldest first.
    pub fn daily_quantities(&self) -> Vec<u64> {
        self.daily.values().copied().collect()
    }

    /// Quantities summed per ISO week (Monday start), oldest first.
    /// Weeks without sales are absent.
    pub fn weekly_quantities(&self) -> Vec<u64> {
        let mut weekly: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for (day, qty) in &self.daily {
            let week = day.iso_week();
            *weekly.entry((week.year(), week.week())).or_insert(0) += qty;
        }
        weekly.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pharmacy_core::SaleId;
    use rust_decimal::Decimal;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, 10, 0, 0).unwrap()
    }

    fn sale(id: u128, day: u32, medicine: u128, qty: u32) -> SaleRecord {
        SaleRecord::new(SaleId::from_u128(id), at(day))
            .with_line(MedicineId::from_u128(medicine), None, qty, Decimal::ONE)
            .unwrap()
    }

    #[test]
    fn groups_by_day_and_filters_medicine() {
        let sales = vec![
            sale(1, 1, 1, 2),
            sale(2, 1, 1, 3),
            sale(3, 2, 2, 7),
            sale(4, 3, 1, 1),
        ];

        let history = DemandHistory::extract(&sales, Some(MedicineId::from_u128(1)), at(10), 30);
        assert_eq!(history.daily_quantities(), vec![5, 1]);
        assert_eq!(history.total_quantity(), 6);
        assert_eq!(history.observed_days(), 2);

        let all = DemandHistory::extract(&sales, None, at(10), 30);
        assert_eq!(all.daily_quantities(), vec![5, 7, 1]);
    }

    #[test]
    fn weekly_buckets_follow_iso_weeks() {
        // 2024-07-01 is a Monday: days 1..=7 share a week, day 8 starts the next.
        let sales = vec![sale(1, 1, 1, 1), sale(2, 7, 1, 2), sale(3, 8, 1, 4), sale(4, 20, 1, 8)];
        let history = DemandHistory::extract(&sales, None, at(25), 30);
        assert_eq!(history.weekly_quantities(), vec![3, 4, 8]);
    }

    #[test]
    fn lookback_excludes_now_and_older_sales() {
        let sales = vec![sale(1, 1, 1, 1), sale(2, 10, 1, 2), sale(3, 20, 1, 4)];
        let history = DemandHistory::extract(&sales, None, at(20), 10);
        assert_eq!(history.daily_quantities(), vec![2]);
    }
}
