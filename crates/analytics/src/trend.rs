//! Trend series: sales bucketed by calendar day, month, hour and weekday.
//!
//! Series contain observed buckets only. A day (or hour) without sales is
//! absent, not zero; callers that need a dense series densify it themselves.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::TimeWindow;
use pharmacy_sales::SaleRecord;

/// Count and revenue of the sales falling into one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
    pub sale_count: u64,
    pub total_amount: Decimal,
}

impl TrendBucket {
    fn record(&mut self, sale: &SaleRecord) {
        self.sale_count += 1;
        self.total_amount += sale.total_amount;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyTrend {
    pub day: NaiveDate,
    pub sale_count: u64,
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub sale_count: u64,
    pub total_amount: Decimal,
    pub average_amount: Decimal,
}

fn bucket_by<K: Ord>(
    sales: &[SaleRecord],
    window: &TimeWindow,
    key: impl Fn(&SaleRecord) -> K,
) -> BTreeMap<K, TrendBucket> {
    let mut buckets: BTreeMap<K, TrendBucket> = BTreeMap::new();
    for sale in sales.iter().filter(|s| window.contains(s.timestamp)) {
        buckets.entry(key(sale)).or_default().record(sale);
    }
    buckets
}

/// One entry per calendar day (UTC) with at least one sale, ascending.
pub fn daily_trend(sales: &[SaleRecord], window: &TimeWindow) -> Vec<DailyTrend> {
    bucket_by(sales, window, |s| s.timestamp.date_naive())
        .into_iter()
        .map(|(day, b)| DailyTrend {
            day,
            sale_count: b.sale_count,
            total_amount: b.total_amount,
        })
        .collect()
}

/// One entry per `(year, month)` with at least one sale, ascending.
pub fn monthly_trend(sales: &[SaleRecord], window: &TimeWindow) -> Vec<MonthlyTrend> {
    bucket_by(sales, window, |s| (s.timestamp.year(), s.timestamp.month()))
        .into_iter()
        .map(|((year, month), b)| MonthlyTrend {
            year,
            month,
            sale_count: b.sale_count,
            average_amount: b.total_amount / Decimal::from(b.sale_count),
            total_amount: b.total_amount,
        })
        .collect()
}

/// Sales keyed by hour of day (0–23).
pub fn peak_hours(sales: &[SaleRecord], window: &TimeWindow) -> BTreeMap<u32, TrendBucket> {
    bucket_by(sales, window, |s| s.timestamp.hour())
}

/// Sales keyed by day of week, `0 = Sunday … 6 = Saturday`.
pub fn weekday_breakdown(sales: &[SaleRecord], window: &TimeWindow) -> BTreeMap<u32, TrendBucket> {
    bucket_by(sales, window, |s| s.timestamp.weekday().num_days_from_sunday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, bare_sale, money};

    fn q2() -> TimeWindow {
        TimeWindow::new(at(4, 1, 0), at(7, 1, 0)).unwrap()
    }

    #[test]
    fn daily_trend_skips_empty_days_and_sorts() {
        let sales = vec![
            bare_sale(1, at(4, 3, 9), 10),
            bare_sale(2, at(4, 1, 9), 5),
            bare_sale(3, at(4, 3, 17), 15),
        ];

        let trend = daily_trend(&sales, &q2());
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].day, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(trend[0].sale_count, 1);
        assert_eq!(trend[1].day, NaiveDate::from_ymd_opt(2024, 4, 3).unwrap());
        assert_eq!(trend[1].sale_count, 2);
        assert_eq!(trend[1].total_amount, money(25));
    }

    #[test]
    fn monthly_trend_carries_average() {
        let sales = vec![
            bare_sale(1, at(4, 3, 9), 10),
            bare_sale(2, at(4, 20, 9), 30),
            bare_sale(3, at(6, 1, 9), 7),
            bare_sale(4, at(7, 1, 9), 1000),
        ];

        let trend = monthly_trend(&sales, &q2());
        assert_eq!(trend.len(), 2);
        assert_eq!((trend[0].year, trend[0].month), (2024, 4));
        assert_eq!(trend[0].average_amount, money(20));
        assert_eq!((trend[1].year, trend[1].month), (2024, 6));
        assert_eq!(trend[1].total_amount, money(7));
    }

    #[test]
    fn peak_hours_only_has_observed_hours() {
        let sales = vec![
            bare_sale(1, at(4, 3, 9), 10),
            bare_sale(2, at(4, 4, 9), 20),
            bare_sale(3, at(4, 4, 18), 5),
        ];

        let hours = peak_hours(&sales, &q2());
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[&9].sale_count, 2);
        assert_eq!(hours[&9].total_amount, money(30));
        assert_eq!(hours[&18].sale_count, 1);
        assert!(!hours.contains_key(&0));
    }

    #[test]
    fn weekday_breakdown_counts_from_sunday() {
        // 2024-04-07 is a Sunday, 2024-04-08 a Monday.
        let sales = vec![bare_sale(1, at(4, 7, 9), 10), bare_sale(2, at(4, 8, 9), 20)];

        let days = weekday_breakdown(&sales, &q2());
        assert_eq!(days[&0].total_amount, money(10));
        assert_eq!(days[&1].total_amount, money(20));
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(daily_trend(&[], &q2()).is_empty());
        assert!(monthly_trend(&[], &q2()).is_empty());
        assert!(peak_hours(&[], &q2()).is_empty());
    }
}
