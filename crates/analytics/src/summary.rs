//! Time-window aggregation: count/sum/avg/min/max of sale totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::{TimeWindow, ValueObject};
use pharmacy_sales::SaleRecord;

/// Summary metrics over the sales inside a window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub count: u64,
    pub total: Decimal,
    pub average: Decimal,
    pub max: Decimal,
    pub min: Decimal,
}

impl SalesSummary {
    pub fn empty() -> Self {
        Self {
            count: 0,
            total: Decimal::ZERO,
            average: Decimal::ZERO,
            max: Decimal::ZERO,
            min: Decimal::ZERO,
        }
    }
}

impl ValueObject for SalesSummary {}

/// Reduce the sales with `timestamp ∈ [window.start, window.end)`.
pub fn summarize(sales: &[SaleRecord], window: &TimeWindow) -> SalesSummary {
    let mut summary = SalesSummary::empty();
    let mut extremes: Option<(Decimal, Decimal)> = None;

    for sale in sales.iter().filter(|s| window.contains(s.timestamp)) {
        summary.count += 1;
        summary.total += sale.total_amount;
        extremes = Some(match extremes {
            None => (sale.total_amount, sale.total_amount),
            Some((min, max)) => (min.min(sale.total_amount), max.max(sale.total_amount)),
        });
    }

    if let Some((min, max)) = extremes {
        summary.min = min;
        summary.max = max;
        summary.average = summary.total / Decimal::from(summary.count);
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, bare_sale, money};
    use proptest::prelude::*;

    fn june() -> TimeWindow {
        TimeWindow::new(at(6, 1, 0), at(7, 1, 0)).unwrap()
    }

    #[test]
    fn empty_input_is_all_zero() {
        assert_eq!(summarize(&[], &june()), SalesSummary::empty());
    }

    #[test]
    fn reduces_only_sales_inside_window() {
        let sales = vec![
            bare_sale(1, at(5, 31, 23), 1000),
            bare_sale(2, at(6, 1, 0), 10),
            bare_sale(3, at(6, 15, 12), 30),
            bare_sale(4, at(6, 30, 23), 20),
            bare_sale(5, at(7, 1, 0), 500),
        ];

        let summary = summarize(&sales, &june());
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, money(60));
        assert_eq!(summary.average, money(20));
        assert_eq!(summary.max, money(30));
        assert_eq!(summary.min, money(10));
    }

    #[test]
    fn zero_length_window_matches_nothing() {
        let sales = vec![bare_sale(1, at(6, 1, 0), 10)];
        let window = TimeWindow::new(at(6, 1, 0), at(6, 1, 0)).unwrap();
        assert_eq!(summarize(&sales, &window).count, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: count equals the number of sales inside the window and
        /// min <= average <= max whenever anything matched.
        #[test]
        fn count_matches_filter(
            offsets in prop::collection::vec((0i64..60 * 24, 0i64..10_000), 0..50)
        ) {
            let base = at(5, 15, 0);
            let sales: Vec<_> = offsets
                .iter()
                .enumerate()
                .map(|(i, (hours, total))| bare_sale(i as u128, base + chrono::Duration::hours(*hours), *total))
                .collect();

            let window = june();
            let expected = sales.iter().filter(|s| window.contains(s.timestamp)).count() as u64;
            let summary = summarize(&sales, &window);

            prop_assert_eq!(summary.count, expected);
            if summary.count > 0 {
                prop_assert!(summary.min <= summary.average);
                prop_assert!(summary.average <= summary.max);
            } else {
                prop_assert_eq!(summary, SalesSummary::empty());
            }
        }
    }
}
