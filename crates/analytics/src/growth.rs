//! Period-over-period growth of sales count and revenue.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pharmacy_core::TimeWindow;
use pharmacy_sales::SaleRecord;

use crate::summary::summarize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub sales_count: u64,
    pub revenue: Decimal,
}

/// Growth between two windows.
///
/// A percentage is `None` when the previous value is zero (growth undefined)
/// or the ratio is too large to represent; render it as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthMetrics {
    pub current: PeriodTotals,
    pub previous: PeriodTotals,
    pub sales_growth_pct: Option<f64>,
    pub revenue_growth_pct: Option<f64>,
}

fn pct_change(current: Decimal, previous: Decimal) -> Option<f64> {
    if previous <= Decimal::ZERO {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_f64()
}

/// Compare `current` against `previous`.
///
/// The windows are usually back-to-back and of equal length
/// ([`TimeWindow::preceding`]), but nothing here assumes it.
pub fn growth(current: &TimeWindow, previous: &TimeWindow, sales: &[SaleRecord]) -> GrowthMetrics {
    let cur = summarize(sales, current);
    let prev = summarize(sales, previous);

    GrowthMetrics {
        sales_growth_pct: pct_change(Decimal::from(cur.count), Decimal::from(prev.count)),
        revenue_growth_pct: pct_change(cur.total, prev.total),
        current: PeriodTotals {
            sales_count: cur.count,
            revenue: cur.total,
        },
        previous: PeriodTotals {
            sales_count: prev.count,
            revenue: prev.total,
        },
    }
}
