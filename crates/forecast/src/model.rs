//! The four projection methods.
//!
//! Each function takes an already-extracted [`DemandHistory`] and a horizon in
//! days. None of them handles the empty-history case: the forecaster
//! short-circuits that before dispatching here.

use crate::history::DemandHistory;
use crate::result::ForecastParameters;

/// Output of a single method before it is wrapped into a `ForecastResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub daily_rate: f64,
    pub forecasted_quantity: f64,
    pub parameters: ForecastParameters,
    pub note: Option<String>,
}

impl Projection {
    fn new(daily_rate: f64, forecasted_quantity: f64, parameters: ForecastParameters) -> Self {
        Self {
            daily_rate,
            forecasted_quantity: forecasted_quantity.max(0.0),
            parameters,
            note: None,
        }
    }
}

/// `rate = total / lookback_days`, `forecast = rate × horizon`.
pub fn moving_average(history: &DemandHistory, horizon_days: u32) -> Projection {
    let lookback = f64::from(history.lookback_days().max(1));
    let rate = history.total_quantity() as f64 / lookback;
    Projection::new(rate, rate * f64::from(horizon_days), ForecastParameters::MovingAverage)
}

/// `s[0] = a[0]`, `s[t] = α·a[t] + (1-α)·s[t-1]`; forecast = `s[last] × horizon`.
pub fn exponential_smoothing(history: &DemandHistory, horizon_days: u32, alpha: f64) -> Projection {
    let daily = history.daily_quantities();
    let smoothed = daily
        .iter()
        .map(|q| *q as f64)
        .reduce(|prev, actual| alpha * actual + (1.0 - alpha) * prev)
        .unwrap_or(0.0);

    Projection::new(
        smoothed,
        smoothed * f64::from(horizon_days),
        ForecastParameters::Smoothing { alpha },
    )
}

/// Ordinary least squares `y = slope·x + intercept` over `(x_i, y_i)`.
fn least_squares(ys: &[f64]) -> (f64, f64) {
    let n = ys.len() as f64;
    let sum_x: f64 = (0..ys.len()).map(|x| x as f64).sum();
    let sum_y: f64 = ys.iter().sum();
    let sum_xy: f64 = ys.iter().enumerate().map(|(x, y)| x as f64 * y).sum();
    let sum_x2: f64 = (0..ys.len()).map(|x| (x * x) as f64).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    let slope = if denominator != 0.0 {
        (n * sum_xy - sum_x * sum_y) / denominator
    } else {
        0.0
    };
    let intercept = (sum_y - slope * sum_x) / n;
    (slope, intercept)
}

/// Linear trend over weekly totals, extrapolated `horizon_days / 7` weeks past
/// the last observed week.
///
/// With fewer than two observed weeks there is no line to fit; the moving
/// average is used instead and the projection says so.
pub fn trend(history: &DemandHistory, horizon_days: u32) -> Projection {
    let weekly: Vec<f64> = history.weekly_quantities().into_iter().map(|q| q as f64).collect();

    if weekly.len() < 2 {
        let fallback = moving_average(history, horizon_days);
        return Projection {
            parameters: ForecastParameters::Trend {
                slope: 0.0,
                intercept: 0.0,
                weeks_analyzed: weekly.len(),
            },
            note: Some("fewer than two weeks with sales; trend fell back to moving average".to_string()),
            ..fallback
        };
    }

    let (slope, intercept) = least_squares(&weekly);
    let last_week_index = (weekly.len() - 1) as f64;
    let horizon_weeks = f64::from(horizon_days) / 7.0;
    let forecast = slope * (last_week_index + horizon_weeks) + intercept;
    let daily_rate = weekly.iter().sum::<f64>() / weekly.len() as f64 / 7.0;

    Projection::new(
        daily_rate,
        forecast,
        ForecastParameters::Trend {
            slope,
            intercept,
            weeks_analyzed: weekly.len(),
        },
    )
}

/// Observed days weighted `1..=N` from oldest to newest.
pub fn weighted_moving_average(history: &DemandHistory, horizon_days: u32) -> Projection {
    let daily = history.daily_quantities();
    let n = daily.len();
    let total_weight = (n * (n + 1) / 2) as f64;
    let rate = if total_weight > 0.0 {
        daily
            .iter()
            .enumerate()
            .map(|(i, q)| (i + 1) as f64 * *q as f64)
            .sum::<f64>()
            / total_weight
    } else {
        0.0
    };

    Projection::new(
        rate,
        rate * f64::from(horizon_days),
        ForecastParameters::Weighted { days_weighted: n },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pharmacy_core::{MedicineId, SaleId};
    use pharmacy_sales::SaleRecord;
    use rust_decimal::Decimal;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap()
    }

    /// `quantities[i]` sold `quantities.len() - i` days before `now`.
    fn history(quantities: &[u32], lookback_days: u32) -> DemandHistory {
        let n = quantities.len() as i64;
        let sales: Vec<_> = quantities
            .iter()
            .enumerate()
            .filter(|(_, q)| **q > 0)
            .map(|(i, q)| {
                SaleRecord::new(SaleId::from_u128(i as u128), now() - Duration::days(n - i as i64) + Duration::hours(9))
                    .with_line(MedicineId::from_u128(1), None, *q, Decimal::ONE)
                    .unwrap()
            })
            .collect();
        DemandHistory::extract(&sales, None, now(), lookback_days)
    }

    #[test]
    fn moving_average_spreads_total_over_lookback() {
        let h = history(&[10, 0, 20], 60);
        let p = moving_average(&h, 30);
        assert_eq!(p.daily_rate, 0.5);
        assert_eq!(p.forecasted_quantity, 15.0);
    }

    #[test]
    fn exponential_smoothing_seeds_with_first_value() {
        let h = history(&[10, 20], 60);
        let p = exponential_smoothing(&h, 10, 0.5);
        assert_eq!(p.daily_rate, 15.0);
        assert_eq!(p.forecasted_quantity, 150.0);
        assert_eq!(p.parameters, ForecastParameters::Smoothing { alpha: 0.5 });
    }

    #[test]
    fn exponential_with_alpha_one_tracks_last_observation() {
        let h = history(&[3, 9, 0, 4], 60);
        let p = exponential_smoothing(&h, 7, 1.0);
        assert_eq!(p.forecasted_quantity, 28.0);
    }

    #[test]
    fn weighted_favours_recent_days() {
        // weights 1, 2, 3 → (1·3 + 2·6 + 3·9) / 6 = 7
        let h = history(&[3, 6, 9], 60);
        let p = weighted_moving_average(&h, 2);
        assert_eq!(p.daily_rate, 7.0);
        assert_eq!(p.forecasted_quantity, 14.0);
        assert_eq!(p.parameters, ForecastParameters::Weighted { days_weighted: 3 });
    }

    #[test]
    fn least_squares_recovers_exact_line() {
        let (slope, intercept) = least_squares(&[2.0, 4.0, 6.0, 8.0]);
        assert!((slope - 2.0).abs() < 1e-9);
        assert!((intercept - 2.0).abs() < 1e-9);
    }

    #[test]
    fn trend_with_single_week_falls_back() {
        let h = history(&[5, 5], 60);
        let p = trend(&h, 30);
        assert_eq!(p.forecasted_quantity, moving_average(&h, 30).forecasted_quantity);
        assert!(p.note.is_some());
    }

    #[test]
    fn rising_trend_extrapolates_from_last_observed_week() {
        // One Monday sale per ISO week: weekly totals 4, 14, 14, 14, 14.
        // Least squares over x = 0..4 gives slope 2, intercept 8.
        let sales: Vec<_> = [(6, 24, 4u32), (7, 1, 14), (7, 8, 14), (7, 15, 14), (7, 22, 14)]
            .iter()
            .enumerate()
            .map(|(i, (month, day, q))| {
                SaleRecord::new(SaleId::from_u128(i as u128), Utc.with_ymd_and_hms(2024, *month, *day, 9, 0, 0).unwrap())
                    .with_line(MedicineId::from_u128(1), None, *q, Decimal::ONE)
                    .unwrap()
            })
            .collect();
        let h = DemandHistory::extract(&sales, None, now(), 60);
        assert_eq!(h.weekly_quantities(), vec![4, 14, 14, 14, 14]);

        let p = trend(&h, 30);
        let expected = 2.0 * (4.0 + 30.0 / 7.0) + 8.0;
        assert!((p.forecasted_quantity - expected).abs() < 1e-9, "got {}", p.forecasted_quantity);
        assert!((p.daily_rate - 60.0 / 5.0 / 7.0).abs() < 1e-9);
        assert!(p.note.is_none());
        match p.parameters {
            ForecastParameters::Trend { slope, intercept, weeks_analyzed } => {
                assert!((slope - 2.0).abs() < 1e-9);
                assert!((intercept - 8.0).abs() < 1e-9);
                assert_eq!(weeks_analyzed, 5);
            }
            other => panic!("Expected trend parameters, got {other:?}"),
        }
    }

    #[test]
    fn declining_trend_clamps_at_zero() {
        // One sale per week, falling steeply: 40, 20, 1.
        let sales: Vec<_> = [(21, 40u32), (14, 20), (7, 1)]
            .iter()
            .enumerate()
            .map(|(i, (days_ago, q))| {
                SaleRecord::new(SaleId::from_u128(i as u128), now() - Duration::days(*days_ago))
                    .with_line(MedicineId::from_u128(1), None, *q, Decimal::ONE)
                    .unwrap()
            })
            .collect();
        let h = DemandHistory::extract(&sales, None, now(), 60);

        let p = trend(&h, 70);
        assert_eq!(p.forecasted_quantity, 0.0);
        match p.parameters {
            ForecastParameters::Trend { slope, weeks_analyzed, .. } => {
                assert!(slope < 0.0);
                assert_eq!(weeks_analyzed, 3);
            }
            other => panic!("Expected trend parameters, got {other:?}"),
        }
    }
}
