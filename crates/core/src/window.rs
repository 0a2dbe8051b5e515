//! Half-open time windows used to scope every query the engine answers.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::value_object::ValueObject;

/// Half-open interval `[start, end)`.
///
/// Invariant: `start <= end`. The only way to build one is through
/// [`TimeWindow::new`] (or helpers built on it), so an instance is always valid.
/// Deserialization goes through the same check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = AnalyticsError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        TimeWindow::new(raw.start, raw.end)
    }
}

impl TimeWindow {
    /// Build a window, failing fast when `end` precedes `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AnalyticsResult<Self> {
        if end < start {
            return Err(AnalyticsError::invalid_window(start, end));
        }
        Ok(Self { start, end })
    }

    /// Trailing window `[now - days, now)`.
    ///
    /// A lookback reaching past the earliest representable instant starts at
    /// [`DateTime::<Utc>::MIN_UTC`] instead.
    pub fn trailing(now: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: saturating_sub(now, Duration::try_days(i64::from(days))),
            end: now,
        }
    }

    /// The equal-length window ending exactly where this one starts.
    ///
    /// Clipped at [`DateTime::<Utc>::MIN_UTC`], so it may be shorter than `self`.
    pub fn preceding(&self) -> Self {
        Self {
            start: saturating_sub(self.start, Some(self.duration())),
            end: self.start,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// `true` when `ts ∈ [start, end)`.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl ValueObject for TimeWindow {}

fn saturating_sub(instant: DateTime<Utc>, span: Option<Duration>) -> DateTime<Utc> {
    span.and_then(|span| instant.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn new_rejects_end_before_start() {
        let err = TimeWindow::new(at(2, 0), at(1, 0)).unwrap_err();
        assert_eq!(err, AnalyticsError::invalid_window(at(2, 0), at(1, 0)));
    }

    #[test]
    fn zero_length_window_is_valid_and_contains_nothing() {
        let w = TimeWindow::new(at(1, 0), at(1, 0)).unwrap();
        assert!(w.is_empty());
        assert!(!w.contains(at(1, 0)));
    }

    #[test]
    fn end_is_exclusive() {
        let w = TimeWindow::new(at(1, 0), at(2, 0)).unwrap();
        assert!(w.contains(at(1, 0)));
        assert!(w.contains(at(1, 23)));
        assert!(!w.contains(at(2, 0)));
    }

    #[test]
    fn preceding_has_same_length_and_touches_start() {
        let w = TimeWindow::new(at(10, 0), at(17, 0)).unwrap();
        let prev = w.preceding();
        assert_eq!(prev.end(), w.start());
        assert_eq!(prev.duration(), w.duration());
        assert_eq!(prev.start(), at(3, 0));
    }

    #[test]
    fn trailing_ends_at_now() {
        let w = TimeWindow::trailing(at(31, 12), 30);
        assert_eq!(w.end(), at(31, 12));
        assert_eq!(w.start(), at(1, 12));
    }

    #[test]
    fn lookback_past_calendar_start_saturates() {
        let w = TimeWindow::trailing(at(31, 12), u32::MAX);
        assert_eq!(w.start(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(w.end(), at(31, 12));
        assert!(w.contains(at(1, 0)));

        let prev = w.preceding();
        assert_eq!(prev.start(), DateTime::<Utc>::MIN_UTC);
        assert_eq!(prev.end(), w.start());
        assert!(prev.is_empty());
    }

    #[test]
    fn deserialize_enforces_ordering() {
        let json = r#"{"start":"2024-05-02T00:00:00Z","end":"2024-05-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<TimeWindow>(json).is_err());

        let json = r#"{"start":"2024-05-01T00:00:00Z","end":"2024-05-02T00:00:00Z"}"#;
        let w: TimeWindow = serde_json::from_str(json).unwrap();
        assert_eq!(w.start(), at(1, 0));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: construction succeeds exactly when start <= end.
        #[test]
        fn construction_matches_ordering(a in 0i64..1_000_000, b in 0i64..1_000_000) {
            let base = at(1, 0);
            let start = base + Duration::seconds(a);
            let end = base + Duration::seconds(b);
            prop_assert_eq!(TimeWindow::new(start, end).is_ok(), start <= end);
        }
    }
}
