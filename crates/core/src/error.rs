//! Engine error model.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type used across the engine.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Engine-level error.
///
/// Only caller mistakes are errors. Sparse or empty data is never reported here:
/// it degrades to zero-valued results (optionally carrying a note).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A window whose end precedes its start.
    #[error("invalid time window: end {end} precedes start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A forecast method name outside the supported set.
    #[error("unknown forecast method '{0}' (expected one of: moving-average, exponential, trend, weighted)")]
    UnknownMethod(String),

    /// A tuning parameter failed validation (e.g. smoothing factor out of range).
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AnalyticsError {
    pub fn invalid_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::InvalidWindow { start, end }
    }

    pub fn unknown_method(name: impl Into<String>) -> Self {
        Self::UnknownMethod(name.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
