//! Value object trait: equality by value, not identity.
//!
//! Most of what the engine consumes and produces (sale records, windows,
//! summaries, forecasts) are value objects: two instances with the same fields
//! are interchangeable.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one. This is what lets callers share engine inputs and outputs
/// across threads without coordination.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct PeriodTotals {
///     sales_count: u64,
///     revenue: Decimal,
/// }
///
/// impl ValueObject for PeriodTotals {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
