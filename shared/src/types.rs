//! Common types for the shared crate

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Monetary amount in currency units
///
/// Decimal everywhere: line totals and aggregate totals must be exact,
/// never floating point.
pub type Money = rust_decimal::Decimal;
