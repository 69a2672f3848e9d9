use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Round `v` to `dp` decimal places through an exact decimal representation.
///
/// Non-finite values are returned unchanged.
///
/// ```
/// use envdb_core::round_to;
/// assert_eq!(round_to(7.230_769_2, 3), 7.231);
/// assert_eq!(round_to(2.5, 0), 2.0);
/// ```
#[must_use]
pub fn round_to(v: f64, dp: u32) -> f64 {
    Decimal::from_f64_retain(v)
        .map(|d| d.round_dp(dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(v)
}

/// [`round_to`] lifted over a missing value.
#[must_use]
pub fn round_opt(v: Option<f64>, dp: u32) -> Option<f64> {
    v.map(|x| round_to(x, dp))
}
