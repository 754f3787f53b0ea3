//! Monetary rounding policy.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` in whole currency units.
//!
//! The rounding policy lives here and nowhere else: both aggregate and
//! per-line-item approval arithmetic go through these two functions, so
//! there is exactly one place where half-up rounding is decided.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount half-up to the nearest whole currency unit.
///
/// Amounts in this system are non-negative, so midpoint-away-from-zero
/// is half-up rounding.
#[must_use]
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Applies a whole-percent approval to an amount.
///
/// A percentage of 100 returns the amount unchanged: full approval must
/// reproduce the requested value exactly, with no rounding drift. Any
/// other percentage is rounded half-up to the whole currency unit.
///
/// # Panics
///
/// Does not panic for `percentage <= 100`; callers validate the range.
#[must_use]
pub fn apply_percentage(amount: Decimal, percentage: u8) -> Decimal {
    if percentage == 100 {
        return amount;
    }
    round_currency(amount * Decimal::from(percentage) / Decimal::ONE_HUNDRED)
}
