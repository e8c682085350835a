//! Money calculation utilities using rust_decimal for precision
//!
//! Models keep `f64`; every sum and comparison goes through `Decimal`.

use rust_decimal::prelude::*;
use shared::models::OrderItem;

/// 2 decimal places, half-up
const DECIMAL_PLACES: u32 = 2;

/// Tolerance for monetary comparisons (0.01)
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Line amount: price × quantity
pub fn line_total(item: &OrderItem) -> Decimal {
    to_decimal(item.price) * Decimal::from(item.quantity)
}

/// Sum of all line amounts, rounded to 2 decimal places
pub fn items_total(items: &[OrderItem]) -> f64 {
    to_f64(items.iter().map(line_total).sum())
}

/// Two amounts are equal within 0.01
pub fn totals_match(a: f64, b: f64) -> bool {
    (to_decimal(a) - to_decimal(b)).abs() <= MONEY_TOLERANCE
}

/// Finite and strictly positive
pub fn is_positive_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Amount in minor currency units (paise / cents)
pub fn to_minor_units(amount: f64) -> i64 {
    (to_decimal(amount) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default()
}
