use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::{DISPLAY_DECIMAL_PRECISION, STORAGE_DECIMAL_PRECISION};

/// Rounds a value for presentation (2 dp, banker's rounding).
pub fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        DISPLAY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointNearestEven,
    )
}

/// Rounds a value to the fixed scale of the stored position columns.
pub fn round_storage(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(
        STORAGE_DECIMAL_PRECISION,
        RoundingStrategy::MidpointNearestEven,
    )
}

/// `numerator / denominator * 100`, or `None` when the denominator is zero.
pub fn percentage_of(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    numerator
        .checked_div(denominator)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}
