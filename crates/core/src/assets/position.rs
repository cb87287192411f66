//! Weighted-average cost basis merge.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::utils::decimal_utils::round_storage;
use crate::{Error, Result};

/// Aggregate holding state of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub quantity: Decimal,
    pub average_price: Decimal,
}

impl Position {
    pub fn new(quantity: Decimal, average_price: Decimal) -> Self {
        Self {
            quantity,
            average_price,
        }
    }

    /// Total amount paid for the position at its average price, or `None`
    /// when it does not fit in a `Decimal`.
    pub fn total_cost(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.average_price)
    }

    /// Merges a buy into this position.
    ///
    /// The average is recomputed from the stored (already rounded) average, so
    /// the result matches what a sequence of persisted buys produces. A merge
    /// whose cost or quantity overflows is rejected and leaves nothing to write.
    pub fn merge_buy(&self, quantity: Decimal, price: Decimal) -> Result<Position> {
        let new_total_cost = self
            .total_cost()
            .zip(quantity.checked_mul(price))
            .and_then(|(held, bought)| held.checked_add(bought))
            .ok_or_else(|| out_of_range("price"))?;
        let new_total_quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| out_of_range("quantity"))?;
        if new_total_quantity.is_zero() {
            return Ok(Position::new(Decimal::ZERO, Decimal::ZERO));
        }
        let average_price = new_total_cost
            .checked_div(new_total_quantity)
            .ok_or_else(|| out_of_range("price"))?;
        Ok(Position {
            quantity: round_storage(new_total_quantity),
            average_price: round_storage(average_price),
        })
    }
}

fn out_of_range(field: &str) -> Error {
    Error::Validation(ValidationError::OutOfRange(field.to_string()))
}

/// State of a position after a buy of `quantity` at `price`.
///
/// `existing` is `None` for the first buy of a symbol in a portfolio, which
/// opens the position at the buy price.
pub fn apply_buy_to_position(
    existing: Option<&Position>,
    quantity: Decimal,
    price: Decimal,
) -> Result<Position> {
    match existing {
        None => Ok(Position::new(round_storage(quantity), round_storage(price))),
        Some(position) => position.merge_buy(quantity, price),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_buy_opens_position() {
        let position = apply_buy_to_position(None, dec!(10), dec!(100)).unwrap();
        assert_eq!(position, Position::new(dec!(10), dec!(100)));
    }

    #[test]
    fn test_second_buy_recomputes_weighted_average() {
        let first = apply_buy_to_position(None, dec!(10), dec!(100)).unwrap();
        let second = apply_buy_to_position(Some(&first), dec!(5), dec!(120)).unwrap();
        assert_eq!(second.quantity, dec!(15));
        assert_eq!(second.average_price, dec!(106.6667));
    }

    #[test]
    fn test_same_price_keeps_average() {
        let mut position = apply_buy_to_position(None, dec!(2.5), dec!(42.1)).unwrap();
        for _ in 0..9 {
            position = apply_buy_to_position(Some(&position), dec!(2.5), dec!(42.1)).unwrap();
        }
        assert_eq!(position.quantity, dec!(25));
        assert_eq!(position.average_price, dec!(42.1));
    }

    #[test]
    fn test_overflowing_merge_is_rejected() {
        let huge = Position::new(dec!(1000000000000000), dec!(1000000000000000));
        let err = apply_buy_to_position(
            Some(&huge),
            dec!(1000000000000000),
            dec!(1000000000000000),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::OutOfRange(ref f)) if f == "price"
        ));
    }
}
