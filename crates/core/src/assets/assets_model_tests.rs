//! Tests for asset domain models.

use rust_decimal_macros::dec;

use super::*;
use crate::errors::{Error, ValidationError};

#[test]
fn test_normalize_symbol_trims_and_uppercases() {
    assert_eq!(normalize_symbol("  aapl ").unwrap(), "AAPL");
    assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
}

#[test]
fn test_normalize_symbol_rejects_blank_and_long() {
    assert!(matches!(
        normalize_symbol("   "),
        Err(Error::Validation(ValidationError::MissingField(_)))
    ));
    assert!(normalize_symbol(&"X".repeat(21)).is_err());
}

#[test]
fn test_zero_quantity_buy_is_rejected() {
    let mut buy = NewBuy::new("AAPL", dec!(0), dec!(100));
    let err = buy.validate().unwrap_err();
    match err {
        Error::Validation(ValidationError::NonPositive(field)) => assert_eq!(field, "quantity"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_negative_price_buy_is_rejected() {
    let mut buy = NewBuy::new("AAPL", dec!(1), dec!(-3));
    assert!(matches!(
        buy.validate(),
        Err(Error::Validation(ValidationError::NonPositive(ref f))) if f == "price"
    ));
}

#[test]
fn test_buy_with_excess_precision_is_rejected() {
    let mut buy = NewBuy::new("AAPL", dec!(1.00001), dec!(10));
    assert!(matches!(
        buy.validate(),
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));

    // Trailing zeros are not extra precision.
    let mut buy = NewBuy::new("AAPL", dec!(1.500000), dec!(10));
    assert!(buy.validate().is_ok());
}

#[test]
fn test_buy_beyond_sixteen_integer_digits_is_rejected() {
    let mut buy = NewBuy::new("BIG", dec!(10000000000000000), dec!(1));
    assert!(matches!(
        buy.validate(),
        Err(Error::Validation(ValidationError::OutOfRange(ref f))) if f == "quantity"
    ));

    let mut buy = NewBuy::new("BIG", dec!(1), dec!(9999999999999999.9999));
    assert!(buy.validate().is_ok());
}

#[test]
fn test_asset_update_detects_quantity_key_even_when_null() {
    let update: AssetUpdate = serde_json::from_str(r#"{"quantity": null}"#).unwrap();
    assert_eq!(update.blocked_fields(), vec!["quantity".to_string()]);

    let update: AssetUpdate =
        serde_json::from_str(r#"{"symbol": "msft", "quantity": 3, "average_price": 1.5}"#)
            .unwrap();
    assert_eq!(
        update.blocked_fields(),
        vec!["quantity".to_string(), "average_price".to_string()]
    );
}

#[test]
fn test_asset_update_validate_names_blocked_fields() {
    let mut update: AssetUpdate = serde_json::from_str(r#"{"quantity": 99}"#).unwrap();
    let err = update.validate().unwrap_err();
    match err {
        Error::Validation(ref v @ ValidationError::ReadOnlyFields(_)) => {
            assert_eq!(v.fields(), vec!["quantity".to_string()]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_asset_update_normalizes_symbol() {
    let mut update: AssetUpdate = serde_json::from_str(r#"{"symbol": " msft "}"#).unwrap();
    update.validate().unwrap();
    assert_eq!(update.symbol.as_deref(), Some("MSFT"));
}

#[test]
fn test_canonical_order_breaks_ties_by_id() {
    let at = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let tx = |id: &str, created_at| AssetTransaction {
        id: id.to_string(),
        asset_id: "a1".to_string(),
        quantity: dec!(1),
        price: dec!(1),
        created_at,
    };
    let mut ledger = vec![
        tx("b", at),
        tx("a", at),
        tx("z", at - chrono::Duration::seconds(1)),
    ];
    AssetTransaction::sort_canonical(&mut ledger);
    let ids: Vec<&str> = ledger.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "b"]);
}
