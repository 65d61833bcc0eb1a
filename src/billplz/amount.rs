use std::str::FromStr;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde_json::Value;

use crate::err_responses::BillError;

/// Reads `total_amount` from either a JSON number or a numeric string.
pub fn parse_amount(raw: &Value) -> Result<Decimal, BillError> {
    let text = match raw {
        // serde_json prints floats with the shortest round-tripping form, so 19.995 stays 19.995
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return Err(invalid_amount()),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid_amount())
}

/// Converts ringgit to sen, rounding half away from zero.
pub fn to_minor_units(amount: Decimal) -> Result<i64, BillError> {
    if amount <= Decimal::ZERO {
        return Err(BillError::InvalidRequest(
            "total_amount must be greater than zero".to_string(),
        ));
    }

    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|sen| sen.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|sen| sen.to_i64())
        .ok_or_else(invalid_amount)?;

    if minor == 0 {
        return Err(BillError::InvalidRequest(
            "total_amount is smaller than the smallest billable unit".to_string(),
        ));
    }
    Ok(minor)
}

fn invalid_amount() -> BillError {
    BillError::InvalidRequest("total_amount must be a valid number".to_string())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sen(raw: Value) -> Result<i64, BillError> {
        parse_amount(&raw).and_then(to_minor_units)
    }

    #[test]
    fn rounds_half_away_from_zero_at_the_half_sen_boundary() {
        assert_eq!(sen(json!(19.995)).unwrap(), 2000);
        assert_eq!(sen(json!("19.995")).unwrap(), 2000);
        assert_eq!(sen(json!(19.994)).unwrap(), 1999);
        assert_eq!(sen(json!(0.005)).unwrap(), 1);
        assert_eq!(sen(json!(1.005)).unwrap(), 101);
    }

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(sen(json!(12)).unwrap(), 1200);
        assert_eq!(sen(json!(12.5)).unwrap(), 1250);
        assert_eq!(sen(json!(" 49.90 ")).unwrap(), 4990);
        assert_eq!(sen(json!("1e2")).unwrap(), 10000);
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for raw in [json!(0), json!(-5), json!("-0.01"), json!(0.004)] {
            assert!(
                matches!(sen(raw.clone()), Err(BillError::InvalidRequest(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        for raw in [json!("abc"), json!(true), json!([1]), json!({ "value": 1 })] {
            assert!(
                matches!(sen(raw.clone()), Err(BillError::InvalidRequest(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_amounts_too_large_to_bill() {
        assert!(matches!(
            sen(json!("79228162514264337593543950335")),
            Err(BillError::InvalidRequest(_))
        ));
    }
}
