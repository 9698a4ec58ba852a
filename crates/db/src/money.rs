//! Conversion between peso amounts and stored centavos.
//!
//! Amounts are persisted as `BIGINT` centavos so sums are exact on every
//! backend. Domain amounts have at most two decimal places, so the
//! conversion is lossless.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Converts a peso amount to centavos.
///
/// # Errors
///
/// Returns a message if the amount does not fit in an `i64`.
pub fn to_centavos(amount: Decimal) -> Result<i64, String> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|c| c.round_dp(0))
        .and_then(|c| c.to_i64())
        .ok_or_else(|| format!("amount {amount} is out of range"))
}

/// Converts stored centavos to a peso amount with two decimal places.
#[must_use]
pub fn from_centavos(centavos: i64) -> Decimal {
    Decimal::new(centavos, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_centavos() {
        assert_eq!(to_centavos(dec!(2000)).unwrap(), 200_000);
        assert_eq!(to_centavos(dec!(1234.56)).unwrap(), 123_456);
        assert_eq!(to_centavos(dec!(0.1)).unwrap(), 10);
        assert_eq!(to_centavos(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_from_centavos() {
        assert_eq!(from_centavos(123_456), dec!(1234.56));
        assert_eq!(from_centavos(200_000), dec!(2000));
    }

    #[test]
    fn test_out_of_range() {
        assert!(to_centavos(Decimal::MAX).is_err());
    }
}
