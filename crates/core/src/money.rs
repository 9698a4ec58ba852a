//! Monetary input validation.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` with at most two decimal places.

use rust_decimal::Decimal;

/// Maximum number of decimal places accepted for a peso amount.
pub const MAX_SCALE: u32 = 2;

/// Largest accepted amount: `i64::MAX` centavos, the storage limit.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(u32::MAX, 0x7FFF_FFFF, 0, false, 2);

/// Checks that `amount` is a non-negative peso amount with at most two
/// decimal places. Returns a message naming `field` on failure.
///
/// # Errors
///
/// Returns a human-readable message describing the violation.
pub fn check_amount(field: &str, amount: Decimal) -> Result<(), String> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(format!("{field} cannot be negative"));
    }
    if amount.normalize().scale() > MAX_SCALE {
        return Err(format!(
            "{field} must have at most {MAX_SCALE} decimal places"
        ));
    }
    if amount > MAX_AMOUNT {
        return Err(format!("{field} cannot exceed {MAX_AMOUNT}"));
    }
    Ok(())
}

/// Sums amounts exactly. Returns `None` on overflow.
#[must_use]
pub fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
}
