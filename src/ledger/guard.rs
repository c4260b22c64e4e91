use rust_decimal::Decimal;

use crate::error::PaymentError;

/// Pre-check a payment submission against the remaining balance.
///
/// Applied twice on the pay path: once against the caller-supplied
/// snapshot to fail fast, and once inside the pay transaction against
/// freshly read totals, where it is authoritative. `amount == remaining`
/// is accepted and settles the contract.
pub fn check_payment(amount: Decimal, remaining_amount: Decimal) -> Result<(), PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::InvalidAmount { amount });
    }
    if amount > remaining_amount {
        return Err(PaymentError::ExceedsRemaining {
            remaining: remaining_amount,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rejects_amount_above_remaining() {
        let err = check_payment(dec!(250), dec!(200)).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::ExceedsRemaining { remaining } if remaining == dec!(200)
        ));
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert!(matches!(
            check_payment(dec!(-5), dec!(200)),
            Err(PaymentError::InvalidAmount { .. })
        ));
        assert!(matches!(
            check_payment(Decimal::ZERO, dec!(200)),
            Err(PaymentError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_accepts_exact_remaining() {
        assert!(check_payment(dec!(200), dec!(200)).is_ok());
    }

    #[test]
    fn test_accepts_partial_payment() {
        assert!(check_payment(dec!(0.01), dec!(200)).is_ok());
    }
}
