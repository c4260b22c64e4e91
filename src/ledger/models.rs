use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Payment status of a contract (lease or rental)
///
/// Starts `unpaid`, flips to `paid` once the accumulated payments cover
/// the total, and to `cancel` when the contract is frozen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Cancel,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Cancel => "cancel",
        }
    }
}

/// Lifecycle status of a contract, distinct from its payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "contract_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Active,
    Ended,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Active => "active",
            ContractStatus::Ended => "ended",
        }
    }
}

/// Status of a rentable asset (car or license plate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "asset_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Available,
    Rented,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Available => "available",
            AssetStatus::Rented => "rented",
        }
    }
}

/// Billing cadence of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "rent_frequency", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Weekly,
    Biweekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "rental_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RentalType {
    Lease,
    LeaseToOwn,
}

/// One recorded payment against a contract
///
/// Payments are append-only: created once by the record store with the
/// audit fields stamped at insert, never edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub contract_id: Uuid,

    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Calendar date chosen by the operator; may differ from `create_time`
    pub payment_date: NaiveDate,
    pub note: Option<String>,
    pub create_by: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
}

/// Money aggregate of a contract, maintained server-side
///
/// `total_amount` is fixed at creation (or edited explicitly); it is
/// never derived from payments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractTotals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    pub payment_status: PaymentStatus,
}

impl ContractTotals {
    /// Fresh totals for a newly created contract
    pub fn new(total_amount: Decimal) -> Self {
        Self {
            total_amount,
            paid_amount: Decimal::ZERO,
            remaining_amount: total_amount.max(Decimal::ZERO),
            payment_status: PaymentStatus::Unpaid,
        }
    }

    /// Apply an accepted payment, returning the updated totals
    ///
    /// Decimal arithmetic is exact, so the comparison against the total
    /// needs no epsilon. Once paid covers the total, the contract is
    /// marked paid and pinned at exactly `{paid: total, remaining: 0}`.
    pub fn apply_payment(&self, amount: Decimal) -> ContractTotals {
        let paid = (self.paid_amount + amount).round_dp(2);
        if paid >= self.total_amount {
            ContractTotals {
                total_amount: self.total_amount,
                paid_amount: self.total_amount,
                remaining_amount: Decimal::ZERO,
                payment_status: PaymentStatus::Paid,
            }
        } else {
            ContractTotals {
                total_amount: self.total_amount,
                paid_amount: paid,
                remaining_amount: (self.total_amount - paid).round_dp(2),
                payment_status: self.payment_status,
            }
        }
    }

    /// Recompute after an explicit edit of the total amount
    pub fn with_total(&self, total_amount: Decimal) -> ContractTotals {
        ContractTotals {
            total_amount,
            paid_amount: self.paid_amount,
            remaining_amount: (total_amount - self.paid_amount).max(Decimal::ZERO),
            payment_status: self.payment_status,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Freeze the payment obligation
    pub fn frozen(&self) -> ContractTotals {
        ContractTotals {
            payment_status: PaymentStatus::Cancel,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_payment_keeps_unpaid_status() {
        let totals = ContractTotals::new(dec!(1000));
        let updated = totals.apply_payment(dec!(300));

        assert_eq!(updated.paid_amount, dec!(300));
        assert_eq!(updated.remaining_amount, dec!(700));
        assert_eq!(updated.payment_status, PaymentStatus::Unpaid);
    }

    #[test]
    fn test_exact_final_payment_settles() {
        let totals = ContractTotals::new(dec!(500)).apply_payment(dec!(200));
        let updated = totals.apply_payment(dec!(300));

        assert_eq!(updated.paid_amount, dec!(500));
        assert_eq!(updated.remaining_amount, Decimal::ZERO);
        assert!(updated.is_settled());
    }

    #[test]
    fn test_overshoot_pins_paid_to_total() {
        let totals = ContractTotals::new(dec!(100));
        let updated = totals.apply_payment(dec!(150));

        assert_eq!(updated.paid_amount, dec!(100));
        assert_eq!(updated.remaining_amount, Decimal::ZERO);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
    }

    #[test]
    fn test_amounts_round_to_cents() {
        let totals = ContractTotals::new(dec!(10));
        let updated = totals.apply_payment(dec!(3.333));

        assert_eq!(updated.paid_amount, dec!(3.33));
        assert_eq!(updated.remaining_amount, dec!(6.67));
    }

    #[test]
    fn test_total_edit_recomputes_remaining_clamped() {
        let totals = ContractTotals::new(dec!(1000)).apply_payment(dec!(400));

        let raised = totals.with_total(dec!(1200));
        assert_eq!(raised.remaining_amount, dec!(800));

        let lowered = totals.with_total(dec!(300));
        assert_eq!(lowered.remaining_amount, Decimal::ZERO);
        assert_eq!(lowered.paid_amount, dec!(400));
    }

    #[test]
    fn test_status_enums_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Cancel).unwrap(),
            "\"cancel\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            "\"unpaid\""
        );
        assert_eq!(
            serde_json::to_string(&ContractStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&AssetStatus::Rented).unwrap(),
            "\"rented\""
        );
        assert_eq!(
            serde_json::to_string(&RentalType::LeaseToOwn).unwrap(),
            "\"lease_to_own\""
        );
    }

    #[test]
    fn test_status_enums_match_their_sql_literals() {
        for status in [
            PaymentStatus::Unpaid,
            PaymentStatus::Paid,
            PaymentStatus::Cancel,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(ContractStatus::Active.as_str(), "active");
        assert_eq!(AssetStatus::Available.as_str(), "available");
    }

    #[test]
    fn test_freeze_only_touches_payment_status() {
        let totals = ContractTotals::new(dec!(1000)).apply_payment(dec!(100));
        let frozen = totals.frozen();

        assert_eq!(frozen.payment_status, PaymentStatus::Cancel);
        assert_eq!(frozen.paid_amount, totals.paid_amount);
        assert_eq!(frozen.remaining_amount, totals.remaining_amount);
    }
}
