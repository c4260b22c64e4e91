use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::ledger::models::{ContractStatus, ContractTotals, Frequency, PaymentStatus, RentalType};

/// Car rental contract
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub id: Uuid,
    pub car_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,

    pub frequency: Frequency,
    pub status: ContractStatus,
    pub payment_status: PaymentStatus,
    pub rental_type: RentalType,
    pub create_by: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

impl Rental {
    pub fn totals(&self) -> ContractTotals {
        ContractTotals {
            total_amount: self.total_amount,
            paid_amount: self.paid_amount,
            remaining_amount: self.remaining_amount,
            payment_status: self.payment_status,
        }
    }
}

/// Rental row as returned by the API, with denormalized display fields
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RentalRow {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rental: Rental,

    pub car_model: Option<String>,
    pub car_short_id: Option<i32>,
    pub renter_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRentalRequest {
    pub car_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative")]
    pub total_amount: Decimal,

    #[serde(default = "default_frequency")]
    pub frequency: Frequency,
    #[serde(default = "default_rental_type")]
    pub rental_type: RentalType,
    pub create_by: Option<String>,
}

fn default_frequency() -> Frequency {
    Frequency::Monthly
}

fn default_rental_type() -> RentalType {
    RentalType::Lease
}

fn validate_non_negative(amount: &Decimal) -> Result<(), validator::ValidationError> {
    if amount.is_sign_negative() {
        return Err(validator::ValidationError::new("must not be negative"));
    }
    Ok(())
}

/// Partial update; money aggregates only change through pay and freeze,
/// except for `total_amount` edits which recompute the remaining balance.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRentalRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_non_negative_option")]
    pub total_amount: Option<Decimal>,

    pub frequency: Option<Frequency>,
    pub status: Option<ContractStatus>,
    pub rental_type: Option<RentalType>,
}

fn validate_non_negative_option(amount: &Decimal) -> Result<(), validator::ValidationError> {
    validate_non_negative(amount)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RentalFilter {
    pub car_model: Option<String>,
    pub renter_name: Option<String>,
    pub status: Option<ContractStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateRentalRequest = serde_json::from_str(
            r#"{
                "car_id": "6f3c0e0a-0000-0000-0000-000000000001",
                "renter_id": "6f3c0e0a-0000-0000-0000-000000000002",
                "start_date": "2024-06-01",
                "total_amount": 2400.0
            }"#,
        )
        .unwrap();

        assert_eq!(req.frequency, Frequency::Monthly);
        assert_eq!(req.rental_type, RentalType::Lease);
        assert_eq!(req.total_amount, dec!(2400));
    }

    #[test]
    fn test_create_request_accepts_lease_to_own() {
        let req: CreateRentalRequest = serde_json::from_str(
            r#"{
                "car_id": "6f3c0e0a-0000-0000-0000-000000000001",
                "renter_id": "6f3c0e0a-0000-0000-0000-000000000002",
                "start_date": "2024-06-01",
                "total_amount": 2400.0,
                "rental_type": "lease_to_own"
            }"#,
        )
        .unwrap();

        assert_eq!(req.rental_type, RentalType::LeaseToOwn);
    }
}
