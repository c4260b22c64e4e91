use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::ledger::models::AssetStatus;

/// Fleet car entity
///
/// `car_id` is a small sequential display number assigned on create;
/// the UUID stays the canonical identifier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub car_id: Option<i32>,
    pub model: String,
    pub wav: i32,
    pub marker: Option<String>,
    pub color: Option<String>,
    pub year: i32,
    pub vin_number: Option<String>,
    pub plate_number: Option<String>,
    pub state: String,
    pub registration_expires_at: Option<DateTime<Utc>>,
    pub insurance_expires_at: Option<DateTime<Utc>>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub installation_fee_for_safety_equipment: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub insurance_expenses: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub service_expenses: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub maintenance_costs: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub full_coverage_auto_insurance: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub other_expenses: Option<Decimal>,

    pub status: AssetStatus,
    pub notes: Option<String>,
    pub create_by: Option<String>,
    pub create_time: Option<DateTime<Utc>>,
    pub update_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 255))]
    pub model: String,
    #[serde(default)]
    pub wav: i32,
    pub marker: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    #[validate(length(max = 64))]
    pub vin_number: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub plate_number: Option<String>,
    #[serde(default = "default_state")]
    #[validate(length(min = 2, max = 2))]
    pub state: String,
    pub registration_expires_at: Option<DateTime<Utc>>,
    pub insurance_expires_at: Option<DateTime<Utc>>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub installation_fee_for_safety_equipment: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub insurance_expenses: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub service_expenses: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub maintenance_costs: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub full_coverage_auto_insurance: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub other_expenses: Option<Decimal>,

    #[serde(default)]
    pub status: Option<AssetStatus>,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

fn default_state() -> String {
    "NY".to_string()
}

/// Partial update; absent fields keep their current values
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 255))]
    pub model: Option<String>,
    pub wav: Option<i32>,
    pub marker: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(max = 64))]
    pub vin_number: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub plate_number: Option<String>,
    #[validate(length(min = 2, max = 2))]
    pub state: Option<String>,
    pub registration_expires_at: Option<DateTime<Utc>>,
    pub insurance_expires_at: Option<DateTime<Utc>>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub installation_fee_for_safety_equipment: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub insurance_expenses: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub service_expenses: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub maintenance_costs: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub full_coverage_auto_insurance: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub other_expenses: Option<Decimal>,

    pub status: Option<AssetStatus>,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

/// List filters, all substring matches except `status`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarFilter {
    pub model: Option<String>,
    pub plate_number: Option<String>,
    pub status: Option<AssetStatus>,
}
