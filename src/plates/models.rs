use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::ledger::models::AssetStatus;

/// License plate owned by the fleet, leased out independently of cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LicensePlate {
    pub id: Uuid,
    pub plate_number: String,
    pub plate_state: String,
    pub purchase_date: NaiveDate,

    #[serde(with = "rust_decimal::serde::float")]
    pub purchase_amount: Decimal,

    pub status: AssetStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePlateRequest {
    #[validate(length(min = 2, max = 16))]
    pub plate_number: String,
    #[serde(default = "default_plate_state")]
    #[validate(length(min = 2, max = 2))]
    pub plate_state: String,
    pub purchase_date: NaiveDate,

    #[serde(with = "rust_decimal::serde::float")]
    pub purchase_amount: Decimal,

    #[serde(default)]
    pub status: Option<AssetStatus>,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

fn default_plate_state() -> String {
    "NY".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePlateRequest {
    #[validate(length(min = 2, max = 16))]
    pub plate_number: Option<String>,
    #[validate(length(min = 2, max = 2))]
    pub plate_state: Option<String>,
    pub purchase_date: Option<NaiveDate>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub purchase_amount: Option<Decimal>,

    pub status: Option<AssetStatus>,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlateFilter {
    pub plate_number: Option<String>,
    pub status: Option<AssetStatus>,
}
