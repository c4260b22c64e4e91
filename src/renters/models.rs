use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Renter {
    pub id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub driver_license_number: String,
    pub driver_license_state: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRenterRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: String,
    #[validate(length(min = 7, max = 20))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 4, max = 64))]
    pub driver_license_number: String,
    #[serde(default = "default_license_state")]
    #[validate(length(min = 2, max = 2))]
    pub driver_license_state: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

fn default_license_state() -> String {
    "NY".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRenterRequest {
    #[validate(length(min = 1, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 7, max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 4, max = 64))]
    pub driver_license_number: Option<String>,
    #[validate(length(min = 2, max = 2))]
    pub driver_license_state: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

/// Single `search` term matched against name, email, phone and license
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenterFilter {
    pub search: Option<String>,
}
