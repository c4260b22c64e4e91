use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::migrate::MigrateError;
use thiserror::Error;

/// Top-level error type for the entire application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Payment error: {0}")]
    Payment(#[from] PaymentError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Payment-append errors
///
/// Raised by the submission guard and again by the authoritative check
/// inside the pay transaction.
#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Payment amount must be greater than 0")]
    InvalidAmount { amount: Decimal },

    #[error("Payment amount cannot exceed remaining amount ({remaining})")]
    ExceedsRemaining { remaining: Decimal },

    #[error("Contract payment obligation has been cancelled")]
    ContractFrozen,
}

/// Contract / asset lifecycle errors
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0} already has an active contract")]
    AssetInUse(String),

    #[error("{0} has unpaid contracts")]
    UnpaidObligations(String),

    #[error("A car with plate number '{0}' already exists")]
    DuplicatePlateNumber(String),
}

/// API error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            AppError::Payment(PaymentError::InvalidAmount { amount }) => (
                StatusCode::BAD_REQUEST,
                "INVALID_AMOUNT",
                "Payment amount must be greater than 0".to_string(),
                Some(serde_json::json!({ "amount": amount })),
            ),
            AppError::Payment(PaymentError::ExceedsRemaining { remaining }) => (
                StatusCode::BAD_REQUEST,
                "EXCEEDS_REMAINING",
                format!(
                    "Payment amount cannot exceed remaining amount ({})",
                    remaining
                ),
                Some(serde_json::json!({ "remaining": remaining })),
            ),
            AppError::Payment(PaymentError::ContractFrozen) => (
                StatusCode::BAD_REQUEST,
                "CONTRACT_FROZEN",
                "Contract payment obligation has been cancelled".to_string(),
                None,
            ),
            AppError::Contract(ContractError::AssetInUse(what)) => (
                StatusCode::BAD_REQUEST,
                "ASSET_IN_USE",
                format!("{} already has an active contract", what),
                None,
            ),
            AppError::Contract(ContractError::UnpaidObligations(what)) => (
                StatusCode::BAD_REQUEST,
                "UNPAID_OBLIGATIONS",
                format!("{} has unpaid contracts", what),
                None,
            ),
            AppError::Contract(ContractError::DuplicatePlateNumber(plate)) => (
                StatusCode::BAD_REQUEST,
                "DUPLICATE_PLATE_NUMBER",
                format!("A car with plate number '{}' already exists", plate),
                None,
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Not found: {}", what),
                None,
            ),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg, None),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "A database error occurred".to_string(),
                None,
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            ),
        };

        let body = Json(ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            details,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal(format!("Error converting: {:?}", error))
    }
}

impl From<MigrateError> for AppError {
    fn from(error: MigrateError) -> Self {
        AppError::Internal(format!("Migration error: {:?}", error))
    }
}

/// Result type alias for the application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exceeds_remaining_message_includes_balance() {
        let err = PaymentError::ExceedsRemaining {
            remaining: dec!(200),
        };
        assert_eq!(
            err.to_string(),
            "Payment amount cannot exceed remaining amount (200)"
        );
    }
}
