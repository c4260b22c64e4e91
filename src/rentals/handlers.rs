use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::models::{CreateRentalRequest, RentalFilter, RentalRow, UpdateRentalRequest};
use crate::api::{Message, Paged, Pagination};
use crate::bootstrap::AppState;
use crate::error::AppResult;
use crate::leases::models::PayRequest;
use crate::ledger::models::PaymentRecord;
use crate::ledger::LedgerResponse;
use crate::middleware::ValidatedJson;

/// GET /rentals
pub async fn list_rentals(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Query(filter): Query<RentalFilter>,
) -> AppResult<Json<Paged<RentalRow>>> {
    let (data, count) = state.rentals.list(&filter, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /rentals/:id
pub async fn get_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RentalRow>> {
    let rental = state.rentals.get(id).await?;
    Ok(Json(rental))
}

/// POST /rentals
pub async fn create_rental(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateRentalRequest>,
) -> AppResult<Json<RentalRow>> {
    let rental = state.rentals.create(&req).await?;
    Ok(Json(rental))
}

/// PUT /rentals/:id
pub async fn update_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateRentalRequest>,
) -> AppResult<Json<RentalRow>> {
    let rental = state.rentals.update(id, &req).await?;
    Ok(Json(rental))
}

/// DELETE /rentals/:id
pub async fn delete_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    state.rentals.delete(id).await?;
    Ok(Json(Message::new("Rental deleted successfully")))
}

/// POST /rentals/:id/pay
pub async fn pay_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<PayRequest>,
) -> AppResult<Json<RentalRow>> {
    let rental = state
        .rentals
        .pay(
            id,
            req.amount,
            req.payment_date,
            req.note.as_deref(),
            req.recorded_by.as_deref(),
        )
        .await?;
    Ok(Json(rental))
}

/// GET /rentals/:id/payments
pub async fn list_rental_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Paged<PaymentRecord>>> {
    let (data, count) = state.rentals.payments(id, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /rentals/:id/ledger
pub async fn rental_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LedgerResponse>> {
    let (total_amount, data) = state.rentals.ledger(id).await?;
    let count = data.len() as i64;
    Ok(Json(LedgerResponse {
        total_amount,
        data,
        count,
    }))
}

/// POST /rentals/:id/freeze
pub async fn freeze_rental(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RentalRow>> {
    let rental = state.rentals.freeze(id).await?;
    Ok(Json(rental))
}
