use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::models::{CreateLeaseRequest, LeaseFilter, LeaseRow, PayRequest, UpdateLeaseRequest};
use crate::api::{Message, Paged, Pagination};
use crate::bootstrap::AppState;
use crate::error::AppResult;
use crate::ledger::models::PaymentRecord;
use crate::ledger::LedgerResponse;
use crate::middleware::ValidatedJson;

/// GET /leases
pub async fn list_leases(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Query(filter): Query<LeaseFilter>,
) -> AppResult<Json<Paged<LeaseRow>>> {
    let (data, count) = state.leases.list(&filter, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /leases/:id
pub async fn get_lease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaseRow>> {
    let lease = state.leases.get(id).await?;
    Ok(Json(lease))
}

/// POST /leases
pub async fn create_lease(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateLeaseRequest>,
) -> AppResult<Json<LeaseRow>> {
    let lease = state.leases.create(&req).await?;
    Ok(Json(lease))
}

/// PUT /leases/:id
pub async fn update_lease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateLeaseRequest>,
) -> AppResult<Json<LeaseRow>> {
    let lease = state.leases.update(id, &req).await?;
    Ok(Json(lease))
}

/// DELETE /leases/:id
pub async fn delete_lease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    state.leases.delete(id).await?;
    Ok(Json(Message::new("Lease deleted successfully")))
}

/// POST /leases/:id/pay
pub async fn pay_lease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<PayRequest>,
) -> AppResult<Json<LeaseRow>> {
    let lease = state
        .leases
        .pay(
            id,
            req.amount,
            req.payment_date,
            req.note.as_deref(),
            req.recorded_by.as_deref(),
        )
        .await?;
    Ok(Json(lease))
}

/// GET /leases/:id/payments
pub async fn list_lease_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> AppResult<Json<Paged<PaymentRecord>>> {
    let (data, count) = state.leases.payments(id, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /leases/:id/ledger
pub async fn lease_ledger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LedgerResponse>> {
    let (total_amount, data) = state.leases.ledger(id).await?;
    let count = data.len() as i64;
    Ok(Json(LedgerResponse {
        total_amount,
        data,
        count,
    }))
}

/// POST /leases/:id/freeze
pub async fn freeze_lease(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LeaseRow>> {
    let lease = state.leases.freeze(id).await?;
    Ok(Json(lease))
}
