use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::models::{CreateRenterRequest, Renter, RenterFilter, UpdateRenterRequest};
use crate::api::{Message, Paged, Pagination};
use crate::bootstrap::AppState;
use crate::error::AppResult;
use crate::middleware::ValidatedJson;

/// GET /renters
pub async fn list_renters(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Query(filter): Query<RenterFilter>,
) -> AppResult<Json<Paged<Renter>>> {
    let (data, count) = state.renters.list(&filter, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /renters/:id
pub async fn get_renter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Renter>> {
    let renter = state.renters.get(id).await?;
    Ok(Json(renter))
}

/// POST /renters
pub async fn create_renter(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateRenterRequest>,
) -> AppResult<Json<Renter>> {
    let renter = state.renters.create(&req).await?;
    Ok(Json(renter))
}

/// PUT /renters/:id
pub async fn update_renter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateRenterRequest>,
) -> AppResult<Json<Renter>> {
    let renter = state.renters.update(id, &req).await?;
    Ok(Json(renter))
}

/// DELETE /renters/:id
pub async fn delete_renter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    state.renters.delete(id).await?;
    Ok(Json(Message::new("Renter deleted successfully")))
}
