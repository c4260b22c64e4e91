use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use super::models::{CreatePlateRequest, LicensePlate, PlateFilter, UpdatePlateRequest};
use crate::api::{Message, Paged, Pagination};
use crate::bootstrap::AppState;
use crate::error::AppResult;
use crate::middleware::ValidatedJson;

/// GET /plates
pub async fn list_plates(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Query(filter): Query<PlateFilter>,
) -> AppResult<Json<Paged<LicensePlate>>> {
    let (data, count) = state.plates.list(&filter, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /plates/:id
pub async fn get_plate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LicensePlate>> {
    let plate = state.plates.get(id).await?;
    Ok(Json(plate))
}

/// POST /plates
pub async fn create_plate(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreatePlateRequest>,
) -> AppResult<Json<LicensePlate>> {
    let plate = state.plates.create(&req).await?;
    Ok(Json(plate))
}

/// PUT /plates/:id
pub async fn update_plate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdatePlateRequest>,
) -> AppResult<Json<LicensePlate>> {
    let plate = state.plates.update(id, &req).await?;
    Ok(Json(plate))
}

/// DELETE /plates/:id
pub async fn delete_plate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    state.plates.delete(id).await?;
    Ok(Json(Message::new("License plate deleted successfully")))
}
