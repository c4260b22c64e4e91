use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;
use uuid::Uuid;

use super::models::{Car, CarFilter, CreateCarRequest, UpdateCarRequest};
use crate::api::{Message, Paged, Pagination};
use crate::bootstrap::AppState;
use crate::error::AppResult;
use crate::middleware::ValidatedJson;

/// GET /cars
pub async fn list_cars(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
    Query(filter): Query<CarFilter>,
) -> AppResult<Json<Paged<Car>>> {
    let (data, count) = state.cars.list(&filter, page).await?;
    Ok(Json(Paged { data, count }))
}

/// GET /cars/:id
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Car>> {
    let car = state.cars.get(id).await?;
    Ok(Json(car))
}

/// POST /cars
pub async fn create_car(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateCarRequest>,
) -> AppResult<Json<Car>> {
    let car = state.cars.create(&req).await?;
    info!("Created car {} ({})", car.id, car.model);
    Ok(Json(car))
}

/// PUT /cars/:id
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateCarRequest>,
) -> AppResult<Json<Car>> {
    let car = state.cars.update(id, &req).await?;
    Ok(Json(car))
}

/// DELETE /cars/:id
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Message>> {
    state.cars.delete(id).await?;
    Ok(Json(Message::new("Car deleted successfully")))
}
