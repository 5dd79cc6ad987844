use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use volly_core::models::shift::{BulkShiftRequest, ShiftResponse, UpdateShiftRequest};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct ShiftQuery {
    pub posting_id: Option<i32>,
}

#[axum::debug_handler]
pub async fn create_shifts(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BulkShiftRequest>,
) -> Result<Json<Vec<ShiftResponse>>, AppError> {
    let created = state.shifts.create_shifts(&payload).await?;
    Ok(Json(created))
}

#[axum::debug_handler]
pub async fn update_shifts(
    State(state): State<Arc<ApiState>>,
    Path(posting_id): Path<i32>,
    Json(payload): Json<BulkShiftRequest>,
) -> Result<Json<Vec<ShiftResponse>>, AppError> {
    let created = state.shifts.update_shifts(posting_id, &payload).await?;
    Ok(Json(created))
}

#[axum::debug_handler]
pub async fn get_shift(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<ShiftResponse>, AppError> {
    let shift = state.shifts.get_shift(id).await?;
    Ok(Json(shift))
}

#[axum::debug_handler]
pub async fn list_shifts(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ShiftQuery>,
) -> Result<Json<Vec<ShiftResponse>>, AppError> {
    let shifts = state.shifts.list_shifts(query.posting_id).await?;
    Ok(Json(shifts))
}

#[axum::debug_handler]
pub async fn update_shift(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateShiftRequest>,
) -> Result<Json<ShiftResponse>, AppError> {
    let shift = state.shifts.update_shift(id, &payload).await?;
    Ok(Json(shift))
}

#[axum::debug_handler]
pub async fn delete_shift(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.shifts.delete_shift(id).await?;
    Ok(Json(deleted))
}

#[axum::debug_handler]
pub async fn delete_shifts_by_posting(
    State(state): State<Arc<ApiState>>,
    Path(posting_id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    state.shifts.delete_shifts_by_posting(posting_id).await?;
    Ok(Json(posting_id))
}
