use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use volly_core::{
    errors::VollyError,
    models::branch::{BranchResponse, CreateBranchRequest, UpdateBranchRequest},
};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_branch(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateBranchRequest>,
) -> Result<Json<BranchResponse>, AppError> {
    let branch = volly_db::repositories::branches::create_branch(&state.db_pool, &payload.name)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(BranchResponse {
        id: branch.id,
        name: branch.name,
    }))
}

#[axum::debug_handler]
pub async fn get_branch(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<BranchResponse>, AppError> {
    let branch = volly_db::repositories::branches::get_branch_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Branch with id {id} not found")))?;

    Ok(Json(BranchResponse {
        id: branch.id,
        name: branch.name,
    }))
}

#[axum::debug_handler]
pub async fn list_branches(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<BranchResponse>>, AppError> {
    let branches = volly_db::repositories::branches::get_branches(&state.db_pool)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(
        branches
            .into_iter()
            .map(|b| BranchResponse {
                id: b.id,
                name: b.name,
            })
            .collect(),
    ))
}

#[axum::debug_handler]
pub async fn update_branch(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBranchRequest>,
) -> Result<Json<BranchResponse>, AppError> {
    volly_db::repositories::branches::get_branch_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Branch with id {id} not found")))?;

    let branch = volly_db::repositories::branches::update_branch(&state.db_pool, id, &payload.name)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(BranchResponse {
        id: branch.id,
        name: branch.name,
    }))
}

#[axum::debug_handler]
pub async fn delete_branch(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    volly_db::repositories::branches::get_branch_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Branch with id {id} not found")))?;

    volly_db::repositories::branches::delete_branch(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(id))
}
