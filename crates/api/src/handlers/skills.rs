use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use volly_core::{
    errors::VollyError,
    models::skill::{CreateSkillRequest, SkillResponse, UpdateSkillRequest},
};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_skill(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSkillRequest>,
) -> Result<Json<SkillResponse>, AppError> {
    let skill = volly_db::repositories::skills::create_skill(&state.db_pool, &payload.name)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(SkillResponse {
        id: skill.id,
        name: skill.name,
    }))
}

#[axum::debug_handler]
pub async fn get_skill(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<SkillResponse>, AppError> {
    let skill = volly_db::repositories::skills::get_skill_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Skill with id {id} not found")))?;

    Ok(Json(SkillResponse {
        id: skill.id,
        name: skill.name,
    }))
}

#[axum::debug_handler]
pub async fn list_skills(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<SkillResponse>>, AppError> {
    let skills = volly_db::repositories::skills::get_skills(&state.db_pool)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(
        skills
            .into_iter()
            .map(|s| SkillResponse {
                id: s.id,
                name: s.name,
            })
            .collect(),
    ))
}

#[axum::debug_handler]
pub async fn update_skill(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateSkillRequest>,
) -> Result<Json<SkillResponse>, AppError> {
    volly_db::repositories::skills::get_skill_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Skill with id {id} not found")))?;

    let skill = volly_db::repositories::skills::update_skill(&state.db_pool, id, &payload.name)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(SkillResponse {
        id: skill.id,
        name: skill.name,
    }))
}

#[axum::debug_handler]
pub async fn delete_skill(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    volly_db::repositories::skills::get_skill_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Skill with id {id} not found")))?;

    volly_db::repositories::skills::delete_skill(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?;

    Ok(Json(id))
}
