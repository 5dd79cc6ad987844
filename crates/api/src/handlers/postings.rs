use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use volly_core::{
    errors::VollyError,
    models::{
        branch::BranchResponse,
        posting::{CreatePostingRequest, PostingResponse, PostingStatus, PostingType, UpdatePostingRequest},
        skill::SkillResponse,
    },
};
use volly_db::models::DbPosting;
use volly_db::repositories::{branches, postings, skills};

use crate::{middleware::error_handling::AppError, ApiState};

#[axum::debug_handler]
pub async fn create_posting(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreatePostingRequest>,
) -> Result<Json<PostingResponse>, AppError> {
    branches::get_branch_by_id(&state.db_pool, payload.branch_id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| {
            VollyError::NotFound(format!("Branch with id {} not found", payload.branch_id))
        })?;

    let mut tx = state.db_pool.begin().await.map_err(db_err)?;
    let posting = postings::create_posting(
        &mut tx,
        payload.branch_id,
        &payload.title,
        payload.posting_type.as_str(),
        payload.status.as_str(),
        &payload.description,
        payload.start_date,
        payload.end_date,
        payload.num_volunteers,
        payload.auto_closing_date,
    )
    .await
    .map_err(VollyError::Database)?;
    postings::set_posting_skills(&mut tx, posting.id, &payload.skill_ids)
        .await
        .map_err(VollyError::Database)?;
    tx.commit().await.map_err(db_err)?;

    let response = posting_response(&state.db_pool, posting).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_posting(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<PostingResponse>, AppError> {
    let posting = postings::get_posting_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Posting with id {id} not found")))?;

    let response = posting_response(&state.db_pool, posting).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_postings(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<PostingResponse>>, AppError> {
    let rows = postings::get_postings(&state.db_pool)
        .await
        .map_err(VollyError::Database)?;

    let mut responses = Vec::with_capacity(rows.len());
    for posting in rows {
        responses.push(posting_response(&state.db_pool, posting).await?);
    }

    Ok(Json(responses))
}

#[axum::debug_handler]
pub async fn update_posting(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePostingRequest>,
) -> Result<Json<PostingResponse>, AppError> {
    postings::get_posting_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Posting with id {id} not found")))?;

    let mut tx = state.db_pool.begin().await.map_err(db_err)?;
    let posting = postings::update_posting(
        &mut tx,
        id,
        payload.branch_id,
        &payload.title,
        payload.posting_type.as_str(),
        payload.status.as_str(),
        &payload.description,
        payload.start_date,
        payload.end_date,
        payload.num_volunteers,
        payload.auto_closing_date,
    )
    .await
    .map_err(VollyError::Database)?;
    postings::set_posting_skills(&mut tx, id, &payload.skill_ids)
        .await
        .map_err(VollyError::Database)?;
    tx.commit().await.map_err(db_err)?;

    let response = posting_response(&state.db_pool, posting).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_posting(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    postings::get_posting_by_id(&state.db_pool, id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| VollyError::NotFound(format!("Posting with id {id} not found")))?;

    let mut tx = state.db_pool.begin().await.map_err(db_err)?;
    postings::delete_posting(&mut tx, id)
        .await
        .map_err(VollyError::Database)?;
    tx.commit().await.map_err(db_err)?;

    Ok(Json(id))
}

fn db_err(err: sqlx::Error) -> VollyError {
    VollyError::Database(eyre::Report::new(err))
}

/// Hydrates a posting row with its branch and required skills.
async fn posting_response(pool: &PgPool, posting: DbPosting) -> Result<PostingResponse, AppError> {
    let branch = branches::get_branch_by_id(pool, posting.branch_id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| {
            VollyError::NotFound(format!("Branch with id {} not found", posting.branch_id))
        })?;

    let skill_ids = postings::get_posting_skill_ids(pool, posting.id)
        .await
        .map_err(VollyError::Database)?;
    let posting_skills = skills::get_skills_by_ids(pool, &skill_ids)
        .await
        .map_err(VollyError::Database)?;

    let posting_type = PostingType::parse(&posting.posting_type).ok_or_else(|| {
        VollyError::Internal(format!("unknown posting type {:?}", posting.posting_type).into())
    })?;
    let status = PostingStatus::parse(&posting.status).ok_or_else(|| {
        VollyError::Internal(format!("unknown posting status {:?}", posting.status).into())
    })?;

    Ok(PostingResponse {
        id: posting.id,
        branch: BranchResponse {
            id: branch.id,
            name: branch.name,
        },
        title: posting.title,
        posting_type,
        status,
        description: posting.description,
        start_date: posting.start_date,
        end_date: posting.end_date,
        num_volunteers: posting.num_volunteers,
        auto_closing_date: posting.auto_closing_date,
        skills: posting_skills
            .into_iter()
            .map(|s| SkillResponse {
                id: s.id,
                name: s.name,
            })
            .collect(),
    })
}
