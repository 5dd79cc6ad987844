use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use volly_core::{
    errors::VollyError,
    models::signup::{CreateSignupRequest, SignupResponse, SignupStatus, UpdateSignupRequest},
};
use volly_db::models::DbSignup;
use volly_db::repositories::{shifts, signups, users};

use crate::{middleware::error_handling::AppError, ApiState};

#[derive(Debug, Deserialize)]
pub struct SignupQuery {
    pub shift_id: Option<i32>,
    pub user_id: Option<i32>,
}

#[axum::debug_handler]
pub async fn create_signup(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateSignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    if payload.num_volunteers < 1 {
        return Err(AppError(VollyError::Validation(
            "a signup must request at least one volunteer".to_string(),
        )));
    }

    shifts::get_shift_by_id(&state.db_pool, payload.shift_id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| {
            VollyError::NotFound(format!("Shift with id {} not found", payload.shift_id))
        })?;
    users::get_user_by_id(&state.db_pool, payload.user_id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| {
            VollyError::NotFound(format!("User with id {} not found", payload.user_id))
        })?;

    if signups::get_signup(&state.db_pool, payload.shift_id, payload.user_id)
        .await
        .map_err(VollyError::Database)?
        .is_some()
    {
        return Err(AppError(VollyError::Conflict(format!(
            "user {} is already signed up for shift {}",
            payload.user_id, payload.shift_id
        ))));
    }

    let signup = signups::create_signup(
        &state.db_pool,
        payload.shift_id,
        payload.user_id,
        payload.num_volunteers,
        payload.note.as_deref(),
        SignupStatus::Pending.as_str(),
    )
    .await
    .map_err(VollyError::Database)?;

    Ok(Json(signup_response(signup)?))
}

#[axum::debug_handler]
pub async fn list_signups(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<SignupQuery>,
) -> Result<Json<Vec<SignupResponse>>, AppError> {
    let rows = match (query.shift_id, query.user_id) {
        (Some(shift_id), _) => signups::get_signups_by_shift(&state.db_pool, shift_id)
            .await
            .map_err(VollyError::Database)?,
        (None, Some(user_id)) => signups::get_signups_by_user(&state.db_pool, user_id)
            .await
            .map_err(VollyError::Database)?,
        (None, None) => {
            return Err(AppError(VollyError::Validation(
                "either shift_id or user_id must be provided".to_string(),
            )))
        }
    };

    let mut responses = Vec::with_capacity(rows.len());
    for signup in rows {
        responses.push(signup_response(signup)?);
    }

    Ok(Json(responses))
}

#[axum::debug_handler]
pub async fn update_signup(
    State(state): State<Arc<ApiState>>,
    Path((shift_id, user_id)): Path<(i32, i32)>,
    Json(payload): Json<UpdateSignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let current = signups::get_signup(&state.db_pool, shift_id, user_id)
        .await
        .map_err(VollyError::Database)?
        .ok_or_else(|| {
            VollyError::NotFound(format!(
                "Signup for shift {shift_id} and user {user_id} not found"
            ))
        })?;

    let num_volunteers = payload.num_volunteers.unwrap_or(current.num_volunteers);
    if num_volunteers < 1 {
        return Err(AppError(VollyError::Validation(
            "a signup must request at least one volunteer".to_string(),
        )));
    }
    let note = payload.note.or(current.note);
    let status = payload
        .status
        .map(|s| s.as_str().to_string())
        .unwrap_or(current.status);

    let signup = signups::update_signup(
        &state.db_pool,
        shift_id,
        user_id,
        num_volunteers,
        note.as_deref(),
        &status,
    )
    .await
    .map_err(VollyError::Database)?;

    Ok(Json(signup_response(signup)?))
}

fn signup_response(signup: DbSignup) -> Result<SignupResponse, AppError> {
    let status = SignupStatus::parse(&signup.status).ok_or_else(|| {
        VollyError::Internal(format!("unknown signup status {:?}", signup.status).into())
    })?;

    Ok(SignupResponse {
        shift_id: signup.shift_id,
        user_id: signup.user_id,
        num_volunteers: signup.num_volunteers,
        note: signup.note,
        status,
    })
}
