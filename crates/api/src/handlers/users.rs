use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use volly_core::models::user::{
    CreateEmployeeRequest, CreateUserRequest, CreateVolunteerRequest, EmployeeResponse,
    UpdateEmployeeRequest, UpdateUserRequest, UpdateVolunteerRequest, UserResponse,
    VolunteerResponse,
};

use crate::{middleware::error_handling::AppError, ApiState};

// Base users

#[axum::debug_handler]
pub async fn create_user(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let response = state.accounts.create_user(payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let response = state.accounts.get_user(id).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_user_by_email(
    State(state): State<Arc<ApiState>>,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let response = state.accounts.get_user_by_email(&email).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let response = state.accounts.list_users().await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let response = state.accounts.update_user_by_id(id, payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_user_by_id(id).await?;
    Ok(Json(deleted))
}

#[axum::debug_handler]
pub async fn delete_user_by_email(
    State(state): State<Arc<ApiState>>,
    Path(email): Path<String>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_user_by_email(&email).await?;
    Ok(Json(deleted))
}

// Volunteers

#[axum::debug_handler]
pub async fn create_volunteer(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateVolunteerRequest>,
) -> Result<Json<VolunteerResponse>, AppError> {
    let response = state.accounts.create_volunteer(payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_volunteer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<VolunteerResponse>, AppError> {
    let response = state.accounts.get_volunteer(id).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_volunteers(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<VolunteerResponse>>, AppError> {
    let response = state.accounts.list_volunteers().await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_volunteer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVolunteerRequest>,
) -> Result<Json<VolunteerResponse>, AppError> {
    let response = state.accounts.update_volunteer_by_id(id, payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_volunteer(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_volunteer_by_id(id).await?;
    Ok(Json(deleted))
}

#[axum::debug_handler]
pub async fn delete_volunteer_by_email(
    State(state): State<Arc<ApiState>>,
    Path(email): Path<String>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_volunteer_by_email(&email).await?;
    Ok(Json(deleted))
}

// Employees

#[axum::debug_handler]
pub async fn create_employee(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let response = state.accounts.create_employee(payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn get_employee(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let response = state.accounts.get_employee(id).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_employees(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let response = state.accounts.list_employees().await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn update_employee(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let response = state.accounts.update_employee_by_id(id, payload).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn delete_employee(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i32>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_employee_by_id(id).await?;
    Ok(Json(deleted))
}

#[axum::debug_handler]
pub async fn delete_employee_by_email(
    State(state): State<Arc<ApiState>>,
    Path(email): Path<String>,
) -> Result<Json<i32>, AppError> {
    let deleted = state.accounts.delete_employee_by_email(&email).await?;
    Ok(Json(deleted))
}
