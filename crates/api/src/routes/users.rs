use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/users", post(handlers::users::create_user))
        .route("/api/users", get(handlers::users::list_users))
        .route("/api/users/:id", get(handlers::users::get_user))
        .route("/api/users/:id", put(handlers::users::update_user))
        .route("/api/users/:id", delete(handlers::users::delete_user))
        .route(
            "/api/users/email/:email",
            get(handlers::users::get_user_by_email),
        )
        .route(
            "/api/users/email/:email",
            delete(handlers::users::delete_user_by_email),
        )
        .route("/api/volunteers", post(handlers::users::create_volunteer))
        .route("/api/volunteers", get(handlers::users::list_volunteers))
        .route("/api/volunteers/:id", get(handlers::users::get_volunteer))
        .route("/api/volunteers/:id", put(handlers::users::update_volunteer))
        .route(
            "/api/volunteers/:id",
            delete(handlers::users::delete_volunteer),
        )
        .route(
            "/api/volunteers/email/:email",
            delete(handlers::users::delete_volunteer_by_email),
        )
        .route("/api/employees", post(handlers::users::create_employee))
        .route("/api/employees", get(handlers::users::list_employees))
        .route("/api/employees/:id", get(handlers::users::get_employee))
        .route("/api/employees/:id", put(handlers::users::update_employee))
        .route(
            "/api/employees/:id",
            delete(handlers::users::delete_employee),
        )
        .route(
            "/api/employees/email/:email",
            delete(handlers::users::delete_employee_by_email),
        )
}
