use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/branches", post(handlers::branches::create_branch))
        .route("/api/branches", get(handlers::branches::list_branches))
        .route("/api/branches/:id", get(handlers::branches::get_branch))
        .route("/api/branches/:id", put(handlers::branches::update_branch))
        .route(
            "/api/branches/:id",
            delete(handlers::branches::delete_branch),
        )
}
