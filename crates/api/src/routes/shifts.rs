use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/shifts", post(handlers::shifts::create_shifts))
        .route("/api/shifts", get(handlers::shifts::list_shifts))
        .route("/api/shifts/:id", get(handlers::shifts::get_shift))
        .route("/api/shifts/:id", put(handlers::shifts::update_shift))
        .route("/api/shifts/:id", delete(handlers::shifts::delete_shift))
        .route(
            "/api/postings/:posting_id/shifts",
            put(handlers::shifts::update_shifts),
        )
        .route(
            "/api/postings/:posting_id/shifts",
            delete(handlers::shifts::delete_shifts_by_posting),
        )
}
