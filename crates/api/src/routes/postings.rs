use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/postings", post(handlers::postings::create_posting))
        .route("/api/postings", get(handlers::postings::list_postings))
        .route("/api/postings/:id", get(handlers::postings::get_posting))
        .route("/api/postings/:id", put(handlers::postings::update_posting))
        .route(
            "/api/postings/:id",
            delete(handlers::postings::delete_posting),
        )
}
