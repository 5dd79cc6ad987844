use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/signups", post(handlers::signups::create_signup))
        .route("/api/signups", get(handlers::signups::list_signups))
        .route(
            "/api/signups/:shift_id/:user_id",
            put(handlers::signups::update_signup),
        )
}
