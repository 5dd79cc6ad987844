use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/skills", post(handlers::skills::create_skill))
        .route("/api/skills", get(handlers::skills::list_skills))
        .route("/api/skills/:id", get(handlers::skills::get_skill))
        .route("/api/skills/:id", put(handlers::skills::update_skill))
        .route("/api/skills/:id", delete(handlers::skills::delete_skill))
}
