use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/stats/students/:id",
            get(handlers::stats::student_stats),
        )
        .route("/api/stats/classes/:id", get(handlers::stats::class_stats))
        .route("/api/stats/dashboard", get(handlers::stats::dashboard))
}
