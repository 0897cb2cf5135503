use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/sessions", post(handlers::session::open_session))
        .route(
            "/api/sessions/current",
            get(handlers::session::current_session).delete(handlers::session::discard_session),
        )
        .route(
            "/api/sessions/current/marks",
            post(handlers::session::mark_status),
        )
        .route(
            "/api/sessions/current/bulk",
            post(handlers::session::bulk_mark),
        )
        .route(
            "/api/sessions/current/annotations",
            put(handlers::session::annotate_session),
        )
        .route(
            "/api/sessions/current/save",
            post(handlers::session::save_session),
        )
        .route("/api/sessions/current/qr", post(handlers::session::issue_qr))
        .route(
            "/api/sessions/current/qr/scan",
            post(handlers::session::scan_qr),
        )
}
