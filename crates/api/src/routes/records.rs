use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/records", get(handlers::records::list_records))
        .route("/api/records/:id", get(handlers::records::get_record))
}
