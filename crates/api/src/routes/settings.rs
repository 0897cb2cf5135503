use axum::{routing::get, Router};
use std::sync::Arc;

use crate::{handlers, ApiState};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new().route(
        "/api/settings",
        get(handlers::settings::get_settings).patch(handlers::settings::update_settings),
    )
}
