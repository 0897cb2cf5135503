//! # Rollcall API
//!
//! HTTP surface of the Rollcall attendance service. It exposes the attendance
//! engine's session, record, statistics and settings operations as JSON
//! endpoints.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into engine calls
//! - **Middleware**: Error mapping shared by every handler
//! - **Config**: Environment driven server configuration
//!
//! The engine is held behind a mutex and every request locks it for one
//! operation. Snapshots are written to the store after the engine lock is
//! released, under a separate persistence lock so writes land in the order
//! their snapshots were taken.

/// Configuration module for API settings
pub mod config;
/// Request handlers that call into the attendance engine
pub mod handlers;
/// Error mapping middleware
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{http::HeaderValue, Router};
use chrono::Duration;
use eyre::Result;
use rollcall_core::{
    errors::{AttendanceError, AttendanceResult},
    persistence::{EngineSnapshot, SnapshotStore},
    AttendanceEngine,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::middleware::error_handling::AppError;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    engine: Mutex<AttendanceEngine>,
    persistence: tokio::sync::Mutex<()>,
    /// Durable home of the engine snapshot
    pub snapshots: Arc<dyn SnapshotStore>,
    /// Lifetime of QR payloads when the request does not override it
    pub qr_ttl: Duration,
}

impl ApiState {
    pub fn new(engine: AttendanceEngine, snapshots: Arc<dyn SnapshotStore>, qr_ttl: Duration) -> Self {
        Self {
            engine: Mutex::new(engine),
            persistence: tokio::sync::Mutex::new(()),
            snapshots,
            qr_ttl,
        }
    }

    /// Locks the engine for one operation. The guard must be dropped before
    /// the handler awaits anything.
    pub fn engine(&self) -> Result<MutexGuard<'_, AttendanceEngine>, AppError> {
        self.engine.lock().map_err(|_| {
            AppError(AttendanceError::Internal(
                "attendance engine lock poisoned".into(),
            ))
        })
    }

    /// Serializes snapshot writes. Take this before locking the engine and
    /// hold it until the write completes.
    pub async fn lock_persistence(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.persistence.lock().await
    }

    /// Writes the records slot of a snapshot taken under the lock.
    pub async fn persist_records(&self, snapshot: &EngineSnapshot) -> AttendanceResult<()> {
        EngineSnapshot::save_records(self.snapshots.as_ref(), &snapshot.records)
            .await
            .inspect_err(|e| warn!("Failed to persist attendance records: {}", e))
    }

    /// Writes the settings slot of a snapshot taken under the lock.
    pub async fn persist_settings(&self, snapshot: &EngineSnapshot) -> AttendanceResult<()> {
        EngineSnapshot::save_settings(self.snapshots.as_ref(), &snapshot.settings)
            .await
            .inspect_err(|e| warn!("Failed to persist attendance settings: {}", e))
    }
}

/// Builds the application router with every endpoint attached to `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Session lifecycle and marking
        .merge(routes::session::routes())
        // Saved record history
        .merge(routes::records::routes())
        // Derived statistics
        .merge(routes::stats::routes())
        // Attendance settings
        .merge(routes::settings::routes())
        // Read-only roster
        .merge(routes::classes::routes())
        .with_state(state)
}

/// Installs the global fmt subscriber filtered by `log_level`.
pub fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).or_else(|_| EnvFilter::try_new("info"))?;
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(origins))
}

/// Starts the API server with the provided configuration and state
///
/// # Example
///
/// ```ignore
/// let config = config::ApiConfig::from_env()?;
/// let state = Arc::new(ApiState::new(engine, snapshots, qr_ttl));
/// start_server(config, state).await?;
/// ```
pub async fn start_server(config: config::ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = build_router(state).layer(TraceLayer::new_for_http());

    // Apply CORS configuration if origins are specified
    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)?),
        None => app,
    };

    // Add request timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(axum::error_handling::HandleErrorLayer::new(
                |_: tower::BoxError| async { axum::http::StatusCode::REQUEST_TIMEOUT },
            ))
            .timeout(std::time::Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
