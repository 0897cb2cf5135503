use std::sync::Arc;

use chrono::Duration;
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use rollcall_api::{config::ApiConfig, ApiState};
use rollcall_core::{
    clock::{Clock, SystemClock},
    persistence::{EngineSnapshot, SnapshotStore},
    roster::Roster,
    AttendanceEngine,
};
use rollcall_db::{
    create_pool,
    schema::initialize_database,
    seed::{demo_roster, sample_records},
    snapshot::{MemorySnapshotStore, PgSnapshotStore},
};
use tracing::{info, warn};

/// Days of generated history for a fresh store.
const DEMO_HISTORY_DAYS: u32 = 30;

async fn snapshot_store(config: &ApiConfig) -> Result<Arc<dyn SnapshotStore>> {
    match &config.database_url {
        Some(url) => {
            let db_pool = create_pool(url).await?;
            initialize_database(&db_pool).await?;
            info!("Persisting attendance snapshots to PostgreSQL");
            Ok(Arc::new(PgSnapshotStore::new(db_pool)))
        }
        None => {
            warn!("DATABASE_URL not set, attendance data will not survive a restart");
            Ok(Arc::new(MemorySnapshotStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    rollcall_api::init_tracing(&config.log_level)?;

    let snapshots = snapshot_store(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let roster: Arc<dyn Roster> = Arc::new(demo_roster(clock.now()));

    // Rehydrate, or seed an empty store with demo history
    let engine = match EngineSnapshot::load_from(snapshots.as_ref()).await? {
        Some(snapshot) => AttendanceEngine::from_snapshot(roster, clock, snapshot),
        None => {
            let mut engine = AttendanceEngine::new(roster, clock.clone());
            if config.seed_demo_data {
                let records = sample_records(
                    engine.roster(),
                    clock.now().date_naive(),
                    DEMO_HISTORY_DAYS,
                    &mut rand::thread_rng(),
                );
                engine.import_records(records);
                engine.snapshot().save_to(snapshots.as_ref()).await?;
            }
            engine
        }
    };

    let qr_ttl = i64::try_from(config.qr_ttl_seconds)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| eyre!("QR_TTL_SECONDS {} is out of range", config.qr_ttl_seconds))?;
    let state = Arc::new(ApiState::new(engine, snapshots, qr_ttl));

    // Start API server
    rollcall_api::start_server(config, state).await?;

    Ok(())
}
