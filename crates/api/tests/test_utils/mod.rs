#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rollcall_api::{build_router, ApiState};
use rollcall_core::{clock::FixedClock, persistence::SnapshotStore, AttendanceEngine};
use rollcall_db::{seed::demo_roster, snapshot::MemorySnapshotStore};

pub fn opening_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
}

pub struct TestContext {
    pub server: TestServer,
    pub clock: Arc<FixedClock>,
    pub snapshots: Arc<MemorySnapshotStore>,
}

impl TestContext {
    /// Server over the demo roster with an empty history.
    pub fn new() -> Self {
        let snapshots = Arc::new(MemorySnapshotStore::new());
        let (server, clock) = Self::build(snapshots.clone());
        Self {
            server,
            clock,
            snapshots,
        }
    }

    /// Builds a server around any snapshot store, such as a mock.
    pub fn build(snapshots: Arc<dyn SnapshotStore>) -> (TestServer, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(opening_time()));
        let engine = AttendanceEngine::new(Arc::new(demo_roster(opening_time())), clock.clone());
        let state = Arc::new(ApiState::new(engine, snapshots, Duration::minutes(5)));
        let server = TestServer::new(build_router(state)).unwrap();
        (server, clock)
    }
}
