use async_trait::async_trait;
use mockall::mock;
use rollcall_core::{
    models::roster::{Class, Student},
    persistence::SnapshotStore,
    roster::Roster,
};

// Mock collaborators for testing
mock! {
    pub Snapshots {}

    #[async_trait]
    impl SnapshotStore for Snapshots {
        async fn load(&self, slot: &str) -> eyre::Result<Option<serde_json::Value>>;

        async fn save(&self, slot: &str, value: serde_json::Value) -> eyre::Result<()>;
    }
}

mock! {
    pub ClassRoster {}

    impl Roster for ClassRoster {
        fn list_classes(&self) -> Vec<Class>;

        fn get_class(&self, class_id: &str) -> Option<Class>;

        fn list_students(&self) -> Vec<Student>;

        fn list_students_by_class(&self, class_id: &str) -> Vec<Student>;
    }
}
