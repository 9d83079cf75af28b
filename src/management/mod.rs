mod auth;
mod snapshot;

pub use auth::TokenManager;
pub use snapshot::SNAPSHOT_TABLES;
pub use snapshot::SnapshotStore;
