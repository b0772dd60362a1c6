pub mod snapshot;

pub use snapshot::{normalize_gender, SnapshotSource};
