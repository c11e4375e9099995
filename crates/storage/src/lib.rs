pub mod json;
pub mod memory;
pub mod snapshot;

pub use json::JsonStore;
pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotStore, StoreError};
