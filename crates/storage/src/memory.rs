use std::sync::Mutex;

use crate::snapshot::{Snapshot, SnapshotStore, StoreError};

/// In-memory store — lets the service layer be exercised in tests without
/// touching the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
}

impl MemoryStore {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { inner: Mutex::new(snapshot) }
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Snapshot, StoreError> {
        Ok(self.inner.lock().expect("snapshot lock poisoned").clone())
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.inner.lock().expect("snapshot lock poisoned") = snapshot.clone();
        Ok(())
    }
}
