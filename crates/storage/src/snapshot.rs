use serde::{Deserialize, Serialize};
use thiserror::Error;

use paragon_core::{Product, Receipt};

/// The full persisted state: receipts are the system of record, products
/// the derived price-history view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub receipts: Vec<Receipt>,
    pub products: Vec<Product>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Full-snapshot store. Every mutation is read-then-write of the complete
/// document; partial updates are not part of the contract. Callers must
/// serialize writers — the store provides no locking of its own.
pub trait SnapshotStore {
    fn read(&self) -> Result<Snapshot, StoreError>;
    fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}
