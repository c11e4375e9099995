use std::path::{Path, PathBuf};

use crate::snapshot::{Snapshot, SnapshotStore, StoreError};

/// Snapshot persisted as one pretty-printed JSON document on disk.
///
/// A missing file reads as the empty snapshot; unreadable or corrupt
/// content is an error rather than a silent reset, so a bad parse can
/// never cause the next write to wipe existing data.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonStore {
    fn read(&self) -> Result<Snapshot, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Snapshot::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, raw)?;
        tracing::debug!(
            path = %self.path.display(),
            receipts = snapshot.receipts.len(),
            products = snapshot.products.len(),
            "snapshot written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paragon_core::{Receipt, ReceiptTotals};
    use rust_decimal::Decimal;

    fn zero_totals() -> ReceiptTotals {
        ReceiptTotals {
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            discount_items: Decimal::ZERO,
            discount_receipt: Decimal::ZERO,
            total: Decimal::ZERO,
            payment_method: None,
        }
    }

    fn receipt(id: &str) -> Receipt {
        Receipt {
            id: id.into(),
            created_at: "2024-03-15T10:00:00Z".parse().unwrap(),
            purchased_at: None,
            store: "Billa".into(),
            currency: "CZK".into(),
            totals: zero_totals(),
            items: vec![],
        }
    }

    #[test]
    fn missing_file_reads_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));
        assert_eq!(store.read().unwrap(), Snapshot::default());
    }

    #[test]
    fn snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("db.json"));

        let snapshot = Snapshot { receipts: vec![receipt("r1")], products: vec![] };
        store.write(&snapshot).unwrap();
        assert_eq!(store.read().unwrap(), snapshot);
    }

    #[test]
    fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("nested/data/db.json"));
        store.write(&Snapshot::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn corrupt_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = JsonStore::new(path);
        assert!(matches!(store.read(), Err(StoreError::Corrupt(_))));
    }
}
