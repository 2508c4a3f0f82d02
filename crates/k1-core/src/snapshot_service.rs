//! Named worksheet snapshots stored under `basisWorksheet_<name>` plus a name index.

use std::sync::Arc;

use k1_domain::{Worksheet, WorksheetSnapshot};
use tracing::{debug, warn};

use crate::{
    storage::{read_json, worksheet_key, write_json, KeyValueStore, WORKSHEET_NAMES_KEY},
    time::Clock,
    CoreError,
};

pub struct SnapshotService {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SnapshotService {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Writes the snapshot, then appends `name` to the index. The index keeps
    /// duplicates, so re-saving a name lists it twice while the blob is replaced.
    pub fn save(&self, name: &str, worksheet: &Worksheet) -> Result<WorksheetSnapshot, CoreError> {
        if name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Please enter a name for your worksheet".into(),
            ));
        }
        let snapshot = WorksheetSnapshot::capture(name, worksheet, self.clock.now());
        write_json(self.store.as_ref(), &worksheet_key(name), &snapshot)?;

        let mut names = self.list_names()?;
        names.push(name.to_string());
        write_json(self.store.as_ref(), WORKSHEET_NAMES_KEY, &names)?;
        debug!(name, entries = snapshot.items.len(), "worksheet saved");
        Ok(snapshot)
    }

    /// Absent and undecodable blobs both come back as [`CoreError::SnapshotNotFound`].
    pub fn load(&self, name: &str) -> Result<WorksheetSnapshot, CoreError> {
        match read_json::<WorksheetSnapshot>(self.store.as_ref(), &worksheet_key(name)) {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) => Err(CoreError::SnapshotNotFound(name.to_string())),
            Err(CoreError::CorruptRecord { key, reason }) => {
                warn!(%key, %reason, "discarding corrupted worksheet");
                Err(CoreError::SnapshotNotFound(name.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Returns the index as stored, including duplicates and dangling names.
    pub fn list_names(&self) -> Result<Vec<String>, CoreError> {
        match read_json::<Vec<String>>(self.store.as_ref(), WORKSHEET_NAMES_KEY) {
            Ok(names) => Ok(names.unwrap_or_default()),
            Err(CoreError::CorruptRecord { key, reason }) => {
                warn!(%key, %reason, "worksheet index unreadable, starting a new one");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }
}
