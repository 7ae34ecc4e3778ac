use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::broadcast;
use tracing::debug;

use crate::storage::traits::ScheduleEvent;

/// Capacity of the schedule change feed. A subscriber that lags behind by
/// more than this freezes its own contribution; it does not affect others.
const SCHEDULE_FEED_CAPACITY: usize = 256;

/// JsonFileConnection manages the data directory and per-collection JSON
/// files.
///
/// All mutations happen under one lock, and schedule change events are sent
/// while the lock is held, so a subscriber's initial snapshot and its event
/// stream can never disagree.
pub struct JsonFileConnection {
    base_directory: PathBuf,
    write_lock: Mutex<()>,
    schedule_events: broadcast::Sender<ScheduleEvent>,
}

impl JsonFileConnection {
    /// Create a new connection with a base directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
        }

        let (schedule_events, _) = broadcast::channel(SCHEDULE_FEED_CAPACITY);

        Ok(Self {
            base_directory: base_path,
            write_lock: Mutex::new(()),
            schedule_events,
        })
    }

    /// Get the base directory path.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub(crate) fn collection_path(&self, collection: &str) -> PathBuf {
        self.base_directory.join(format!("{}.json", collection))
    }

    /// Take the store-wide mutation lock. Repositories hold this across
    /// their read-modify-write cycle and any event send.
    ///
    /// The guarded state is the collection files, which stay consistent
    /// thanks to the atomic writes, so a poisoned lock is recovered rather
    /// than propagated as a panic.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn schedule_events(&self) -> &broadcast::Sender<ScheduleEvent> {
        &self.schedule_events
    }

    /// Load all records of a collection. A missing file is an empty
    /// collection.
    pub(crate) fn load_collection<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        let path = self.collection_path(collection);

        if !path.exists() {
            debug!("Collection file {} does not exist yet, returning empty", collection);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let records = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Save a collection, replacing its file atomically via temp + rename.
    pub(crate) fn save_collection<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<()> {
        let path = self.collection_path(collection);
        let content = serde_json::to_string_pretty(records)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }
}
