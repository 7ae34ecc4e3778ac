use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

use super::connection::JsonFileConnection;
use crate::domain::models::activity::RecentActivity;
use crate::storage::traits::ActivityStore;

const COLLECTION: &str = "recent_activities";

/// JSON-file repository for the append-only activity log.
#[derive(Clone)]
pub struct ActivityRepository {
    connection: Arc<JsonFileConnection>,
}

impl ActivityRepository {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<RecentActivity>> {
        self.connection.load_collection(COLLECTION)
    }
}

impl ActivityStore for ActivityRepository {
    fn store_activity(&self, activity: &RecentActivity) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        records.push(activity.clone());
        self.connection.save_collection(COLLECTION, &records)?;
        debug!("Appended activity {} for user {}", activity.id, activity.user_id);
        Ok(())
    }

    fn list_recent_activities(&self, user_id: &str, limit: usize) -> Result<Vec<RecentActivity>> {
        let _guard = self.connection.lock();
        let mut records: Vec<RecentActivity> = self
            .load()?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(limit);
        Ok(records)
    }
}
