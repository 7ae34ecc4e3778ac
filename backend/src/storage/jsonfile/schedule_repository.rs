use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::connection::JsonFileConnection;
use crate::domain::models::schedule::Schedule;
use crate::storage::traits::{ScheduleEvent, ScheduleFeed, ScheduleStore};

const COLLECTION: &str = "schedules";

/// JSON-file schedule repository with a broadcast change feed.
#[derive(Clone)]
pub struct ScheduleRepository {
    connection: Arc<JsonFileConnection>,
}

impl ScheduleRepository {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<Schedule>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save(&self, records: &[Schedule]) -> Result<()> {
        self.connection.save_collection(COLLECTION, records)
    }

    fn emit(&self, event: ScheduleEvent) {
        // A send error just means nobody is subscribed right now.
        let _ = self.connection.schedule_events().send(event);
    }
}

fn sort_newest_first(records: &mut [Schedule]) {
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

impl ScheduleStore for ScheduleRepository {
    fn store_schedule(&self, schedule: &Schedule) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        records.retain(|s| s.id != schedule.id);
        records.push(schedule.clone());
        self.save(&records)?;
        self.emit(ScheduleEvent::Upserted(schedule.clone()));
        info!("Stored schedule {} ({})", schedule.name, schedule.id);
        Ok(())
    }

    fn get_schedule(&self, schedule_id: &str) -> Result<Option<Schedule>> {
        let _guard = self.connection.lock();
        let records = self.load()?;
        Ok(records.into_iter().find(|s| s.id == schedule_id))
    }

    fn list_schedules_by_owner(&self, user_id: &str) -> Result<Vec<Schedule>> {
        let _guard = self.connection.lock();
        let mut records: Vec<Schedule> = self
            .load()?
            .into_iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn list_schedules_by_caregiver(&self, caregiver_id: &str) -> Result<Vec<Schedule>> {
        let _guard = self.connection.lock();
        let mut records: Vec<Schedule> = self
            .load()?
            .into_iter()
            .filter(|s| s.caregiver_id.as_deref() == Some(caregiver_id))
            .collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    fn update_schedule(&self, schedule: &Schedule) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|s| s.id != schedule.id);
        if records.len() == before {
            warn!("Attempted to update a non-existent schedule: {}", schedule.id);
            return Err(anyhow::anyhow!("Schedule not found for update: {}", schedule.id));
        }
        records.push(schedule.clone());
        self.save(&records)?;
        self.emit(ScheduleEvent::Upserted(schedule.clone()));
        debug!("Updated schedule {}", schedule.id);
        Ok(())
    }

    fn delete_schedule(&self, schedule_id: &str) -> Result<bool> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|s| s.id != schedule_id);
        let deleted = records.len() != before;
        if deleted {
            self.save(&records)?;
            self.emit(ScheduleEvent::Removed(schedule_id.to_string()));
            info!("Deleted schedule {}", schedule_id);
        }
        Ok(deleted)
    }

    fn subscribe(&self) -> Result<ScheduleFeed> {
        // Snapshot and receiver are taken under the same lock so no event
        // can fall between them.
        let _guard = self.connection.lock();
        let initial = self.load()?;
        let events = self.connection.schedule_events().subscribe();
        Ok(ScheduleFeed { initial, events })
    }
}
