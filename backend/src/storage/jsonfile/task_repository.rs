use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

use super::connection::JsonFileConnection;
use crate::domain::models::task::Task;
use crate::storage::traits::TaskStore;

const COLLECTION: &str = "tasks";

/// JSON-file task repository.
#[derive(Clone)]
pub struct TaskRepository {
    connection: Arc<JsonFileConnection>,
}

impl TaskRepository {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<Task>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save(&self, records: &[Task]) -> Result<()> {
        self.connection.save_collection(COLLECTION, records)
    }
}

impl TaskStore for TaskRepository {
    fn store_task(&self, task: &Task) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        records.retain(|t| t.id != task.id);
        records.push(task.clone());
        self.save(&records)
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        let _guard = self.connection.lock();
        let records = self.load()?;
        Ok(records.into_iter().find(|t| t.id == task_id))
    }

    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let _guard = self.connection.lock();
        let mut records: Vec<Task> = self
            .load()?
            .into_iter()
            .filter(|t| t.user_id == user_id)
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    fn update_task(&self, task: &Task) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|t| t.id != task.id);
        if records.len() == before {
            warn!("Attempted to update a non-existent task: {}", task.id);
            return Err(anyhow::anyhow!("Task not found for update: {}", task.id));
        }
        records.push(task.clone());
        self.save(&records)
    }

    fn delete_task(&self, task_id: &str) -> Result<bool> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|t| t.id != task_id);
        let deleted = records.len() != before;
        if deleted {
            self.save(&records)?;
        }
        Ok(deleted)
    }
}
