use chrono::Utc;
use std::sync::Arc;

use crate::domain::commands::tasks::{CreateTaskCommand, UpdateTaskCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::task::Task;
use crate::storage::jsonfile::{JsonFileConnection, TaskRepository};
use crate::storage::traits::TaskStore;

/// Per-user to-do list.
#[derive(Clone)]
pub struct TaskService {
    task_repository: TaskRepository,
}

impl TaskService {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self {
            task_repository: TaskRepository::new(connection),
        }
    }

    pub fn add_task(&self, identity: &ResolvedIdentity, command: CreateTaskCommand) -> DomainResult<Task> {
        if command.title.trim().is_empty() {
            return Err(DomainError::Validation("Task title cannot be empty".to_string()));
        }

        let task = Task {
            id: Task::generate_id(),
            user_id: identity.user_id.clone(),
            title: command.title.trim().to_string(),
            done: false,
            created_at: Utc::now(),
        };
        self.task_repository.store_task(&task)?;
        Ok(task)
    }

    pub fn update_task(&self, identity: &ResolvedIdentity, command: UpdateTaskCommand) -> DomainResult<Task> {
        if command.task_id.trim().is_empty() {
            return Err(DomainError::Validation("Task id cannot be empty".to_string()));
        }

        let mut task = self
            .task_repository
            .get_task(&command.task_id)?
            .filter(|t| t.user_id == identity.user_id)
            .ok_or_else(|| DomainError::NotFound(format!("Task {}", command.task_id)))?;

        if let Some(title) = command.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Task title cannot be empty".to_string()));
            }
            task.title = title.trim().to_string();
        }
        if let Some(done) = command.done {
            task.done = done;
        }

        self.task_repository.update_task(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, identity: &ResolvedIdentity, task_id: &str) -> DomainResult<()> {
        if task_id.trim().is_empty() {
            return Err(DomainError::Validation("Task id cannot be empty".to_string()));
        }

        let owned = self
            .task_repository
            .get_task(task_id)?
            .map(|t| t.user_id == identity.user_id)
            .unwrap_or(false);
        if !owned || !self.task_repository.delete_task(task_id)? {
            return Err(DomainError::NotFound(format!("Task {}", task_id)));
        }
        Ok(())
    }

    /// All of the identity's tasks, oldest first.
    pub fn list_tasks(&self, identity: &ResolvedIdentity) -> DomainResult<Vec<Task>> {
        Ok(self.task_repository.list_tasks(&identity.user_id)?)
    }
}
