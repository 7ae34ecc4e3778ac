use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A simple per-user to-do item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn generate_id() -> String {
        format!("task::{}", Uuid::new_v4())
    }
}
