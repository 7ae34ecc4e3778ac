use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Append-only log entry for timer and routine-execution actions.
///
/// Never mutated or deleted by normal flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub id: String,
    pub user_id: String,
    /// Free-form category, e.g. "timer" or "routine".
    pub activity_type: String,
    pub title: String,
    pub icon: String,
    /// Duration in seconds for timer activities.
    #[serde(default)]
    pub duration: Option<u32>,
    /// Action for timer activities, e.g. "started" or "completed".
    #[serde(default)]
    pub action: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl RecentActivity {
    pub fn generate_id() -> String {
        format!("activity::{}", Uuid::new_v4())
    }
}
