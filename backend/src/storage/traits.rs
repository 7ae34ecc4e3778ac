//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! document-store backends to be used interchangeably in the domain layer.

use anyhow::Result;
use tokio::sync::broadcast;

use crate::domain::models::activity::RecentActivity;
use crate::domain::models::invite::Invite;
use crate::domain::models::schedule::Schedule;
use crate::domain::models::task::Task;
use crate::domain::models::user::User;

/// A change to the schedules collection, delivered on the live feed.
#[derive(Debug, Clone)]
pub enum ScheduleEvent {
    Upserted(Schedule),
    Removed(String),
}

/// A live query handle: the collection state at subscription time plus a
/// stream of every subsequent change.
///
/// The snapshot and the receiver are taken under the same lock, so no
/// change can fall between them. Subscribers filter the feed down to their
/// own predicate.
pub struct ScheduleFeed {
    pub initial: Vec<Schedule>,
    pub events: broadcast::Receiver<ScheduleEvent>,
}

/// Trait defining the interface for user (principal) storage operations.
pub trait UserStore: Send + Sync {
    /// Store a new user profile.
    fn store_user(&self, user: &User) -> Result<()>;

    /// Retrieve a specific user by id.
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Update an existing user.
    fn update_user(&self, user: &User) -> Result<()>;
}

/// Trait defining the interface for schedule storage operations.
pub trait ScheduleStore: Send + Sync {
    /// Store a new schedule.
    fn store_schedule(&self, schedule: &Schedule) -> Result<()>;

    /// Retrieve a specific schedule by id.
    fn get_schedule(&self, schedule_id: &str) -> Result<Option<Schedule>>;

    /// List schedules owned by a user, ordered by `updated_at` descending.
    fn list_schedules_by_owner(&self, user_id: &str) -> Result<Vec<Schedule>>;

    /// List schedules tagged with a caregiver, ordered by `updated_at`
    /// descending.
    fn list_schedules_by_caregiver(&self, caregiver_id: &str) -> Result<Vec<Schedule>>;

    /// Update an existing schedule.
    fn update_schedule(&self, schedule: &Schedule) -> Result<()>;

    /// Delete a schedule by id. Returns true if it existed.
    fn delete_schedule(&self, schedule_id: &str) -> Result<bool>;

    /// Open a live feed over the whole schedules collection.
    fn subscribe(&self) -> Result<ScheduleFeed>;
}

/// Trait defining the interface for invite storage operations.
pub trait InviteStore: Send + Sync {
    /// Store a new invite code.
    fn store_invite(&self, invite: &Invite) -> Result<()>;

    /// Retrieve an invite by its code.
    fn get_invite(&self, code: &str) -> Result<Option<Invite>>;

    /// Update an existing invite (marking it used).
    fn update_invite(&self, invite: &Invite) -> Result<()>;
}

/// Trait defining the interface for the append-only activity log.
pub trait ActivityStore: Send + Sync {
    /// Append an activity entry.
    fn store_activity(&self, activity: &RecentActivity) -> Result<()>;

    /// List a user's activities, newest first, capped at `limit`.
    fn list_recent_activities(&self, user_id: &str, limit: usize) -> Result<Vec<RecentActivity>>;
}

/// Trait defining the interface for task storage operations.
pub trait TaskStore: Send + Sync {
    /// Store a new task.
    fn store_task(&self, task: &Task) -> Result<()>;

    /// Retrieve a specific task by id.
    fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    /// List all tasks owned by a user.
    fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>>;

    /// Update an existing task.
    fn update_task(&self, task: &Task) -> Result<()>;

    /// Delete a task by id. Returns true if it existed.
    fn delete_task(&self, task_id: &str) -> Result<bool>;
}
