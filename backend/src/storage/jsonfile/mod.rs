//! # JSON-File Storage Module
//!
//! A file-based document store for the routine tracker. Each collection
//! (`users`, `schedules`, `invites`, `recent_activities`, `tasks`) lives in
//! one JSON file under the data directory, written atomically via a temp
//! file. Mutations to the schedules collection are announced on a broadcast
//! change feed, which is what makes live queries possible without a real
//! backend.
//!
//! The domain layer only sees the traits in `storage::traits`, so this
//! backend is interchangeable with anything else that implements them.

pub mod activity_repository;
pub mod connection;
pub mod invite_repository;
pub mod schedule_repository;
pub mod task_repository;
pub mod user_repository;

#[cfg(test)]
pub mod test_utils;

pub use activity_repository::ActivityRepository;
pub use connection::JsonFileConnection;
pub use invite_repository::InviteRepository;
pub use schedule_repository::ScheduleRepository;
pub use task_repository::TaskRepository;
pub use user_repository::UserRepository;
