//! # Domain Module
//!
//! Business logic for the routine tracker: identity resolution, the live
//! schedule aggregation, permission rules, and the services that mutate
//! schedules, invites, activities, and tasks. Services hold repositories
//! over one shared storage connection and are cheap to clone.

pub mod activity_service;
pub mod aggregator;
pub mod commands;
pub mod errors;
pub mod identity_service;
pub mod invite_service;
pub mod models;
pub mod permissions;
pub mod schedule_service;
pub mod task_service;

pub use activity_service::{ActivityService, RECENT_ACTIVITY_LIMIT};
pub use aggregator::{ScheduleAggregator, ScheduleSnapshot};
pub use errors::{DomainError, DomainResult};
pub use identity_service::{IdentityService, ResolvedIdentity};
pub use invite_service::InviteService;
pub use schedule_service::ScheduleService;
pub use task_service::TaskService;
