//! # Storage Module
//!
//! Storage abstraction traits and the JSON-file document store backing them.
//! The domain layer only depends on the traits in [`traits`]; the
//! [`jsonfile`] backend is one interchangeable implementation.

pub mod jsonfile;
pub mod traits;

pub use traits::{
    ActivityStore, InviteStore, ScheduleEvent, ScheduleFeed, ScheduleStore, TaskStore, UserStore,
};
