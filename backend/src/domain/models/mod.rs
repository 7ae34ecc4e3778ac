pub mod activity;
pub mod invite;
pub mod schedule;
pub mod task;
pub mod user;
