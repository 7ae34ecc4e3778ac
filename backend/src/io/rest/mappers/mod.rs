//! Mappers between `shared` DTOs and domain types.

pub mod activity_mapper;
pub mod schedule_mapper;
pub mod task_mapper;
