use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::commands::schedules::{
    CreateScheduleCommand, CreateScheduleResult, DeleteScheduleResult, UpdateScheduleCommand,
    UpdateScheduleResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::schedule::{parse_duration, Schedule, Step};
use crate::domain::permissions;
use crate::storage::jsonfile::{JsonFileConnection, ScheduleRepository};
use crate::storage::traits::ScheduleStore;
use shared::Role;

/// Mutation gateway for schedules.
///
/// Create stamps ownership and provenance from the resolved identity. The
/// `checked_*` variants run the permission rules before mutating; the raw
/// variants are kept for internal callers that have already checked.
#[derive(Clone)]
pub struct ScheduleService {
    schedule_repository: ScheduleRepository,
}

impl ScheduleService {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self {
            schedule_repository: ScheduleRepository::new(connection),
        }
    }

    /// Create a new schedule owned by the given identity.
    pub fn create_schedule(
        &self,
        identity: &ResolvedIdentity,
        command: CreateScheduleCommand,
    ) -> DomainResult<CreateScheduleResult> {
        info!("Creating schedule '{}' for user {}", command.name, identity.user_id);

        self.validate_create_command(&command)?;

        let now = Utc::now();
        let caregiver_id = match identity.role {
            Role::Caregiver => Some(identity.user_id.clone()),
            Role::Teacher | Role::Child => identity.caregiver_id.clone(),
        };

        let schedule = Schedule {
            id: Schedule::generate_id(),
            user_id: identity.user_id.clone(),
            name: command.name.trim().to_string(),
            steps: command.steps,
            is_published: command.is_published,
            routine_type: command.routine_type,
            creator_role: identity.role,
            caregiver_id,
            created_at: now,
            updated_at: now,
        };

        self.schedule_repository.store_schedule(&schedule)?;

        info!("Created schedule {} ({})", schedule.name, schedule.id);
        Ok(CreateScheduleResult { schedule })
    }

    /// Merge a partial update into an existing schedule and refresh
    /// `updated_at`. Does not check permissions; see
    /// [`Self::checked_update_schedule`].
    pub fn update_schedule(&self, command: UpdateScheduleCommand) -> DomainResult<UpdateScheduleResult> {
        Self::validate_schedule_id(&command.schedule_id)?;

        let mut schedule = self
            .schedule_repository
            .get_schedule(&command.schedule_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Schedule {}", command.schedule_id)))?;

        if let Some(ref name) = command.name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation("Schedule name cannot be empty".to_string()));
            }
        }
        if let Some(ref steps) = command.steps {
            self.validate_steps(steps)?;
        }

        if let Some(name) = command.name {
            schedule.name = name.trim().to_string();
        }
        if let Some(steps) = command.steps {
            schedule.steps = steps;
        }
        if let Some(is_published) = command.is_published {
            schedule.is_published = is_published;
        }
        if let Some(routine_type) = command.routine_type {
            schedule.routine_type = routine_type;
        }

        schedule.updated_at = Utc::now();
        self.schedule_repository.update_schedule(&schedule)?;

        info!("Updated schedule {}", schedule.id);
        Ok(UpdateScheduleResult { schedule })
    }

    /// Update after verifying the identity may edit the target schedule.
    pub fn checked_update_schedule(
        &self,
        identity: &ResolvedIdentity,
        command: UpdateScheduleCommand,
    ) -> DomainResult<UpdateScheduleResult> {
        Self::validate_schedule_id(&command.schedule_id)?;
        self.ensure_can_edit(identity, &command.schedule_id)?;
        self.update_schedule(command)
    }

    /// Delete a schedule permanently. No soft-delete, no recovery path.
    pub fn delete_schedule(&self, schedule_id: &str) -> DomainResult<DeleteScheduleResult> {
        Self::validate_schedule_id(schedule_id)?;

        if !self.schedule_repository.delete_schedule(schedule_id)? {
            return Err(DomainError::NotFound(format!("Schedule {}", schedule_id)));
        }

        Ok(DeleteScheduleResult {
            success_message: format!("Schedule {} deleted", schedule_id),
        })
    }

    /// Delete after verifying the identity may edit the target schedule.
    pub fn checked_delete_schedule(
        &self,
        identity: &ResolvedIdentity,
        schedule_id: &str,
    ) -> DomainResult<DeleteScheduleResult> {
        Self::validate_schedule_id(schedule_id)?;
        self.ensure_can_edit(identity, schedule_id)?;
        self.delete_schedule(schedule_id)
    }

    /// Fetch a schedule by id. `Ok(None)` is the not-found outcome,
    /// distinct from an error.
    pub fn get_schedule(&self, schedule_id: &str) -> DomainResult<Option<Schedule>> {
        Self::validate_schedule_id(schedule_id)?;
        Ok(self.schedule_repository.get_schedule(schedule_id)?)
    }

    /// Advisory permission check for the caller-facing API. A missing
    /// schedule is not editable.
    pub fn can_edit_schedule(
        &self,
        identity: &ResolvedIdentity,
        schedule_id: &str,
    ) -> DomainResult<bool> {
        Self::validate_schedule_id(schedule_id)?;
        let schedule = self.schedule_repository.get_schedule(schedule_id)?;
        Ok(schedule
            .map(|s| permissions::can_edit(identity, &s))
            .unwrap_or(false))
    }

    fn ensure_can_edit(&self, identity: &ResolvedIdentity, schedule_id: &str) -> DomainResult<()> {
        let schedule = self
            .schedule_repository
            .get_schedule(schedule_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Schedule {}", schedule_id)))?;

        if !permissions::can_edit(identity, &schedule) {
            warn!(
                "Denied {} ({}) mutating schedule {} authored by {}",
                identity.user_id,
                identity.role.as_str(),
                schedule.id,
                schedule.creator_role.as_str()
            );
            return Err(DomainError::PermissionDenied(format!(
                "{} may not edit schedule {}",
                identity.user_id, schedule.id
            )));
        }
        Ok(())
    }

    /// Reject a structurally invalid id before any storage call.
    fn validate_schedule_id(schedule_id: &str) -> DomainResult<()> {
        if schedule_id.trim().is_empty() {
            return Err(DomainError::Validation("Schedule id cannot be empty".to_string()));
        }
        Ok(())
    }

    fn validate_create_command(&self, command: &CreateScheduleCommand) -> DomainResult<()> {
        if command.name.trim().is_empty() {
            return Err(DomainError::Validation("Schedule name cannot be empty".to_string()));
        }
        if command.name.len() > 100 {
            return Err(DomainError::Validation(
                "Schedule name cannot exceed 100 characters".to_string(),
            ));
        }
        self.validate_steps(&command.steps)
    }

    /// The gateway never renumbers steps itself; callers must submit a
    /// consistent list.
    fn validate_steps(&self, steps: &[Step]) -> DomainResult<()> {
        for (index, step) in steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(DomainError::Validation("Step name cannot be empty".to_string()));
            }
            if parse_duration(&step.duration).is_none() {
                return Err(DomainError::Validation(format!(
                    "Step '{}' has an invalid duration '{}'; expected mm:ss",
                    step.name, step.duration
                )));
            }
            if step.step_number != index as u32 + 1 {
                return Err(DomainError::Validation(format!(
                    "Step numbers must be contiguous 1..N; step '{}' has number {}",
                    step.name, step.step_number
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::jsonfile::test_utils::{sample_schedule, TestHelper};

    fn setup() -> (TestHelper, ScheduleService) {
        let helper = TestHelper::new().unwrap();
        let service = ScheduleService::new(helper.env.connection.clone());
        (helper, service)
    }

    fn caregiver_identity(user_id: &str) -> ResolvedIdentity {
        ResolvedIdentity {
            user_id: user_id.to_string(),
            name: "Dana".to_string(),
            role: Role::Caregiver,
            caregiver_id: None,
            teachers: Vec::new(),
        }
    }

    fn teacher_identity(user_id: &str, caregiver_id: &str) -> ResolvedIdentity {
        ResolvedIdentity {
            user_id: user_id.to_string(),
            name: "Sam".to_string(),
            role: Role::Teacher,
            caregiver_id: Some(caregiver_id.to_string()),
            teachers: Vec::new(),
        }
    }

    fn create_command(template: &Schedule) -> CreateScheduleCommand {
        CreateScheduleCommand {
            name: template.name.clone(),
            steps: template.steps.clone(),
            is_published: template.is_published,
            routine_type: template.routine_type.clone(),
        }
    }

    #[test]
    fn test_create_and_get_round_trip() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");
        let template = sample_schedule("ignored", "cg-1", Role::Caregiver, false);

        let created = service
            .create_schedule(&identity, create_command(&template))
            .unwrap()
            .schedule;

        assert_eq!(created.user_id, "cg-1");
        assert_eq!(created.creator_role, Role::Caregiver);
        assert_eq!(created.caregiver_id.as_deref(), Some("cg-1"));
        assert!(created.created_at <= created.updated_at);

        let fetched = service.get_schedule(&created.id).unwrap().expect("should exist");
        assert_eq!(fetched.name, template.name);
        assert_eq!(fetched.steps, template.steps);
        assert_eq!(fetched.is_published, template.is_published);
        assert_eq!(fetched.routine_type, template.routine_type);
    }

    #[test]
    fn test_teacher_created_schedule_is_tagged_with_their_caregiver() {
        let (_helper, service) = setup();
        let identity = teacher_identity("t-1", "cg-1");
        let template = sample_schedule("ignored", "t-1", Role::Teacher, false);

        let created = service
            .create_schedule(&identity, create_command(&template))
            .unwrap()
            .schedule;

        assert_eq!(created.caregiver_id.as_deref(), Some("cg-1"));
        assert_eq!(created.creator_role, Role::Teacher);
    }

    #[test]
    fn test_blank_ids_are_rejected_before_storage() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");

        let update = UpdateScheduleCommand {
            schedule_id: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            service.update_schedule(update),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.delete_schedule("   "),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.get_schedule(""),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.can_edit_schedule(&identity, ""),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_update_merges_partial_fields_and_refreshes_updated_at() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");
        let template = sample_schedule("ignored", "cg-1", Role::Caregiver, false);
        let created = service
            .create_schedule(&identity, create_command(&template))
            .unwrap()
            .schedule;

        let updated = service
            .update_schedule(UpdateScheduleCommand {
                schedule_id: created.id.clone(),
                is_published: Some(true),
                ..Default::default()
            })
            .unwrap()
            .schedule;

        assert!(updated.is_published);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.steps, created.steps);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[test]
    fn test_update_missing_schedule_is_not_found() {
        let (_helper, service) = setup();
        let result = service.update_schedule(UpdateScheduleCommand {
            schedule_id: "schedule::missing".to_string(),
            name: Some("New Name".to_string()),
            ..Default::default()
        });
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_invalid_step_durations_are_rejected() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");
        let mut template = sample_schedule("ignored", "cg-1", Role::Caregiver, false);
        template.steps[0].duration = "soon".to_string();

        let result = service.create_schedule(&identity, create_command(&template));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_non_contiguous_step_numbers_are_rejected() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");
        let mut template = sample_schedule("ignored", "cg-1", Role::Caregiver, false);
        template.steps[1].step_number = 5;

        let result = service.create_schedule(&identity, create_command(&template));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_checked_update_denies_teacher_on_caregiver_material() {
        let (_helper, service) = setup();
        let caregiver = caregiver_identity("cg-1");
        let teacher = teacher_identity("t-1", "cg-1");
        let template = sample_schedule("ignored", "cg-1", Role::Caregiver, true);
        let created = service
            .create_schedule(&caregiver, create_command(&template))
            .unwrap()
            .schedule;

        let result = service.checked_update_schedule(
            &teacher,
            UpdateScheduleCommand {
                schedule_id: created.id.clone(),
                name: Some("Hijacked".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(DomainError::PermissionDenied(_))));

        // The record is untouched.
        let fetched = service.get_schedule(&created.id).unwrap().unwrap();
        assert_eq!(fetched.name, created.name);
    }

    #[test]
    fn test_checked_delete_allows_caregiver_on_teacher_schedule() {
        let (_helper, service) = setup();
        let caregiver = caregiver_identity("cg-1");
        let teacher = teacher_identity("t-1", "cg-1");
        let template = sample_schedule("ignored", "t-1", Role::Teacher, true);
        let created = service
            .create_schedule(&teacher, create_command(&template))
            .unwrap()
            .schedule;

        service.checked_delete_schedule(&caregiver, &created.id).unwrap();
        assert!(service.get_schedule(&created.id).unwrap().is_none());
    }

    #[test]
    fn test_can_edit_schedule_missing_record_is_false() {
        let (_helper, service) = setup();
        let identity = caregiver_identity("cg-1");
        assert!(!service.can_edit_schedule(&identity, "schedule::missing").unwrap());
    }
}
