//! Edit-permission rules for schedules.
//!
//! Rules are evaluated in order, first match wins:
//! 1. Authorship always grants edit rights.
//! 2. A caregiver may edit any schedule visible to them.
//! 3. A teacher may not modify caregiver-authored material, even shared.
//! 4. Everything else is denied; children are read-only on schedules they
//!    did not author.

use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::schedule::Schedule;
use shared::Role;

/// Decide whether `identity` may mutate `schedule`.
///
/// Pure; callers must re-evaluate whenever the schedule or the viewing
/// principal changes.
pub fn can_edit(identity: &ResolvedIdentity, schedule: &Schedule) -> bool {
    if schedule.user_id == identity.user_id {
        return true;
    }

    match (identity.role, schedule.creator_role) {
        (Role::Caregiver, _) => true,
        (Role::Teacher, Role::Caregiver) => false,
        (Role::Teacher, Role::Teacher) => false,
        (Role::Teacher, Role::Child) => false,
        (Role::Child, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::jsonfile::test_utils::sample_schedule;

    fn identity(user_id: &str, role: Role) -> ResolvedIdentity {
        ResolvedIdentity {
            user_id: user_id.to_string(),
            name: "Test".to_string(),
            role,
            caregiver_id: None,
            teachers: Vec::new(),
        }
    }

    #[test]
    fn test_owner_may_edit_regardless_of_role() {
        for role in [Role::Caregiver, Role::Teacher, Role::Child] {
            let schedule = sample_schedule("s1", "me", role, true);
            assert!(can_edit(&identity("me", role), &schedule));
        }
    }

    #[test]
    fn test_caregiver_may_edit_anything_visible() {
        let teacher_authored = sample_schedule("s1", "t-1", Role::Teacher, true);
        let child_authored = sample_schedule("s2", "ch-1", Role::Child, false);
        let caregiver = identity("cg-1", Role::Caregiver);

        assert!(can_edit(&caregiver, &teacher_authored));
        assert!(can_edit(&caregiver, &child_authored));
    }

    #[test]
    fn test_teacher_denied_on_caregiver_authored() {
        let schedule = sample_schedule("s1", "cg-1", Role::Caregiver, true);
        assert!(!can_edit(&identity("t-1", Role::Teacher), &schedule));
    }

    #[test]
    fn test_teacher_denied_on_other_teachers_schedule() {
        let schedule = sample_schedule("s1", "t-2", Role::Teacher, true);
        assert!(!can_edit(&identity("t-1", Role::Teacher), &schedule));
    }

    #[test]
    fn test_child_denied_on_anything_not_their_own() {
        let schedule = sample_schedule("s1", "cg-1", Role::Caregiver, true);
        assert!(!can_edit(&identity("ch-1", Role::Child), &schedule));
    }
}
