use std::sync::Arc;
use tracing::info;

use crate::domain::commands::invites::{CreateInviteResult, RedeemInviteCommand, RedeemInviteResult};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::invite::Invite;
use crate::domain::models::user::User;
use crate::storage::jsonfile::{InviteRepository, JsonFileConnection, UserRepository};
use crate::storage::traits::{InviteStore, UserStore};
use shared::Role;

/// Invite codes linking teachers and children to a caregiver.
///
/// Only caregivers mint codes; redeeming one creates the registrant's
/// profile and records the linkage on both sides.
#[derive(Clone)]
pub struct InviteService {
    invite_repository: InviteRepository,
    user_repository: UserRepository,
}

impl InviteService {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self {
            invite_repository: InviteRepository::new(connection.clone()),
            user_repository: UserRepository::new(connection),
        }
    }

    pub fn create_invite(&self, identity: &ResolvedIdentity) -> DomainResult<CreateInviteResult> {
        if identity.role != Role::Caregiver {
            return Err(DomainError::PermissionDenied(
                "Only caregivers can create invite codes".to_string(),
            ));
        }

        let invite = Invite::new(&identity.user_id);
        self.invite_repository.store_invite(&invite)?;

        info!("Caregiver {} created invite {}", identity.user_id, invite.code);
        Ok(CreateInviteResult { invite })
    }

    /// Redeem a one-time code: create the registrant's profile, link it to
    /// the issuing caregiver, and burn the code.
    pub fn redeem_invite(&self, command: RedeemInviteCommand) -> DomainResult<RedeemInviteResult> {
        if command.code.trim().is_empty() {
            return Err(DomainError::Validation("Invite code cannot be empty".to_string()));
        }
        if command.role == Role::Caregiver {
            return Err(DomainError::Validation(
                "Caregivers register directly, not through an invite".to_string(),
            ));
        }

        let mut invite = self
            .invite_repository
            .get_invite(&command.code)?
            .ok_or_else(|| DomainError::NotFound(format!("Invite code {}", command.code)))?;

        if invite.used {
            return Err(DomainError::Validation(format!(
                "Invite code {} has already been redeemed",
                invite.code
            )));
        }

        let mut caregiver = self
            .user_repository
            .get_user(&invite.caregiver_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Caregiver {}", invite.caregiver_id)))?;

        let mut user = User::new(&command.user_id, &command.name, &command.email, command.role);
        user.caregiver_id = Some(caregiver.id.clone());
        self.user_repository.store_user(&user)?;

        match command.role {
            Role::Teacher => caregiver.teachers.push(user.id.clone()),
            Role::Child => caregiver.children.push(user.id.clone()),
            Role::Caregiver => unreachable!("rejected above"),
        }
        self.user_repository.update_user(&caregiver)?;

        invite.used = true;
        self.invite_repository.update_invite(&invite)?;

        info!(
            "Invite {} redeemed by {} as {}",
            invite.code,
            user.id,
            user.role.as_str()
        );
        Ok(RedeemInviteResult { user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::jsonfile::test_utils::TestHelper;

    fn setup() -> (TestHelper, InviteService) {
        let helper = TestHelper::new().unwrap();
        let service = InviteService::new(helper.env.connection.clone());
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

    fn redeem_command(code: &str, user_id: &str, role: Role) -> RedeemInviteCommand {
        RedeemInviteCommand {
            code: code.to_string(),
            user_id: user_id.to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_only_caregivers_can_create_invites() {
        let (_helper, service) = setup();
        let mut identity = caregiver_identity("t-1");
        identity.role = Role::Teacher;

        assert!(matches!(
            service.create_invite(&identity),
            Err(DomainError::PermissionDenied(_))
        ));
    }

    #[test]
    fn test_redeem_links_teacher_to_caregiver() {
        let (helper, service) = setup();
        helper.create_caregiver("cg-1", &[], &[]).unwrap();
        let invite = service.create_invite(&caregiver_identity("cg-1")).unwrap().invite;

        let result = service
            .redeem_invite(redeem_command(&invite.code, "t-1", Role::Teacher))
            .unwrap();

        assert_eq!(result.user.caregiver_id.as_deref(), Some("cg-1"));
        let caregiver = helper.user_repo.get_user("cg-1").unwrap().unwrap();
        assert_eq!(caregiver.teachers, vec!["t-1".to_string()]);
        assert!(caregiver.children.is_empty());
    }

    #[test]
    fn test_redeem_links_child_to_caregiver() {
        let (helper, service) = setup();
        helper.create_caregiver("cg-1", &[], &[]).unwrap();
        let invite = service.create_invite(&caregiver_identity("cg-1")).unwrap().invite;

        service
            .redeem_invite(redeem_command(&invite.code, "ch-1", Role::Child))
            .unwrap();

        let caregiver = helper.user_repo.get_user("cg-1").unwrap().unwrap();
        assert_eq!(caregiver.children, vec!["ch-1".to_string()]);
    }

    #[test]
    fn test_codes_are_single_use() {
        let (helper, service) = setup();
        helper.create_caregiver("cg-1", &[], &[]).unwrap();
        let invite = service.create_invite(&caregiver_identity("cg-1")).unwrap().invite;

        service
            .redeem_invite(redeem_command(&invite.code, "t-1", Role::Teacher))
            .unwrap();
        let second = service.redeem_invite(redeem_command(&invite.code, "t-2", Role::Teacher));

        assert!(matches!(second, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let (_helper, service) = setup();
        let result = service.redeem_invite(redeem_command("nope", "t-1", Role::Teacher));
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_caregiver_cannot_redeem() {
        let (helper, service) = setup();
        helper.create_caregiver("cg-1", &[], &[]).unwrap();
        let invite = service.create_invite(&caregiver_identity("cg-1")).unwrap().invite;

        let result = service.redeem_invite(redeem_command(&invite.code, "cg-2", Role::Caregiver));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
