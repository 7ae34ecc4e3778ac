use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::user::User;
use crate::storage::jsonfile::{JsonFileConnection, UserRepository};
use crate::storage::traits::UserStore;
use shared::Role;

/// The resolved view of an authenticated principal: role plus linkage.
///
/// Every core operation takes this explicitly; nothing reads an ambient
/// "current user".
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub caregiver_id: Option<String>,
    pub teachers: Vec<String>,
}

impl ResolvedIdentity {
    /// Least-privileged identity for an authenticated principal without a
    /// profile document. The child role grants nothing beyond ownership of
    /// the principal's own records.
    pub fn fallback(principal_id: &str) -> Self {
        Self {
            user_id: principal_id.to_string(),
            name: "User".to_string(),
            role: Role::Child,
            caregiver_id: None,
            teachers: Vec::new(),
        }
    }

    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            caregiver_id: user.caregiver_id.clone(),
            teachers: user.teachers.clone(),
        }
    }
}

/// Service resolving authenticated principals to their profile records.
#[derive(Clone)]
pub struct IdentityService {
    user_repository: UserRepository,
}

impl IdentityService {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self {
            user_repository: UserRepository::new(connection),
        }
    }

    /// Resolve a principal id to their profile. `Ok(None)` means the
    /// principal is authenticated but has no profile document.
    pub fn resolve(&self, principal_id: &str) -> DomainResult<Option<ResolvedIdentity>> {
        if principal_id.trim().is_empty() {
            return Err(DomainError::AuthenticationRequired);
        }

        match self.user_repository.get_user(principal_id)? {
            Some(user) => {
                debug!("Resolved {} as {}", principal_id, user.role.as_str());
                Ok(Some(ResolvedIdentity::from_user(&user)))
            }
            None => {
                warn!("No profile document for principal {}", principal_id);
                Ok(None)
            }
        }
    }

    /// Resolve, falling back to the least-privileged identity when the
    /// profile is missing or unreadable.
    pub fn resolve_or_fallback(&self, principal_id: &str) -> DomainResult<ResolvedIdentity> {
        match self.resolve(principal_id) {
            Ok(Some(identity)) => Ok(identity),
            Ok(None) => Ok(ResolvedIdentity::fallback(principal_id)),
            Err(DomainError::AuthenticationRequired) => Err(DomainError::AuthenticationRequired),
            Err(error) => {
                warn!("Identity resolution failed for {}: {}", principal_id, error);
                Ok(ResolvedIdentity::fallback(principal_id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::jsonfile::test_utils::TestHelper;

    fn setup() -> (TestHelper, IdentityService) {
        let helper = TestHelper::new().unwrap();
        let service = IdentityService::new(helper.env.connection.clone());
        (helper, service)
    }

    #[test]
    fn test_resolve_existing_profile() {
        let (helper, service) = setup();
        helper.create_caregiver("cg-1", &["t-1"], &["ch-1"]).unwrap();

        let identity = service.resolve("cg-1").unwrap().expect("should resolve");
        assert_eq!(identity.role, Role::Caregiver);
        assert_eq!(identity.teachers, vec!["t-1".to_string()]);
        assert!(identity.caregiver_id.is_none());
    }

    #[test]
    fn test_resolve_missing_profile_is_none() {
        let (_helper, service) = setup();
        assert!(service.resolve("stranger").unwrap().is_none());
    }

    #[test]
    fn test_empty_principal_is_rejected() {
        let (_helper, service) = setup();
        assert!(matches!(
            service.resolve("  "),
            Err(DomainError::AuthenticationRequired)
        ));
        assert!(matches!(
            service.resolve_or_fallback(""),
            Err(DomainError::AuthenticationRequired)
        ));
    }

    #[test]
    fn test_fallback_is_least_privileged() {
        let (_helper, service) = setup();
        let identity = service.resolve_or_fallback("stranger").unwrap();
        assert_eq!(identity.role, Role::Child);
        assert!(identity.caregiver_id.is_none());
        assert!(identity.teachers.is_empty());
    }
}
