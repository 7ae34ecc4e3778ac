use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::commands::activities::RecordActivityCommand;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::identity_service::ResolvedIdentity;
use crate::domain::models::activity::RecentActivity;
use crate::storage::jsonfile::{ActivityRepository, JsonFileConnection};
use crate::storage::traits::ActivityStore;

/// How many entries a recent-activity listing returns at most.
pub const RECENT_ACTIVITY_LIMIT: usize = 20;

/// Append-only log of timer and routine actions, per user.
#[derive(Clone)]
pub struct ActivityService {
    activity_repository: ActivityRepository,
}

impl ActivityService {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self {
            activity_repository: ActivityRepository::new(connection),
        }
    }

    pub fn record_activity(
        &self,
        identity: &ResolvedIdentity,
        command: RecordActivityCommand,
    ) -> DomainResult<RecentActivity> {
        if command.title.trim().is_empty() {
            return Err(DomainError::Validation("Activity title cannot be empty".to_string()));
        }

        let activity = RecentActivity {
            id: RecentActivity::generate_id(),
            user_id: identity.user_id.clone(),
            activity_type: command.activity_type,
            title: command.title,
            icon: command.icon,
            duration: command.duration,
            action: command.action,
            timestamp: Utc::now(),
        };
        self.activity_repository.store_activity(&activity)?;

        info!("Recorded {} activity for {}", activity.activity_type, identity.user_id);
        Ok(activity)
    }

    /// Convenience wrapper for timer events: builds the title and icon from
    /// the action and elapsed seconds.
    pub fn record_timer_activity(
        &self,
        identity: &ResolvedIdentity,
        action: &str,
        duration_seconds: u32,
    ) -> DomainResult<RecentActivity> {
        if action.trim().is_empty() {
            return Err(DomainError::Validation("Timer action cannot be empty".to_string()));
        }

        let minutes = duration_seconds / 60;
        let seconds = duration_seconds % 60;
        let icon = if action == "completed" { "✅" } else { "⏰" };

        self.record_activity(
            identity,
            RecordActivityCommand {
                activity_type: "timer".to_string(),
                title: format!("Timer {} ({}:{:02})", action, minutes, seconds),
                icon: icon.to_string(),
                duration: Some(duration_seconds),
                action: Some(action.to_string()),
            },
        )
    }

    /// Newest first, capped at [`RECENT_ACTIVITY_LIMIT`].
    pub fn list_recent_activities(
        &self,
        identity: &ResolvedIdentity,
    ) -> DomainResult<Vec<RecentActivity>> {
        Ok(self
            .activity_repository
            .list_recent_activities(&identity.user_id, RECENT_ACTIVITY_LIMIT)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::jsonfile::test_utils::TestHelper;
    use shared::Role;

    fn setup() -> (TestHelper, ActivityService) {
        let helper = TestHelper::new().unwrap();
        let service = ActivityService::new(helper.env.connection.clone());
        (helper, service)
    }

    fn identity(user_id: &str) -> ResolvedIdentity {
        ResolvedIdentity {
            user_id: user_id.to_string(),
            name: "Test".to_string(),
            role: Role::Child,
            caregiver_id: None,
            teachers: Vec::new(),
        }
    }

    #[test]
    fn test_timer_activity_title_and_icon() {
        let (_helper, service) = setup();
        let completed = service
            .record_timer_activity(&identity("ch-1"), "completed", 125)
            .unwrap();
        assert_eq!(completed.title, "Timer completed (2:05)");
        assert_eq!(completed.icon, "✅");
        assert_eq!(completed.duration, Some(125));

        let started = service
            .record_timer_activity(&identity("ch-1"), "started", 60)
            .unwrap();
        assert_eq!(started.title, "Timer started (1:00)");
        assert_eq!(started.icon, "⏰");
    }

    #[test]
    fn test_listing_is_per_user_and_capped() {
        let (_helper, service) = setup();
        for i in 0..RECENT_ACTIVITY_LIMIT + 5 {
            service
                .record_timer_activity(&identity("ch-1"), "started", i as u32)
                .unwrap();
        }
        service.record_timer_activity(&identity("ch-2"), "started", 1).unwrap();

        let listed = service.list_recent_activities(&identity("ch-1")).unwrap();
        assert_eq!(listed.len(), RECENT_ACTIVITY_LIMIT);
        assert!(listed.iter().all(|a| a.user_id == "ch-1"));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let (_helper, service) = setup();
        let result = service.record_activity(
            &identity("ch-1"),
            RecordActivityCommand {
                activity_type: "routine".to_string(),
                title: "  ".to_string(),
                icon: "🌙".to_string(),
                duration: None,
                action: None,
            },
        );
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
