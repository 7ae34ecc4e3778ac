//! Domain-level command and result types.
//!
//! These structs are used by services inside the domain layer and are not
//! exposed over the public API. The REST layer maps the DTOs defined in the
//! `shared` crate to these internal types.

pub mod schedules {
    use crate::domain::models::schedule::{Schedule, Step};

    /// Input for creating a new schedule. Ownership and provenance fields
    /// are stamped by the service from the resolved identity.
    #[derive(Debug, Clone)]
    pub struct CreateScheduleCommand {
        pub name: String,
        pub steps: Vec<Step>,
        pub is_published: bool,
        pub routine_type: String,
    }

    /// Partial update; `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateScheduleCommand {
        pub schedule_id: String,
        pub name: Option<String>,
        pub steps: Option<Vec<Step>>,
        pub is_published: Option<bool>,
        pub routine_type: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateScheduleResult {
        pub schedule: Schedule,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateScheduleResult {
        pub schedule: Schedule,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteScheduleResult {
        pub success_message: String,
    }
}

pub mod invites {
    use crate::domain::models::{invite::Invite, user::User};
    use shared::Role;

    #[derive(Debug, Clone)]
    pub struct CreateInviteResult {
        pub invite: Invite,
    }

    /// Registration of an invited teacher or child with a one-time code.
    #[derive(Debug, Clone)]
    pub struct RedeemInviteCommand {
        pub code: String,
        /// Principal id of the registrant, from the auth provider.
        pub user_id: String,
        pub name: String,
        pub email: String,
        pub role: Role,
    }

    #[derive(Debug, Clone)]
    pub struct RedeemInviteResult {
        pub user: User,
    }
}

pub mod activities {
    /// Input for appending a recent-activity entry.
    #[derive(Debug, Clone)]
    pub struct RecordActivityCommand {
        pub activity_type: String,
        pub title: String,
        pub icon: String,
        pub duration: Option<u32>,
        pub action: Option<String>,
    }
}

pub mod tasks {
    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub title: String,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateTaskCommand {
        pub task_id: String,
        pub title: Option<String>,
        pub done: Option<bool>,
    }
}
