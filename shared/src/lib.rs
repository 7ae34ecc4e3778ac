use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a principal in the system.
///
/// Roles are fixed at registration. The permission rules in the backend
/// match exhaustively on this enum, so adding a variant forces every rule
/// site to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Supervises a group of children and their teachers.
    Caregiver,
    /// Builds routines for children linked to a caregiver.
    Teacher,
    /// Executes published routines; read-only on everything else.
    Child,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Caregiver => "caregiver",
            Role::Teacher => "teacher",
            Role::Child => "child",
        }
    }
}

/// One activity within a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepDto {
    pub id: String,
    pub name: String,
    /// Emoji or icon reference shown to the child.
    pub icon: String,
    /// Duration as "mm:ss".
    pub duration: String,
    /// 1-based position; contiguous within a schedule.
    pub step_number: u32,
    #[serde(default)]
    pub notes: String,
    /// Color used for the child-facing visual grouping.
    #[serde(default)]
    pub color_tag: String,
    /// Text spoken aloud when the step starts.
    #[serde(default)]
    pub voice_prompt: String,
    /// URI of an uploaded or recorded audio clip, if any.
    #[serde(default)]
    pub audio_note: Option<String>,
}

/// A routine: a named, ordered sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDto {
    pub id: String,
    /// Owning user id; the mutation-ownership baseline.
    pub user_id: String,
    pub name: String,
    pub steps: Vec<StepDto>,
    /// Draft vs. live; only published schedules are executable by a child.
    pub is_published: bool,
    /// Free-text category used for icon/color lookup.
    pub routine_type: String,
    /// Role of the user who created the schedule.
    pub creator_role: Role,
    /// Caregiver this schedule is shared under.
    pub caregiver_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
    pub steps: Vec<StepDto>,
    #[serde(default)]
    pub is_published: bool,
    pub routine_type: String,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub name: Option<String>,
    pub steps: Option<Vec<StepDto>>,
    pub is_published: Option<bool>,
    pub routine_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<ScheduleDto>,
    /// Messages from live-query sources that stopped delivering updates.
    #[serde(default)]
    pub source_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanEditResponse {
    pub can_edit: bool,
}

/// The resolved view of the authenticated principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityResponse {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub caregiver_id: Option<String>,
    #[serde(default)]
    pub teachers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateInviteResponse {
    /// Short one-time code handed to the invitee out of band.
    pub code: String,
    pub created_at: DateTime<Utc>,
}

/// Registration of an invited teacher or child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemInviteRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentActivityDto {
    pub id: String,
    pub user_id: String,
    pub activity_type: String,
    pub title: String,
    pub icon: String,
    pub duration: Option<u32>,
    pub action: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordActivityRequest {
    pub activity_type: String,
    pub title: String,
    pub icon: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordTimerActivityRequest {
    /// Timer duration in seconds.
    pub duration: u32,
    /// "started", "completed", etc.
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub done: Option<bool>,
}
