/// Test utilities for storage-backed tests.
///
/// Provides RAII-based cleanup: the temporary data directory is removed when
/// the environment is dropped, even if a test panics.
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tempfile::TempDir;

use super::activity_repository::ActivityRepository;
use super::connection::JsonFileConnection;
use super::invite_repository::InviteRepository;
use super::schedule_repository::ScheduleRepository;
use super::task_repository::TaskRepository;
use super::user_repository::UserRepository;
use crate::domain::models::schedule::{renumber_steps, Schedule, Step};
use crate::domain::models::user::User;
use crate::storage::traits::UserStore;
use shared::Role;

/// Temporary data directory plus a connection into it.
pub struct TestEnvironment {
    pub connection: Arc<JsonFileConnection>,
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to defer cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = Arc::new(JsonFileConnection::new(temp_dir.path())?);
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

/// Repository instances over a fresh test environment.
pub struct TestHelper {
    pub env: TestEnvironment,
    pub user_repo: UserRepository,
    pub schedule_repo: ScheduleRepository,
    pub invite_repo: InviteRepository,
    pub activity_repo: ActivityRepository,
    pub task_repo: TaskRepository,
}

impl TestHelper {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        let user_repo = UserRepository::new(env.connection.clone());
        let schedule_repo = ScheduleRepository::new(env.connection.clone());
        let invite_repo = InviteRepository::new(env.connection.clone());
        let activity_repo = ActivityRepository::new(env.connection.clone());
        let task_repo = TaskRepository::new(env.connection.clone());

        Ok(Self {
            env,
            user_repo,
            schedule_repo,
            invite_repo,
            activity_repo,
            task_repo,
        })
    }

    /// Store a caregiver linked to the given teacher and child ids.
    pub fn create_caregiver(&self, id: &str, teachers: &[&str], children: &[&str]) -> Result<User> {
        let mut user = User::new(id, "Test Caregiver", "caregiver@example.com", Role::Caregiver);
        user.teachers = teachers.iter().map(|t| t.to_string()).collect();
        user.children = children.iter().map(|c| c.to_string()).collect();
        self.user_repo.store_user(&user)?;
        Ok(user)
    }

    /// Store a teacher or child linked to a caregiver.
    pub fn create_linked_user(&self, id: &str, role: Role, caregiver_id: &str) -> Result<User> {
        let mut user = User::new(id, "Test User", "user@example.com", role);
        user.caregiver_id = Some(caregiver_id.to_string());
        self.user_repo.store_user(&user)?;
        Ok(user)
    }
}

/// Build a schedule with two steps and sensible defaults.
pub fn sample_schedule(id: &str, user_id: &str, creator_role: Role, is_published: bool) -> Schedule {
    let now = Utc::now();
    let mut steps = vec![
        Step {
            id: "step-1".to_string(),
            name: "Wake up".to_string(),
            icon: "☀️".to_string(),
            duration: "02:00".to_string(),
            step_number: 0,
            notes: String::new(),
            color_tag: "#FFD700".to_string(),
            voice_prompt: "Time to wake up!".to_string(),
            audio_note: None,
        },
        Step {
            id: "step-2".to_string(),
            name: "Brush teeth".to_string(),
            icon: "🦷".to_string(),
            duration: "03:00".to_string(),
            step_number: 0,
            notes: String::new(),
            color_tag: "#87CEEB".to_string(),
            voice_prompt: "Brush your teeth".to_string(),
            audio_note: None,
        },
    ];
    renumber_steps(&mut steps);

    Schedule {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: "Morning Routine".to_string(),
        steps,
        is_published,
        routine_type: "Morning Routine".to_string(),
        creator_role,
        caregiver_id: match creator_role {
            Role::Caregiver => Some(user_id.to_string()),
            _ => None,
        },
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;
        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());
            // Environment dropped here
        }
        assert!(!base_path.exists());
        Ok(())
    }

    #[test]
    fn test_sample_schedule_steps_are_contiguous() {
        let schedule = sample_schedule("s1", "u1", Role::Caregiver, false);
        let numbers: Vec<u32> = schedule.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }
}
