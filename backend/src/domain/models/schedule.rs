use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::Role;
use uuid::Uuid;

/// Domain model for one routine: a named, ordered sequence of steps.
///
/// `user_id` is the mutation-ownership baseline; sharing is governed by
/// `caregiver_id` and `creator_role` (see the permission rules).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub steps: Vec<Step>,
    pub is_published: bool,
    pub routine_type: String,
    pub creator_role: Role,
    #[serde(default)]
    pub caregiver_id: Option<String>,
    /// A stored record missing its timestamps is normalized to "now" at
    /// read time so ordering by `updated_at` stays total.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Generate a unique id for a schedule.
    pub fn generate_id() -> String {
        format!("schedule::{}", Uuid::new_v4())
    }
}

/// One activity within a schedule's step list (embedded, not a top-level
/// record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub name: String,
    pub icon: String,
    /// Duration as "mm:ss".
    pub duration: String,
    /// 1-based ordinal; contiguous 1..N matching array order.
    pub step_number: u32,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub color_tag: String,
    #[serde(default)]
    pub voice_prompt: String,
    #[serde(default)]
    pub audio_note: Option<String>,
}

/// Renumber steps to a contiguous 1..N sequence matching array order.
pub fn renumber_steps(steps: &mut [Step]) {
    for (index, step) in steps.iter_mut().enumerate() {
        step.step_number = index as u32 + 1;
    }
}

/// Remove a step by id and renumber the remainder. Returns whether a step
/// was removed.
pub fn remove_step(steps: &mut Vec<Step>, step_id: &str) -> bool {
    let before = steps.len();
    steps.retain(|step| step.id != step_id);
    let removed = steps.len() != before;
    if removed {
        renumber_steps(steps);
    }
    removed
}

/// Parse a "mm:ss" duration string into seconds.
pub fn parse_duration(duration: &str) -> Option<u32> {
    let (minutes, seconds) = duration.split_once(':')?;
    let minutes: u32 = minutes.parse().ok()?;
    let seconds: u32 = seconds.parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some(minutes * 60 + seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(id: &str, number: u32) -> Step {
        Step {
            id: id.to_string(),
            name: format!("Step {}", id),
            icon: "⭐".to_string(),
            duration: "02:00".to_string(),
            step_number: number,
            notes: String::new(),
            color_tag: String::new(),
            voice_prompt: String::new(),
            audio_note: None,
        }
    }

    #[test]
    fn test_remove_step_renumbers_contiguously() {
        let mut steps = vec![step("a", 1), step("b", 2), step("c", 3), step("d", 4)];

        assert!(remove_step(&mut steps, "b"));

        assert_eq!(steps.len(), 3);
        let numbers: Vec<u32> = steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_remove_step_missing_id_is_noop() {
        let mut steps = vec![step("a", 1), step("b", 2)];
        assert!(!remove_step(&mut steps, "zzz"));
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].step_number, 2);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("02:00"), Some(120));
        assert_eq!(parse_duration("0:05"), Some(5));
        assert_eq!(parse_duration("10:30"), Some(630));

        assert_eq!(parse_duration("2 minutes"), None);
        assert_eq!(parse_duration("02:60"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("02"), None);
    }

    #[test]
    fn test_missing_timestamps_normalize_to_now() {
        let json = r#"{
            "id": "schedule::x",
            "user_id": "u1",
            "name": "Morning Routine",
            "steps": [],
            "is_published": false,
            "routine_type": "Morning Routine",
            "creator_role": "caregiver"
        }"#;
        let before = Utc::now();
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert!(schedule.created_at >= before);
        assert!(schedule.updated_at >= before);
    }
}
