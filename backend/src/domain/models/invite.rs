use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short-lived one-time invite code issued by a caregiver.
///
/// Redeeming the code links the registrant to the issuing caregiver and
/// marks the code used; a used code cannot be redeemed again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invite {
    /// The code itself is the primary key.
    pub code: String,
    pub caregiver_id: String,
    pub created_at: DateTime<Utc>,
    pub used: bool,
}

impl Invite {
    pub fn new(caregiver_id: &str) -> Self {
        Self {
            code: Self::generate_code(),
            caregiver_id: caregiver_id.to_string(),
            created_at: Utc::now(),
            used: false,
        }
    }

    /// Generate a short code: the first segment of a v4 UUID.
    pub fn generate_code() -> String {
        Uuid::new_v4()
            .to_string()
            .split('-')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_is_short_and_unique() {
        let a = Invite::generate_code();
        let b = Invite::generate_code();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }
}
