use serde::{Deserialize, Serialize};
use shared::Role;

/// Domain model for a principal record.
///
/// The role is fixed at registration. Linkage fields (`caregiver_id`,
/// `teachers`, `children`) are only mutated when an invitee registers with
/// an invite code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// The caregiver a teacher or child is linked to.
    #[serde(default)]
    pub caregiver_id: Option<String>,
    /// Teacher ids linked to this caregiver.
    #[serde(default)]
    pub teachers: Vec<String>,
    /// Child ids linked to this caregiver.
    #[serde(default)]
    pub children: Vec<String>,
}

impl User {
    pub fn new(id: &str, name: &str, email: &str, role: Role) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            caregiver_id: None,
            teachers: Vec::new(),
            children: Vec::new(),
        }
    }
}
