use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::connection::JsonFileConnection;
use crate::domain::models::invite::Invite;
use crate::storage::traits::InviteStore;

const COLLECTION: &str = "invites";

/// JSON-file invite repository, keyed by the code itself.
#[derive(Clone)]
pub struct InviteRepository {
    connection: Arc<JsonFileConnection>,
}

impl InviteRepository {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<Invite>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save(&self, records: &[Invite]) -> Result<()> {
        self.connection.save_collection(COLLECTION, records)
    }
}

impl InviteStore for InviteRepository {
    fn store_invite(&self, invite: &Invite) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        records.retain(|i| i.code != invite.code);
        records.push(invite.clone());
        self.save(&records)?;
        info!("Stored invite code {} for caregiver {}", invite.code, invite.caregiver_id);
        Ok(())
    }

    fn get_invite(&self, code: &str) -> Result<Option<Invite>> {
        let _guard = self.connection.lock();
        let records = self.load()?;
        Ok(records.into_iter().find(|i| i.code == code))
    }

    fn update_invite(&self, invite: &Invite) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|i| i.code != invite.code);
        if records.len() == before {
            warn!("Attempted to update a non-existent invite: {}", invite.code);
            return Err(anyhow::anyhow!("Invite not found for update: {}", invite.code));
        }
        records.push(invite.clone());
        self.save(&records)
    }
}
