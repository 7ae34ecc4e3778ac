use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::connection::JsonFileConnection;
use crate::domain::models::user::User;
use crate::storage::traits::UserStore;

const COLLECTION: &str = "users";

/// JSON-file user repository.
#[derive(Clone)]
pub struct UserRepository {
    connection: Arc<JsonFileConnection>,
}

impl UserRepository {
    pub fn new(connection: Arc<JsonFileConnection>) -> Self {
        Self { connection }
    }

    fn load(&self) -> Result<Vec<User>> {
        self.connection.load_collection(COLLECTION)
    }

    fn save(&self, records: &[User]) -> Result<()> {
        self.connection.save_collection(COLLECTION, records)
    }
}

impl UserStore for UserRepository {
    fn store_user(&self, user: &User) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        records.retain(|u| u.id != user.id);
        records.push(user.clone());
        self.save(&records)?;
        info!("Stored user {} ({})", user.name, user.id);
        Ok(())
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let _guard = self.connection.lock();
        let records = self.load()?;
        Ok(records.into_iter().find(|u| u.id == user_id))
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let _guard = self.connection.lock();
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|u| u.id != user.id);
        if records.len() == before {
            warn!("Attempted to update a non-existent user: {}", user.id);
            return Err(anyhow::anyhow!("User not found for update: {}", user.id));
        }
        records.push(user.clone());
        self.save(&records)
    }
}
