use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::StoreError;
use crate::models::initials;
use crate::store::{keys, read_json, write_json, KeyValueStore};

/// The signed-in user, as kept under `currentUser`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_account_type")]
    pub account_type: String,
    #[serde(default)]
    pub avatar: String,
    pub join_date: DateTime<Utc>,
}

fn default_account_type() -> String {
    "user".to_string()
}

impl UserProfile {
    pub fn current<S: KeyValueStore + ?Sized>(store: &S) -> Option<Self> {
        read_json(store, keys::CURRENT_USER)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        write_json(store, keys::CURRENT_USER, self)
    }

    /// Change name and phone; the avatar follows the new name
    pub fn update<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
        phone: &str,
    ) -> Result<(), StoreError> {
        self.name = name.trim().to_string();
        self.phone = phone.trim().to_string();
        self.avatar = initials(&self.name);
        self.save(store)
    }

    pub fn days_active(&self, now: DateTime<Utc>) -> i64 {
        (now - self.join_date).num_days().max(0)
    }

    pub fn logout<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
        store.remove(keys::CURRENT_USER)
    }

    /// Forget the user and every per-user key
    pub fn delete_account<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        for key in [
            keys::favorites(&self.id),
            keys::messages(&self.id),
            keys::search_history(&self.id),
            keys::settings(&self.id),
            keys::owner_listings(&self.id),
        ] {
            store.remove(&key)?;
        }
        store.remove(keys::CURRENT_USER)?;
        info!(user = %self.id, "account deleted");
        Ok(())
    }
}
