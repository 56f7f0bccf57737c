use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{keys, read_json, write_json, KeyValueStore};

/// Dashboard preferences; stored values override these defaults field by field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub email_notifications: bool,
    pub dark_mode: bool,
    pub save_searches: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            dark_mode: false,
            save_searches: true,
        }
    }
}

/// Individually toggleable preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    EmailNotifications,
    DarkMode,
    SaveSearches,
}

impl UserSettings {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, user_id: &str) -> Self {
        read_json(store, &keys::settings(user_id)).unwrap_or_default()
    }

    pub fn save<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        user_id: &str,
    ) -> Result<(), StoreError> {
        write_json(store, &keys::settings(user_id), self)
    }

    /// Flip one preference and persist; returns its new value
    pub fn toggle<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        user_id: &str,
        setting: Setting,
    ) -> Result<bool, StoreError> {
        let flag = match setting {
            Setting::EmailNotifications => &mut self.email_notifications,
            Setting::DarkMode => &mut self.dark_mode,
            Setting::SaveSearches => &mut self.save_searches,
        };
        *flag = !*flag;
        let value = *flag;
        self.save(store, user_id)?;
        Ok(value)
    }
}
