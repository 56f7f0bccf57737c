//! Persistent string key-value storage standing in for a backend.
//!
//! Values are JSON documents. Readers are forgiving: a missing or corrupt
//! value reads as the type's default.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Key names, scoped per user or per listing
pub mod keys {
    pub const CURRENT_USER: &str = "currentUser";

    pub fn favorites(user_id: &str) -> String {
        format!("favorites_{user_id}")
    }

    pub fn messages(user_id: &str) -> String {
        format!("messages_{user_id}")
    }

    pub fn search_history(user_id: &str) -> String {
        format!("searchHistory_{user_id}")
    }

    pub fn settings(user_id: &str) -> String {
        format!("settings_{user_id}")
    }

    pub fn owner_listings(user_id: &str) -> String {
        format!("properties_{user_id}")
    }

    pub fn reviews(listing_id: u64) -> String {
        format!("reviews_{listing_id}")
    }
}

/// Decode the JSON stored at `key`
pub fn read_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring corrupt store value");
            None
        }
    }
}

/// Decode the JSON stored at `key`, or the default if absent or corrupt
pub fn read_json_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    read_json(store, key).unwrap_or_default()
}

pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_helpers_round_trip_and_forgive_corruption() {
        let mut store = MemoryStore::default();
        write_json(&mut store, "ids", &vec![3u64, 1, 2]).unwrap();
        let ids: Vec<u64> = read_json_or_default(&store, "ids");
        assert_eq!(ids, vec![3, 1, 2]);

        store.set("ids", "[1, oops".to_string()).unwrap();
        let ids: Vec<u64> = read_json_or_default(&store, "ids");
        assert!(ids.is_empty());

        let missing: Option<Vec<u64>> = read_json(&store, "nothing");
        assert!(missing.is_none());
    }

    #[test]
    fn key_names() {
        assert_eq!(keys::favorites("42"), "favorites_42");
        assert_eq!(keys::search_history("42"), "searchHistory_42");
        assert_eq!(keys::reviews(7), "reviews_7");
    }
}
