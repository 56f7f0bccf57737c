use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::{keys, read_json_or_default, write_json, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub from: String,
    pub subject: String,
    pub content: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub property_id: Option<u64>,
}

impl Message {
    /// Content cut to `max` characters with an ellipsis
    pub fn preview(&self, max: usize) -> String {
        if self.content.chars().count() <= max {
            self.content.clone()
        } else {
            let cut: String = self.content.chars().take(max).collect();
            format!("{cut}...")
        }
    }
}

/// A user's received messages
pub struct Inbox {
    key: String,
}

impl Inbox {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            key: keys::messages(user_id),
        }
    }

    pub fn list<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<Message> {
        read_json_or_default(store, &self.key)
    }

    pub fn unread_count<S: KeyValueStore + ?Sized>(&self, store: &S) -> usize {
        self.list(store).iter().filter(|m| !m.read).count()
    }

    pub fn deliver<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        message: Message,
    ) -> Result<(), StoreError> {
        let mut messages = self.list(store);
        messages.push(message);
        write_json(store, &self.key, &messages)
    }

    /// Returns whether the message exists
    pub fn mark_read<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        id: i64,
    ) -> Result<bool, StoreError> {
        let mut messages = self.list(store);
        let Some(message) = messages.iter_mut().find(|m| m.id == id) else {
            return Ok(false);
        };
        message.read = true;
        write_json(store, &self.key, &messages)?;
        Ok(true)
    }

    /// Mark everything read; returns how many were unread
    pub fn mark_all_read<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
    ) -> Result<usize, StoreError> {
        let mut messages = self.list(store);
        let mut changed = 0;
        for message in messages.iter_mut().filter(|m| !m.read) {
            message.read = true;
            changed += 1;
        }
        if changed > 0 {
            write_json(store, &self.key, &messages)?;
        }
        Ok(changed)
    }

    pub fn delete<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        id: i64,
    ) -> Result<bool, StoreError> {
        let mut messages = self.list(store);
        let before = messages.len();
        messages.retain(|m| m.id != id);
        if messages.len() == before {
            return Ok(false);
        }
        write_json(store, &self.key, &messages)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn message(id: i64, read: bool) -> Message {
        Message {
            id,
            from: "Koffi Yao".to_string(),
            subject: "Visite".to_string(),
            content: "Bonjour, le logement est-il toujours disponible ?".to_string(),
            date: Utc::now(),
            read,
            property_id: Some(3),
        }
    }

    #[test]
    fn read_state_transitions() {
        let mut store = MemoryStore::default();
        let inbox = Inbox::for_user("u1");
        inbox.deliver(&mut store, message(1, false)).unwrap();
        inbox.deliver(&mut store, message(2, false)).unwrap();
        inbox.deliver(&mut store, message(3, true)).unwrap();
        assert_eq!(inbox.unread_count(&store), 2);

        assert!(inbox.mark_read(&mut store, 1).unwrap());
        assert!(!inbox.mark_read(&mut store, 42).unwrap());
        assert_eq!(inbox.unread_count(&store), 1);

        assert_eq!(inbox.mark_all_read(&mut store).unwrap(), 1);
        assert_eq!(inbox.mark_all_read(&mut store).unwrap(), 0);

        assert!(inbox.delete(&mut store, 2).unwrap());
        assert_eq!(inbox.list(&store).len(), 2);
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let m = message(1, false);
        assert_eq!(m.preview(7), "Bonjour...");
        assert_eq!(m.preview(500), m.content);
    }
}
