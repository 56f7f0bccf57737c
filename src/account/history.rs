use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreError;
use crate::query::criteria::FilterCriteria;
use crate::query::sort::SortKey;
use crate::query::url_state;
use crate::store::{keys, read_json_or_default, write_json, KeyValueStore};

/// One completed search, kept for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    /// Milliseconds since the epoch; doubles as the record id
    pub timestamp: i64,
    #[serde(default)]
    pub query: Option<String>,
    pub filters: FilterCriteria,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default)]
    pub results_count: usize,
}

impl SearchRecord {
    pub fn new(
        at: DateTime<Utc>,
        filters: FilterCriteria,
        sort: SortKey,
        results_count: usize,
    ) -> Self {
        let query = (!filters.location.is_empty()).then(|| filters.location.clone());
        Self {
            timestamp: at.timestamp_millis(),
            query,
            filters,
            sort,
            results_count,
        }
    }

    /// Label shown in the history list
    pub fn label(&self) -> &str {
        self.query.as_deref().unwrap_or("General search")
    }

    /// URL query that repeats this search
    pub fn to_query_string(&self) -> String {
        url_state::serialize(&self.filters, self.sort)
    }
}

/// A user's search history, stored in the order searches were made
pub struct SearchHistory {
    key: String,
}

impl SearchHistory {
    pub fn for_user(user_id: &str) -> Self {
        Self {
            key: keys::search_history(user_id),
        }
    }

    /// Saved searches, most recent first
    pub fn list<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<SearchRecord> {
        let mut records = self.stored(store);
        records.reverse();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    pub fn latest<S: KeyValueStore + ?Sized>(&self, store: &S) -> Option<SearchRecord> {
        self.stored(store).pop()
    }

    fn stored<S: KeyValueStore + ?Sized>(&self, store: &S) -> Vec<SearchRecord> {
        read_json_or_default(store, &self.key)
    }

    pub fn record<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        record: SearchRecord,
    ) -> Result<(), StoreError> {
        let mut records = self.stored(store);
        debug!(timestamp = record.timestamp, results = record.results_count, "search recorded");
        records.push(record);
        write_json(store, &self.key, &records)
    }

    /// Remove the record with `timestamp`; returns whether one was found
    pub fn delete<S: KeyValueStore + ?Sized>(
        &self,
        store: &mut S,
        timestamp: i64,
    ) -> Result<bool, StoreError> {
        let mut records = self.stored(store);
        let before = records.len();
        records.retain(|r| r.timestamp != timestamp);
        if records.len() == before {
            return Ok(false);
        }
        write_json(store, &self.key, &records)?;
        Ok(true)
    }

    pub fn clear<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<usize, StoreError> {
        let count = self.stored(store).len();
        if count > 0 {
            write_json(store, &self.key, &Vec::<SearchRecord>::new())?;
        }
        Ok(count)
    }

    /// Query string for repeating a stored search
    pub fn repeat<S: KeyValueStore + ?Sized>(&self, store: &S, timestamp: i64) -> Option<String> {
        self.stored(store)
            .into_iter()
            .find(|r| r.timestamp == timestamp)
            .map(|r| r.to_query_string())
    }
}
