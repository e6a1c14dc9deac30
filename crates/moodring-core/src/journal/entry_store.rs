//! Durable per-category mood logs over a [`KeyValueStore`].
//!
//! Each category's log is a JSON array stored under its own key, newest
//! first. Every write replaces the whole array.

use std::sync::Mutex;

use chrono::{DateTime, TimeZone};
use tracing::{debug, warn};

use crate::error::JournalError;
use crate::mood::{Category, MoodEntry, MoodLevel, StoredEntry};
use crate::storage::{JournalConfig, KeyValueStore};

/// Per-category append/replace/read/clear of mood entries.
///
/// `append` is a read-modify-write, so it holds a per-category lock for the
/// whole cycle. Reads take no lock.
pub struct EntryStore<S> {
    store: S,
    config: JournalConfig,
    locks: [Mutex<()>; 3],
}

impl<S: KeyValueStore> EntryStore<S> {
    pub fn new(store: S, config: JournalConfig) -> Self {
        Self {
            store,
            config,
            locks: Default::default(),
        }
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    /// The underlying key-value collaborator.
    pub fn kv(&self) -> &S {
        &self.store
    }

    /// Record `level` for `category` at `at`.
    ///
    /// Any entry already stored for the same calendar date is dropped, the
    /// new entry goes to the head, and the log is cut to its bound.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the current log cannot be read or the
    /// updated log cannot be written. Nothing is persisted in that case.
    pub fn append<Tz: TimeZone>(
        &self,
        category: Category,
        level: MoodLevel,
        at: DateTime<Tz>,
    ) -> Result<MoodEntry, JournalError> {
        let entry = MoodEntry::new(category, level, at);
        let _guard = self.locks[lock_index(category)]
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut log = self.read_all(category)?;
        log.retain(|existing| existing.calendar_date != entry.calendar_date);
        log.insert(0, entry.clone());
        log.truncate(self.config.limit_for(category));

        self.write_log(category, &log)?;
        debug!(
            category = %category,
            level = level.value(),
            date = %entry.calendar_date,
            len = log.len(),
            "appended mood entry"
        );
        Ok(entry)
    }

    /// Current log for `category`, newest first.
    ///
    /// Malformed stored data is logged and dropped rather than returned as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the collaborator cannot be read.
    pub fn read_all(&self, category: Category) -> Result<Vec<MoodEntry>, JournalError> {
        let key = category.storage_key();
        match self.store.get(key)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(match decode_log(key, &raw, category) {
                Ok(log) => log,
                Err(e) => {
                    warn!(error = %e, "treating unreadable mood log as empty");
                    Vec::new()
                }
            }),
        }
    }

    /// Like [`read_all`](Self::read_all), but a storage failure is logged
    /// and yields an empty log.
    pub fn read_or_empty(&self, category: Category) -> Vec<MoodEntry> {
        self.read_all(category).unwrap_or_else(|e| {
            warn!(category = %category, error = %e, "mood log unavailable, showing no data");
            Vec::new()
        })
    }

    /// Remove the persisted logs for `categories`.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the collaborator rejects the removal.
    pub fn clear(&self, categories: &[Category]) -> Result<(), JournalError> {
        let mut keys: Vec<&str> = categories.iter().map(|c| c.storage_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        self.store.remove_many(&keys)?;
        Ok(())
    }

    fn write_log(&self, category: Category, log: &[MoodEntry]) -> Result<(), JournalError> {
        let key = category.storage_key();
        let stored: Vec<StoredEntry> = log.iter().map(StoredEntry::from).collect();
        let json = serde_json::to_string(&stored).map_err(|source| JournalError::EncodeFailed {
            key: key.to_string(),
            source,
        })?;
        self.store.set(key, &json)?;
        Ok(())
    }
}

fn lock_index(category: Category) -> usize {
    match category {
        Category::Daily => 0,
        Category::Meditation => 1,
        Category::Workout => 2,
    }
}

/// Decode a stored log, skipping elements that don't parse.
///
/// A value that isn't a JSON array at all is a `MalformedRecord`.
fn decode_log(key: &str, raw: &str, category: Category) -> Result<Vec<MoodEntry>, JournalError> {
    let malformed = |message: String| JournalError::MalformedRecord {
        key: key.to_string(),
        message,
    };

    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Null => return Ok(Vec::new()),
        other => return Err(malformed(format!("expected an array, found {other}"))),
    };

    let total = items.len();
    let log: Vec<MoodEntry> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<StoredEntry>(item).ok())
        .map(|stored| stored.into_entry(category))
        .collect();

    if log.len() < total {
        warn!(
            key,
            skipped = total - log.len(),
            kept = log.len(),
            "skipped malformed mood records"
        );
    }
    Ok(log)
}
