//! One mood-selection interaction.
//!
//! A session produces at most one entry: `commit` and `cancel` both
//! consume it.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::journal::EntryStore;
use crate::mood::{Category, MoodEntry, MoodLevel};
use crate::storage::KeyValueStore;

/// What opened a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureOrigin {
    /// Opened by the evening prompt scheduler.
    Prompt,
    /// Opened directly by the user, e.g. after a workout.
    Manual,
}

/// Pending mood selection for a single category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSession {
    category: Category,
    origin: CaptureOrigin,
    selected: MoodLevel,
}

impl CaptureSession {
    /// Open a session with the neutral level preselected.
    pub fn new(category: Category, origin: CaptureOrigin) -> Self {
        Self {
            category,
            origin,
            selected: MoodLevel::NEUTRAL,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn origin(&self) -> CaptureOrigin {
        self.origin
    }

    pub fn selected(&self) -> MoodLevel {
        self.selected
    }

    pub fn select_level(&mut self, level: MoodLevel) {
        self.selected = level;
    }

    /// Select by picker position; out-of-range positions clamp.
    pub fn select_picker_index(&mut self, index: i64) {
        self.selected = MoodLevel::from_picker_index(index);
    }

    /// Persist the selected level and end the session.
    ///
    /// # Errors
    ///
    /// Propagates `StorageUnavailable` from the store; the capture is lost.
    pub fn commit<S, Tz>(self, store: &EntryStore<S>, at: DateTime<Tz>) -> Result<MoodEntry, JournalError>
    where
        S: KeyValueStore,
        Tz: TimeZone,
    {
        store.append(self.category, self.selected, at)
    }

    /// Discard the session. Nothing was persisted, so there is nothing to undo.
    pub fn cancel(self) {}
}
