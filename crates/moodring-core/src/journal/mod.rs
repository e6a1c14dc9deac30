//! Mood journal: entry storage, aggregation and the UI-facing facade.
//!
//! ## Flow
//!
//! ```text
//! PromptScheduler::check -> CaptureSession -> EntryStore::append
//!                                                    |
//!                      history / weekly_series / stats (read on demand)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut journal = MoodJournal::open_default()?;
//! // In a loop, every `poll_interval()`:
//! if let Some(mut session) = journal.poll_prompt_now() {
//!     session.select_level(level);
//!     journal.commit_capture(session)?;
//! }
//! ```

pub mod aggregator;
mod entry_store;

pub use aggregator::{merged_history, week_start, MoodStats, WeeklySeries, WEEKDAY_LABELS};
pub use entry_store::EntryStore;

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use tracing::{info, warn};

use crate::capture::{CaptureOrigin, CaptureSession};
use crate::error::{CoreError, JournalError};
use crate::events::Event;
use crate::mood::{Category, MoodEntry, MoodLevel};
use crate::prompt::{PromptScheduler, PromptState};
use crate::storage::{Config, KeyValueStore, SqliteStore};

/// Store key for the persisted prompt marker.
pub const PROMPT_MARKER_KEY: &str = "moodPromptLastShown";

/// Single entry point for UI collaborators.
///
/// Owns the entry store and the prompt scheduler. Reads never fail: a
/// storage problem is logged and shows up as "no data".
pub struct MoodJournal<S: KeyValueStore> {
    entries: EntryStore<S>,
    scheduler: PromptScheduler,
    config: Config,
    events: Vec<Event>,
}

impl MoodJournal<SqliteStore> {
    /// Open with the on-disk store and config.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open_default() -> Result<Self, CoreError> {
        let config = Config::load_or_default();
        let store = SqliteStore::open()?;
        Ok(Self::new(store, config))
    }
}

impl<S: KeyValueStore> MoodJournal<S> {
    pub fn new(store: S, config: Config) -> Self {
        let entries = EntryStore::new(store, config.journal.clone());
        let mut scheduler = PromptScheduler::from_config(&config.prompt);
        if config.prompt.persist_marker {
            let restored = load_marker(entries.kv());
            scheduler = PromptScheduler::with_state(scheduler.window(), scheduler.category(), restored);
        }
        Self {
            entries,
            scheduler,
            config,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn entries(&self) -> &EntryStore<S> {
        &self.entries
    }

    pub fn scheduler(&self) -> &PromptScheduler {
        &self.scheduler
    }

    /// How often the host should call [`poll_prompt`](Self::poll_prompt).
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.prompt.poll_interval_secs)
    }

    /// Take all events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Prompt ───────────────────────────────────────────────────────

    /// Whether a prompt for `category` would open at `now`.
    pub fn prompt_should_fire(&self, category: Category, now: NaiveDateTime) -> bool {
        category == self.scheduler.category() && self.scheduler.is_due(now)
    }

    /// Periodic scheduler check at local wall-clock time `now`.
    ///
    /// Returns a capture session when the prompt opens.
    pub fn poll_prompt(&mut self, now: NaiveDateTime) -> Option<CaptureSession> {
        self.events.extend(self.scheduler.expire_stale(now));
        let event = self.scheduler.check(now)?;
        self.events.push(event);
        if self.config.prompt.persist_marker {
            save_marker(self.entries.kv(), self.scheduler.prompt_state());
        }
        Some(CaptureSession::new(self.scheduler.category(), CaptureOrigin::Prompt))
    }

    pub fn poll_prompt_now(&mut self) -> Option<CaptureSession> {
        self.poll_prompt(Local::now().naive_local())
    }

    // ── Capture ──────────────────────────────────────────────────────

    /// Open a user-initiated capture session.
    pub fn begin_capture(&self, category: Category) -> CaptureSession {
        CaptureSession::new(category, CaptureOrigin::Manual)
    }

    /// Commit a session at time `at`.
    ///
    /// A prompt-originated session closes the prompt whether or not the
    /// write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the entry could not be persisted.
    pub fn commit_capture_at<Tz: TimeZone>(
        &mut self,
        session: CaptureSession,
        at: DateTime<Tz>,
    ) -> Result<MoodEntry, JournalError> {
        let origin = session.origin();
        let category = session.category();
        let result = session.commit(&self.entries, at);

        match &result {
            Ok(entry) => {
                info!(category = %category, level = entry.level.value(), "mood recorded");
                self.events.push(Event::MoodRecorded {
                    category,
                    level: entry.level,
                    calendar_date: entry.calendar_date,
                    captured_at: entry.captured_at,
                    origin,
                });
            }
            Err(e) => warn!(category = %category, error = %e, "mood capture lost"),
        }

        if origin == CaptureOrigin::Prompt {
            let closed = if result.is_ok() {
                self.scheduler.complete()
            } else {
                self.scheduler.dismiss()
            };
            self.events.extend(closed);
        }
        result
    }

    pub fn commit_capture(&mut self, session: CaptureSession) -> Result<MoodEntry, JournalError> {
        self.commit_capture_at(session, Local::now())
    }

    /// Discard a session without persisting anything.
    pub fn dismiss_capture(&mut self, session: CaptureSession) {
        let origin = session.origin();
        let category = session.category();
        session.cancel();
        self.events.push(Event::CaptureCancelled { category, origin });
        if origin == CaptureOrigin::Prompt {
            self.events.extend(self.scheduler.dismiss());
        }
    }

    /// Record `level` for `category` now, as the capture UI's save action.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the entry could not be persisted.
    pub fn commit_mood(&mut self, category: Category, level: MoodLevel) -> Result<MoodEntry, JournalError> {
        self.commit_mood_at(category, level, Local::now())
    }

    pub fn commit_mood_at<Tz: TimeZone>(
        &mut self,
        category: Category,
        level: MoodLevel,
        at: DateTime<Tz>,
    ) -> Result<MoodEntry, JournalError> {
        let mut session = self.begin_capture(category);
        session.select_level(level);
        self.commit_capture_at(session, at)
    }

    // ── Views ────────────────────────────────────────────────────────

    /// Current log for one category, newest first.
    pub fn log(&self, category: Category) -> Vec<MoodEntry> {
        self.entries.read_or_empty(category)
    }

    /// Entries from `categories` merged newest first.
    pub fn history(&self, categories: &[Category]) -> Vec<MoodEntry> {
        let logs: Vec<Vec<MoodEntry>> = categories.iter().map(|c| self.log(*c)).collect();
        merged_history(logs.iter().map(Vec::as_slice))
    }

    /// Monday-to-Sunday series for the week containing `today`.
    pub fn weekly_series_for(&self, category: Category, today: NaiveDate) -> WeeklySeries {
        WeeklySeries::compute(
            category,
            &self.log(category),
            today,
            self.config.journal.fill_level(),
        )
    }

    pub fn weekly_series(&self, category: Category) -> WeeklySeries {
        self.weekly_series_for(category, Local::now().date_naive())
    }

    pub fn stats_for(&self, categories: &[Category], today: NaiveDate) -> MoodStats {
        MoodStats::compute(categories, &self.history(categories), today)
    }

    pub fn stats(&self, categories: &[Category]) -> MoodStats {
        self.stats_for(categories, Local::now().date_naive())
    }

    // ── Destructive ──────────────────────────────────────────────────

    /// Remove all stored entries for `categories`.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the store rejects the removal.
    pub fn clear_all(&mut self, categories: &[Category]) -> Result<(), JournalError> {
        self.entries.clear(categories)?;
        info!(categories = ?categories, "mood history cleared");
        self.events.push(Event::HistoryCleared {
            categories: categories.to_vec(),
        });
        Ok(())
    }
}

fn load_marker<S: KeyValueStore>(store: &S) -> PromptState {
    match store.get(PROMPT_MARKER_KEY) {
        Ok(Some(raw)) => match raw.parse::<NaiveDate>() {
            Ok(date) => PromptState { last_shown: Some(date) },
            Err(e) => {
                warn!(error = %e, "ignoring malformed prompt marker");
                PromptState::default()
            }
        },
        Ok(None) => PromptState::default(),
        Err(e) => {
            warn!(error = %e, "prompt marker unavailable");
            PromptState::default()
        }
    }
}

fn save_marker<S: KeyValueStore>(store: &S, state: PromptState) {
    if let Some(date) = state.last_shown {
        if let Err(e) = store.set(PROMPT_MARKER_KEY, &date.to_string()) {
            warn!(error = %e, "failed to persist prompt marker");
        }
    }
}
