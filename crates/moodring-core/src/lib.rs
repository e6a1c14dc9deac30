//! # Moodring Core Library
//!
//! This library provides the mood and wellness journal engine behind the
//! Moodring app. UI layers (the CLI in this workspace, or a mobile shell)
//! are thin collaborators over the same core.
//!
//! ## Architecture
//!
//! - **Entry Store**: per-category mood logs over a generic key-value store,
//!   one entry per calendar day, bounded length
//! - **Aggregator**: merged history, Monday-start weekly series and lifetime
//!   stats across categories
//! - **Prompt Scheduler**: a polled state machine that opens the evening
//!   check-in once per calendar day
//! - **Capture Session**: the pending selection that commits at most one entry
//!
//! ## Key Components
//!
//! - [`MoodJournal`]: Facade the UI talks to
//! - [`EntryStore`]: Durable category logs
//! - [`PromptScheduler`]: Evening prompt state machine
//! - [`KeyValueStore`]: Trait for the local persistence collaborator

pub mod capture;
pub mod error;
pub mod events;
pub mod journal;
pub mod mood;
pub mod prompt;
pub mod storage;

pub use capture::{CaptureOrigin, CaptureSession};
pub use error::{ConfigError, CoreError, JournalError, StorageError, ValidationError};
pub use events::Event;
pub use journal::{EntryStore, MoodJournal, MoodStats, WeeklySeries};
pub use mood::{describe_level, Category, LevelInfo, MoodEntry, MoodLevel, ScoreBand};
pub use prompt::{PromptScheduler, PromptState, PromptWindow, SchedulerState};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
