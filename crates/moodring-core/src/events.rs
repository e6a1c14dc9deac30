use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureOrigin;
use crate::mood::{Category, MoodLevel};

/// Every state change in the engine produces an Event.
/// The UI drains them from [`MoodJournal`](crate::MoodJournal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The scheduler entered `Prompting`.
    PromptOpened {
        category: Category,
        date: NaiveDate,
        at: NaiveDateTime,
    },
    /// The scheduler returned to `Idle`.
    PromptClosed {
        category: Category,
        committed: bool,
    },
    /// A capture session committed an entry.
    MoodRecorded {
        category: Category,
        level: MoodLevel,
        calendar_date: NaiveDate,
        captured_at: DateTime<FixedOffset>,
        origin: CaptureOrigin,
    },
    /// A capture session was discarded.
    CaptureCancelled {
        category: Category,
        origin: CaptureOrigin,
    },
    HistoryCleared {
        categories: Vec<Category>,
    },
}
