//! Mood data model: categories, the 1-6 level scale and recorded entries.

mod category;
mod entry;
mod level;

pub use category::Category;
pub use entry::MoodEntry;
pub(crate) use entry::StoredEntry;
pub use level::{describe_level, LevelInfo, MoodLevel, MoodOption, ScoreBand, MOOD_OPTIONS};
