//! Recorded mood entries and their stored form.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{describe_level, Category, LevelInfo, MoodLevel};

/// A single recorded mood rating.
///
/// `calendar_date` is the local date at capture time and is the uniqueness
/// key within a category. `captured_at` keeps the original offset so the
/// time of day can be shown as the user saw it. Entries read back from
/// storage keep the display time they were written with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub category: Category,
    pub level: MoodLevel,
    pub calendar_date: NaiveDate,
    pub captured_at: DateTime<FixedOffset>,
    captured_at_display: String,
}

impl MoodEntry {
    pub fn new<Tz: TimeZone>(category: Category, level: MoodLevel, at: DateTime<Tz>) -> Self {
        let offset = at.offset().fix();
        let captured_at = at.with_timezone(&offset);
        Self {
            category,
            level,
            calendar_date: captured_at.date_naive(),
            captured_at_display: display_time(&captured_at),
            captured_at,
        }
    }

    /// Time of day in 12-hour form, e.g. `09:05 PM`.
    pub fn captured_at_display(&self) -> &str {
        &self.captured_at_display
    }

    pub fn info(&self) -> LevelInfo {
        describe_level(self.level.value() as i64)
    }
}

/// On-disk shape of an entry inside a category log.
///
/// Older installs wrote `{mood, date, time, timestamp, type}`; those names
/// are accepted on read. The category is implied by the storage key, so any
/// `type` field is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoredEntry {
    #[serde(alias = "mood")]
    pub mood_level: MoodLevel,
    #[serde(alias = "date")]
    pub calendar_date: NaiveDate,
    #[serde(alias = "time", default)]
    pub captured_at_display: String,
    #[serde(alias = "timestamp", default)]
    pub captured_at: Option<DateTime<FixedOffset>>,
}

impl StoredEntry {
    pub fn into_entry(self, category: Category) -> MoodEntry {
        let captured_at = self.captured_at.unwrap_or_else(|| {
            self.calendar_date
                .and_time(NaiveTime::MIN)
                .and_utc()
                .with_timezone(&Utc.fix())
        });
        let captured_at_display = if self.captured_at_display.is_empty() {
            display_time(&captured_at)
        } else {
            self.captured_at_display
        };
        MoodEntry {
            category,
            level: self.mood_level,
            calendar_date: self.calendar_date,
            captured_at,
            captured_at_display,
        }
    }
}

fn display_time(at: &DateTime<FixedOffset>) -> String {
    at.format("%I:%M %p").to_string()
}

impl From<&MoodEntry> for StoredEntry {
    fn from(entry: &MoodEntry) -> Self {
        Self {
            mood_level: entry.level,
            calendar_date: entry.calendar_date,
            captured_at_display: entry.captured_at_display.clone(),
            captured_at: Some(entry.captured_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(hours: i32) -> FixedOffset {
        FixedOffset::east_opt(hours * 3600).unwrap()
    }

    #[test]
    fn calendar_date_uses_local_offset() {
        // 23:30 at UTC-5 is already the next day in UTC.
        let at = offset(-5).with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap();
        let entry = MoodEntry::new(Category::Daily, MoodLevel::NEUTRAL, at);
        assert_eq!(entry.calendar_date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(entry.captured_at_display(), "11:30 PM");
    }

    #[test]
    fn stored_entry_uses_wire_field_names() {
        let at = offset(0).with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let entry = MoodEntry::new(Category::Daily, MoodLevel::new(3).unwrap(), at);
        let json = serde_json::to_value(StoredEntry::from(&entry)).unwrap();
        assert_eq!(json["moodLevel"], 3);
        assert_eq!(json["calendarDate"], "2024-05-01");
        assert_eq!(json["capturedAtDisplay"], "10:00 AM");
        assert!(json["capturedAt"].as_str().unwrap().starts_with("2024-05-01T10:00:00"));
    }

    #[test]
    fn reads_legacy_field_names() {
        let legacy = r#"{"mood":5,"date":"2024-04-30","time":"09:12 PM","timestamp":"2024-04-30T21:12:00.000Z","type":"meditation"}"#;
        let stored: StoredEntry = serde_json::from_str(legacy).unwrap();
        let entry = stored.into_entry(Category::Meditation);
        assert_eq!(entry.level.value(), 5);
        assert_eq!(entry.calendar_date, NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
        assert_eq!(entry.captured_at_display(), "09:12 PM");
    }

    #[test]
    fn stored_display_time_is_written_back_unchanged() {
        // Older installs stored UTC timestamps next to a local display time.
        let legacy = r#"{"mood":4,"date":"2024-05-01","time":"09:10 PM","timestamp":"2024-05-02T01:10:00.000Z"}"#;
        let entry = serde_json::from_str::<StoredEntry>(legacy)
            .unwrap()
            .into_entry(Category::Daily);
        assert_eq!(entry.captured_at_display(), "09:10 PM");

        let json = serde_json::to_value(StoredEntry::from(&entry)).unwrap();
        assert_eq!(json["capturedAtDisplay"], "09:10 PM");
    }

    #[test]
    fn missing_timestamp_falls_back_to_midnight() {
        let stored: StoredEntry =
            serde_json::from_str(r#"{"mood":2,"date":"2024-04-30"}"#).unwrap();
        let entry = stored.into_entry(Category::Daily);
        assert_eq!(entry.captured_at.date_naive(), entry.calendar_date);
        assert_eq!(entry.captured_at.format("%H:%M").to_string(), "00:00");
    }
}
