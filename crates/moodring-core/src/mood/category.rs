//! Mood categories and their storage keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Activity context a mood rating was recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Evening check-in raised by the prompt scheduler.
    Daily,
    /// Rating taken after a meditation session.
    Meditation,
    /// Rating taken after a workout.
    Workout,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [Category::Daily, Category::Meditation, Category::Workout];

    /// Key under which this category's log lives in the key-value store.
    ///
    /// These match the keys already present on devices, so existing
    /// history is picked up without migration.
    pub fn storage_key(self) -> &'static str {
        match self {
            Category::Daily => "moodHistory",
            Category::Meditation => "meditationMoodData",
            Category::Workout => "workoutMoodData",
        }
    }

    /// Human label for history rows.
    pub fn label(self) -> &'static str {
        match self {
            Category::Daily => "Daily Check-in",
            Category::Meditation => "After Meditation",
            Category::Workout => "After Workout",
        }
    }

    /// Chart/legend colour.
    pub fn color(self) -> &'static str {
        match self {
            Category::Daily => "#66C4FF",
            Category::Meditation => "#F59E0B",
            Category::Workout => "#059669",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Meditation => "meditation",
            Category::Workout => "workout",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Category::Daily),
            "meditation" => Ok(Category::Meditation),
            "workout" => Ok(Category::Workout),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            Category::ALL.iter().map(|c| c.storage_key()).collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Meditation".parse::<Category>().unwrap(), Category::Meditation);
        assert_eq!(" workout ".parse::<Category>().unwrap(), Category::Workout);
        assert!("yoga".parse::<Category>().is_err());
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Daily).unwrap(), "\"daily\"");
    }
}
