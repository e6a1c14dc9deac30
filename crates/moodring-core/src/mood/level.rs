//! Mood level scale and its fixed presentation tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ordinal mood rating, 1 (Angry) through 6 (Happy).
///
/// Construction validates the range, so a `MoodLevel` held anywhere in the
/// engine is always persistable. Zero is never a level; it only appears as
/// the "Unknown" row of [`describe_level`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;
    pub const NEUTRAL: MoodLevel = MoodLevel(4);

    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::InvalidLevel { value })
        }
    }

    /// Level for a zero-based position in the horizontal picker.
    ///
    /// Scroll offsets can overshoot either end, so the index is clamped
    /// rather than rejected.
    pub fn from_picker_index(index: i64) -> Self {
        let value = index.saturating_add(1).clamp(Self::MIN as i64, Self::MAX as i64);
        Self(value as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Zero-based picker position.
    pub fn picker_index(self) -> usize {
        (self.0 - Self::MIN) as usize
    }

    /// Picker label and colour.
    pub fn option(self) -> &'static MoodOption {
        &MOOD_OPTIONS[self.picker_index()]
    }

    /// Full range in ascending order.
    pub fn all() -> impl Iterator<Item = MoodLevel> {
        (Self::MIN..=Self::MAX).map(MoodLevel)
    }
}

impl Default for MoodLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl TryFrom<i64> for MoodLevel {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the mood picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodOption {
    pub value: u8,
    pub label: &'static str,
    pub color: &'static str,
}

pub const MOOD_OPTIONS: [MoodOption; 6] = [
    MoodOption { value: 1, label: "Angry", color: "#EF4444" },
    MoodOption { value: 2, label: "Sad", color: "#8B5CF6" },
    MoodOption { value: 3, label: "Stressed", color: "#F97316" },
    MoodOption { value: 4, label: "Neutral", color: "#A3A3A3" },
    MoodOption { value: 5, label: "Content", color: "#EAB308" },
    MoodOption { value: 6, label: "Happy", color: "#22C55E" },
];

/// History-row description of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    pub title: &'static str,
    pub guidance: &'static str,
    /// 0-100, drives the ring visualisation.
    pub score: u8,
}

impl LevelInfo {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}

const LEVEL_TABLE: [LevelInfo; 7] = [
    LevelInfo { title: "Unknown", guidance: "No data available", score: 0 },
    LevelInfo { title: "Angry", guidance: "Try 15m deep breathing session.", score: 25 },
    LevelInfo { title: "Sad", guidance: "Consider a 20m meditation.", score: 35 },
    LevelInfo { title: "Stressed", guidance: "Please do 25m Mindfulness.", score: 45 },
    LevelInfo { title: "Neutral", guidance: "Keep maintaining balance.", score: 65 },
    LevelInfo { title: "Content", guidance: "You've been consistent recently.", score: 80 },
    LevelInfo { title: "Very Happy", guidance: "Great job! Keep up the good work.", score: 95 },
];

/// Look up the title, guidance and wellness score for a raw level.
///
/// Anything outside 0..=6 resolves to the "Unknown" row.
pub fn describe_level(level: i64) -> LevelInfo {
    usize::try_from(level)
        .ok()
        .and_then(|i| LEVEL_TABLE.get(i))
        .copied()
        .unwrap_or(LEVEL_TABLE[0])
}

/// Colour band of the wellness ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::High
        } else if score >= 50 {
            ScoreBand::Medium
        } else {
            ScoreBand::Low
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ScoreBand::High => "#34D399",
            ScoreBand::Medium => "#FBBF24",
            ScoreBand::Low => "#F87171",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(MoodLevel::new(0).is_err());
        assert!(MoodLevel::new(7).is_err());
        assert!(MoodLevel::new(-3).is_err());
        assert_eq!(MoodLevel::new(6).unwrap().value(), 6);
    }

    #[test]
    fn deserialize_validates_range() {
        assert!(serde_json::from_str::<MoodLevel>("0").is_err());
        assert!(serde_json::from_str::<MoodLevel>("9").is_err());
        assert_eq!(serde_json::from_str::<MoodLevel>("3").unwrap().value(), 3);
        assert_eq!(serde_json::to_string(&MoodLevel::NEUTRAL).unwrap(), "4");
    }

    #[test]
    fn picker_index_clamps() {
        assert_eq!(MoodLevel::from_picker_index(-2).value(), 1);
        assert_eq!(MoodLevel::from_picker_index(2).value(), 3);
        assert_eq!(MoodLevel::from_picker_index(40).value(), 6);
    }

    #[test]
    fn option_matches_value() {
        for level in MoodLevel::all() {
            assert_eq!(level.option().value, level.value());
        }
        assert_eq!(MoodLevel::NEUTRAL.option().label, "Neutral");
    }

    #[test]
    fn describe_falls_back_to_unknown() {
        assert_eq!(describe_level(0), describe_level(7));
        assert_eq!(describe_level(-1).title, "Unknown");
        assert_eq!(describe_level(i64::MAX).score, 0);
    }

    #[test]
    fn describe_known_levels() {
        assert_eq!(describe_level(1).title, "Angry");
        assert_eq!(describe_level(4).score, 65);
        assert_eq!(describe_level(6).title, "Very Happy");
    }

    #[test]
    fn score_bands() {
        assert_eq!(describe_level(6).band(), ScoreBand::High);
        assert_eq!(describe_level(5).band(), ScoreBand::High);
        assert_eq!(describe_level(4).band(), ScoreBand::Medium);
        assert_eq!(describe_level(3).band(), ScoreBand::Low);
    }
}
