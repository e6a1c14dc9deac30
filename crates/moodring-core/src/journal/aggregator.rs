//! Read-only views across category logs.
//!
//! Everything here works on snapshots handed in by the caller and never
//! touches storage.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::mood::{Category, MoodEntry, MoodLevel};

/// Short weekday labels for chart axes, Monday first.
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Merge several category logs into one history, newest first.
///
/// Ties on `captured_at` keep input order: first by position of the log in
/// `logs`, then by position within that log.
pub fn merged_history<'a, I>(logs: I) -> Vec<MoodEntry>
where
    I: IntoIterator<Item = &'a [MoodEntry]>,
{
    let mut merged: Vec<MoodEntry> = logs.into_iter().flatten().cloned().collect();
    // `sort_by` is stable.
    merged.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    merged
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

/// Seven chart points for one category, Monday through Sunday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub category: Category,
    pub week_start: NaiveDate,
    /// Mood level per day, or the fill value where nothing was recorded.
    pub points: [u8; 7],
    /// Whether each point came from a real entry.
    pub recorded: [bool; 7],
}

impl WeeklySeries {
    /// Build the series for the week containing `today`.
    ///
    /// Days are matched on calendar date. If the log holds more than one
    /// entry for a date the first (newest) wins.
    pub fn compute(category: Category, log: &[MoodEntry], today: NaiveDate, fill: MoodLevel) -> Self {
        let monday = week_start(today);
        let mut points = [fill.value(); 7];
        let mut recorded = [false; 7];

        for (i, day) in week_days(monday).iter().enumerate() {
            if let Some(entry) = log.iter().find(|e| e.calendar_date == *day) {
                points[i] = entry.level.value();
                recorded[i] = true;
            }
        }

        Self {
            category,
            week_start: monday,
            points,
            recorded,
        }
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        week_days(self.week_start)
    }

    /// Mean over recorded days only; `None` when nothing was recorded.
    pub fn recorded_average(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .points
            .iter()
            .zip(self.recorded.iter())
            .filter(|(_, recorded)| **recorded)
            .map(|(point, _)| *point as f64)
            .collect();
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

fn week_days(monday: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| monday + Duration::days(i as i64))
}

/// Lifetime summary over one or more categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodStats {
    pub categories: Vec<Category>,
    pub total_entries: usize,
    pub average_level: Option<f64>,
    /// Entry count per level, index 0 is level 1.
    pub distribution: [usize; 6],
    pub latest: Option<MoodEntry>,
    /// Consecutive calendar days with at least one entry, ending today or
    /// yesterday.
    pub current_streak_days: u32,
}

impl MoodStats {
    pub fn compute(categories: &[Category], entries: &[MoodEntry], today: NaiveDate) -> Self {
        let mut distribution = [0usize; 6];
        for entry in entries {
            distribution[entry.level.picker_index()] += 1;
        }

        let total_entries = entries.len();
        let average_level = if total_entries == 0 {
            None
        } else {
            let sum: u64 = entries.iter().map(|e| e.level.value() as u64).sum();
            Some(sum as f64 / total_entries as f64)
        };

        let latest = entries.iter().max_by_key(|e| e.captured_at).cloned();

        Self {
            categories: categories.to_vec(),
            total_entries,
            average_level,
            distribution,
            latest,
            current_streak_days: current_streak(entries, today),
        }
    }

    /// Most frequent level; ties go to the higher level.
    pub fn most_common_level(&self) -> Option<MoodLevel> {
        if self.total_entries == 0 {
            return None;
        }
        let (index, _) = self
            .distribution
            .iter()
            .enumerate()
            .max_by_key(|(i, count)| (**count, *i))?;
        MoodLevel::new(index as i64 + 1).ok()
    }
}

fn current_streak(entries: &[MoodEntry], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = entries.iter().map(|e| e.calendar_date).collect();

    let mut day = if dates.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if dates.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };

    let mut streak = 0;
    while dates.contains(&day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}
