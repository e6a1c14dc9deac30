use chrono::{Datelike, Local, NaiveDate, TimeZone};
use clap::Subcommand;
use moodring_core::journal::WEEKDAY_LABELS;
use moodring_core::{describe_level, Category, MoodEntry, MoodJournal, MoodLevel};
use serde_json::json;

use super::categories_or_all;

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record a mood level (1 = Angry ... 6 = Happy)
    Log {
        /// Mood level between 1 and 6
        level: i64,
        /// Category to record under
        #[arg(long, short, default_value = "daily")]
        category: Category,
        /// Backfill a past day (YYYY-MM-DD) at the current time of day
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show merged history, newest first
    History {
        /// Restrict to a category (repeatable)
        #[arg(long = "category", short)]
        categories: Vec<Category>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show this week's Monday-to-Sunday series
    Week {
        #[arg(long, short, default_value = "daily")]
        category: Category,
    },
    /// Lifetime statistics
    Stats {
        /// Restrict to a category (repeatable)
        #[arg(long = "category", short)]
        categories: Vec<Category>,
    },
    /// Describe a mood level
    Describe {
        level: i64,
    },
    /// Delete stored history
    Clear {
        /// Restrict to a category (repeatable)
        #[arg(long = "category", short)]
        categories: Vec<Category>,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut journal = MoodJournal::open_default()?;

    match action {
        MoodAction::Log {
            level,
            category,
            date,
        } => {
            let level = MoodLevel::new(level)?;
            let entry = match date {
                Some(date) => {
                    let naive = date.and_time(Local::now().time());
                    let at = Local
                        .from_local_datetime(&naive)
                        .earliest()
                        .ok_or_else(|| format!("{naive} does not exist in the local time zone"))?;
                    journal.commit_mood_at(category, level, at)?
                }
                None => journal.commit_mood(category, level)?,
            };
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        MoodAction::History { categories, json } => {
            let categories = categories_or_all(categories);
            let history = journal.history(&categories);
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No mood entries yet");
            } else {
                let current_year = Local::now().year();
                for entry in &history {
                    println!("{}", format_history_row(entry, current_year));
                }
            }
        }
        MoodAction::Week { category } => {
            let series = journal.weekly_series(category);
            let days: Vec<_> = series
                .days()
                .iter()
                .zip(WEEKDAY_LABELS)
                .zip(series.points.iter().zip(series.recorded.iter()))
                .map(|((date, label), (level, recorded))| {
                    json!({ "day": label, "date": date, "level": level, "recorded": recorded })
                })
                .collect();
            let out = json!({
                "category": category,
                "week_start": series.week_start,
                "points": series.points,
                "recorded_average": series.recorded_average(),
                "days": days,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        MoodAction::Stats { categories } => {
            let categories = categories_or_all(categories);
            let stats = journal.stats(&categories);
            let out = json!({
                "stats": stats,
                "most_common_level": stats.most_common_level(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        MoodAction::Describe { level } => {
            let info = describe_level(level);
            let out = json!({
                "title": info.title,
                "guidance": info.guidance,
                "score": info.score,
                "band": info.band(),
                "color": info.band().color(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        MoodAction::Clear { categories, yes } => {
            if !yes {
                return Err("refusing to delete history without --yes".into());
            }
            let categories = categories_or_all(categories);
            journal.clear_all(&categories)?;
            let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
            println!("cleared: {}", names.join(", "));
        }
    }
    Ok(())
}

/// `MAY 01 2023  After Workout     Content     80  You've been ...  07:15 AM`
fn format_history_row(entry: &MoodEntry, current_year: i32) -> String {
    let date = entry.calendar_date;
    let year = if date.year() != current_year {
        format!(" {}", date.year())
    } else {
        String::new()
    };
    let info = entry.info();
    format!(
        "{} {:02}{}  {:<16}  {:<10}  {:>3}  {}  {}",
        date.format("%b").to_string().to_uppercase(),
        date.day(),
        year,
        entry.category.label(),
        info.title,
        info.score,
        info.guidance,
        entry.captured_at_display(),
    )
}
