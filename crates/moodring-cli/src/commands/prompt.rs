use std::io::BufRead;

use chrono::Local;
use clap::Subcommand;
use moodring_core::{CaptureSession, MoodJournal, MoodLevel, SqliteStore};
use serde_json::json;
use tracing::{debug, warn};

#[derive(Subcommand)]
pub enum PromptAction {
    /// Report whether the check-in prompt is due right now
    Check,
    /// Poll for the evening prompt and ask for a mood on stdin
    Watch,
}

pub fn run(action: PromptAction) -> Result<(), Box<dyn std::error::Error>> {
    let journal = MoodJournal::open_default()?;

    match action {
        PromptAction::Check => {
            let now = Local::now().naive_local();
            let scheduler = journal.scheduler();
            let out = json!({
                "due": journal.prompt_should_fire(scheduler.category(), now),
                "category": scheduler.category(),
                "state": scheduler.state(),
                "window": scheduler.window(),
                "last_shown": scheduler.prompt_state().last_shown,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        PromptAction::Watch => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(watch(journal))?;
        }
    }
    Ok(())
}

async fn watch(mut journal: MoodJournal<SqliteStore>) -> Result<(), Box<dyn std::error::Error>> {
    let mut interval = tokio::time::interval(journal.poll_interval());
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    eprintln!(
        "watching for the check-in prompt every {}s (Ctrl-C to stop)",
        journal.poll_interval().as_secs()
    );

    loop {
        interval.tick().await;
        if let Some(session) = journal.poll_prompt_now() {
            debug!(category = %session.category(), "prompt opened, waiting for input");
            let answer = tokio::task::spawn_blocking(ask_level).await??;
            handle_answer(&mut journal, session, answer);
        }
        for event in journal.drain_events() {
            println!("{}", serde_json::to_string(&event)?);
        }
    }
}

fn handle_answer(journal: &mut MoodJournal<SqliteStore>, mut session: CaptureSession, answer: Option<MoodLevel>) {
    match answer {
        Some(level) => {
            session.select_level(level);
            if let Err(e) = journal.commit_capture(session) {
                warn!(error = %e, "could not save mood");
            }
        }
        None => journal.dismiss_capture(session),
    }
}

/// Read a level from stdin. Blank or unparsable input dismisses.
fn ask_level() -> std::io::Result<Option<MoodLevel>> {
    eprintln!("How are you feeling? 1 Angry, 2 Sad, 3 Stressed, 4 Neutral, 5 Content, 6 Happy (blank to skip)");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<i64>().map(MoodLevel::new) {
        Ok(Ok(level)) => Ok(Some(level)),
        _ => {
            eprintln!("'{trimmed}' is not a mood level, skipping");
            Ok(None)
        }
    }
}
