//! Basic CLI E2E tests.
//!
//! Each test runs the binary against its own temporary home directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_moodring-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("MOODRING_ENV")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_mood_log_and_history() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["mood", "log", "5", "--category", "meditation"]);
    assert_eq!(code, 0, "mood log failed");
    let entry: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(entry["level"], 5);
    assert_eq!(entry["category"], "meditation");

    let (code, stdout, _) = run_cli(home.path(), &["mood", "history", "--json"]);
    assert_eq!(code, 0, "mood history failed");
    let history: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history.len(), 1);
}

#[test]
fn test_mood_log_rejects_invalid_level() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["mood", "log", "7"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Invalid mood level"));
}

#[test]
fn test_same_day_backfill_replaces() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["mood", "log", "2", "--date", "2024-05-01"]);
    run_cli(home.path(), &["mood", "log", "6", "--date", "2024-05-01"]);
    let (_, stdout, _) = run_cli(home.path(), &["mood", "history", "--json", "-c", "daily"]);
    let history: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["level"], 6);
}

#[test]
fn test_mood_week_has_seven_points() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["mood", "week", "--category", "workout"]);
    assert_eq!(code, 0, "mood week failed");
    let week: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(week["points"], serde_json::json!([4, 4, 4, 4, 4, 4, 4]));
    assert_eq!(week["days"][0]["day"], "Mon");
}

#[test]
fn test_mood_describe_out_of_range() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["mood", "describe", "9"]);
    assert_eq!(code, 0);
    let info: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(info["title"], "Unknown");
}

#[test]
fn test_clear_requires_confirmation() {
    let home = tempfile::tempdir().unwrap();
    run_cli(home.path(), &["mood", "log", "3"]);
    let (code, _, _) = run_cli(home.path(), &["mood", "clear"]);
    assert_ne!(code, 0);
    let (code, _, _) = run_cli(home.path(), &["mood", "clear", "--yes"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["mood", "history"]);
    assert!(stdout.contains("No mood entries yet"));
}

#[test]
fn test_prompt_check_reports_window() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["prompt", "check"]);
    assert_eq!(code, 0, "prompt check failed");
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["window"]["start_hour"], 21);
    assert_eq!(status["state"], "idle");
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "prompt.start_hour"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "21");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "prompt.start_hour", "20"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "prompt.start_hour"]);
    assert_eq!(stdout.trim(), "20");

    let (code, _, _) = run_cli(home.path(), &["config", "set", "prompt.bogus", "1"]);
    assert_ne!(code, 0);
}
