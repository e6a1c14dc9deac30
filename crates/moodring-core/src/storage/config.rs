//! TOML-based application configuration.
//!
//! Stores engine tunables:
//! - Evening prompt window and polling interval
//! - Per-category history bounds
//! - Gap-fill value for weekly charts
//!
//! Configuration is stored at `~/.config/moodring/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;
use crate::mood::{Category, MoodLevel};

/// Prompt scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptConfig {
    /// First hour (inclusive, local time) the prompt may fire.
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// Hour (exclusive) after which the prompt no longer fires.
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Category the scheduled prompt records under.
    #[serde(default = "default_prompt_category")]
    pub category: Category,
    /// Keep the "already prompted today" marker in the store so it
    /// survives a restart.
    #[serde(default)]
    pub persist_marker: bool,
}

/// Journal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_daily_limit")]
    pub daily_limit: usize,
    /// Bound for meditation and workout logs.
    #[serde(default = "default_session_limit")]
    pub session_limit: usize,
    /// Value plotted for days without an entry.
    #[serde(default = "default_fill")]
    pub default_fill: u8,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/moodring/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub prompt: PromptConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

fn default_start_hour() -> u32 {
    21
}
fn default_end_hour() -> u32 {
    23
}
fn default_poll_interval_secs() -> u64 {
    60
}
fn default_prompt_category() -> Category {
    Category::Daily
}
fn default_daily_limit() -> usize {
    30
}
fn default_session_limit() -> usize {
    50
}
fn default_fill() -> u8 {
    MoodLevel::NEUTRAL.value()
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            poll_interval_secs: default_poll_interval_secs(),
            category: default_prompt_category(),
            persist_marker: false,
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            daily_limit: default_daily_limit(),
            session_limit: default_session_limit(),
            default_fill: default_fill(),
        }
    }
}

impl JournalConfig {
    /// Maximum retained entries for a category.
    pub fn limit_for(&self, category: Category) -> usize {
        match category {
            Category::Daily => self.daily_limit,
            Category::Meditation | Category::Workout => self.session_limit,
        }
    }

    pub fn fill_level(&self) -> MoodLevel {
        MoodLevel::new(self.default_fill as i64).unwrap_or(MoodLevel::NEUTRAL)
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let (parent_path, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };
        if leaf.is_empty() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let parent = match parent_path {
            Some(path) => {
                let mut current = &mut *root;
                for part in path.split('.') {
                    current = current
                        .get_mut(part)
                        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                }
                current
            }
            None => root,
        };

        let obj = parent
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value
                    .parse::<bool>()
                    .map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => {
                let n = value
                    .parse::<u64>()
                    .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                serde_json::Value::Number(n.into())
            }
            serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                return Err(invalid("cannot set a whole section".into()));
            }
            _ => serde_json::Value::String(value.into()),
        };

        obj.insert(leaf.to_string(), new_value);
        Ok(())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };

        if self.prompt.end_hour > 24 {
            return Err(invalid("prompt.end_hour", "must be at most 24"));
        }
        if self.prompt.start_hour >= self.prompt.end_hour {
            return Err(invalid("prompt.start_hour", "must be before prompt.end_hour"));
        }
        if self.prompt.poll_interval_secs == 0 {
            return Err(invalid("prompt.poll_interval_secs", "must be at least 1"));
        }
        if self.journal.daily_limit == 0 {
            return Err(invalid("journal.daily_limit", "must be at least 1"));
        }
        if self.journal.session_limit == 0 {
            return Err(invalid("journal.session_limit", "must be at least 1"));
        }
        if MoodLevel::new(self.journal.default_fill as i64).is_err() {
            return Err(invalid("journal.default_fill", "must be a mood level between 1 and 6"));
        }
        Ok(())
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path, creating it with defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result fails validation. On error `self` is unchanged.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// See [`Config::apply`]; also fails if the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.prompt.start_hour, 21);
        assert_eq!(cfg.prompt.end_hour, 23);
        assert_eq!(cfg.prompt.poll_interval_secs, 60);
        assert_eq!(cfg.prompt.category, Category::Daily);
        assert!(!cfg.prompt.persist_marker);
        assert_eq!(cfg.journal.limit_for(Category::Daily), 30);
        assert_eq!(cfg.journal.limit_for(Category::Workout), 50);
        assert_eq!(cfg.journal.fill_level(), MoodLevel::NEUTRAL);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[prompt]\nstart_hour = 20\n").unwrap();
        assert_eq!(parsed.prompt.start_hour, 20);
        assert_eq!(parsed.prompt.end_hour, 23);
        assert_eq!(parsed.journal.daily_limit, 30);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("prompt.start_hour").as_deref(), Some("21"));
        assert_eq!(cfg.get("prompt.category").as_deref(), Some("daily"));
        assert!(cfg.get("prompt.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn apply_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.apply("prompt.persist_marker", "true").unwrap();
        cfg.apply("journal.session_limit", "80").unwrap();
        cfg.apply("prompt.category", "meditation").unwrap();
        assert!(cfg.prompt.persist_marker);
        assert_eq!(cfg.journal.session_limit, 80);
        assert_eq!(cfg.prompt.category, Category::Meditation);
    }

    #[test]
    fn apply_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("prompt.nonexistent", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.apply("nope.x", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn apply_rejects_invalid_type_and_keeps_state() {
        let mut cfg = Config::default();
        assert!(cfg.apply("prompt.persist_marker", "not_a_bool").is_err());
        assert!(cfg.apply("prompt.category", "yoga").is_err());
        assert!(cfg.apply("prompt", "x").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn apply_rejects_inverted_window() {
        let mut cfg = Config::default();
        assert!(cfg.apply("prompt.start_hour", "23").is_err());
        assert!(cfg.apply("journal.default_fill", "0").is_err());
        assert!(cfg.apply("journal.daily_limit", "0").is_err());
        assert_eq!(cfg.prompt.start_hour, 21);
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prompt]\nstart_hour = 23\nend_hour = 21\n").unwrap();
        assert!(Config::load_from(&path).is_err());
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("prompt.end_hour", "24").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().prompt.end_hour, 24);
    }
}
