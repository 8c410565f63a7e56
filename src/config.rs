//! Application configuration
//!
//! The near-identical app variants differ only in copy and thresholds
//! (night hours, fallback phrases, provider models, notify endpoint), so
//! all of that lives here instead of in constants. Loaded from
//! `~/.vera/config.yaml`; every field has a default, a missing file yields
//! the stock behavior.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Retry policy for transient provider overload
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each failed attempt
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    800
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

/// Fallback phrases substituted when the provider returns empty text
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Fallbacks {
    #[serde(default = "default_word_fallback")]
    pub word: String,
    #[serde(default = "default_letter_fallback")]
    pub letter: String,
    #[serde(default = "default_journal_fallback")]
    pub journal: String,
    #[serde(default = "default_daily_fallback")]
    pub daily: String,
}

fn default_word_fallback() -> String {
    String::from("Тишина...")
}

fn default_letter_fallback() -> String {
    String::from("Письмо в пути...")
}

fn default_journal_fallback() -> String {
    String::from("Я рядом.")
}

fn default_daily_fallback() -> String {
    String::from("Сегодня твой день.")
}

impl Default for Fallbacks {
    fn default() -> Self {
        Fallbacks {
            word: default_word_fallback(),
            letter: default_letter_fallback(),
            journal: default_journal_fallback(),
            daily: default_daily_fallback(),
        }
    }
}

/// One-shot new-user notification to a Telegram chat; disabled unless both
/// fields are set
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub bot_token: Option<String>,
    #[serde(default)]
    pub admin_chat_id: Option<String>,
}

impl NotifyConfig {
    pub fn is_enabled(&self) -> bool {
        self.bot_token.is_some() && self.admin_chat_id.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key; the `GEMINI_API_KEY` env var takes precedence
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub fallbacks: Fallbacks,
    /// Night mode starts at this hour (inclusive)
    #[serde(default = "default_night_start")]
    pub night_start_hour: u32,
    /// Night mode ends at this hour (exclusive)
    #[serde(default = "default_night_end")]
    pub night_end_hour: u32,
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Display name used in the new-user notification
    #[serde(default)]
    pub user_name: String,
}

fn default_text_model() -> String {
    String::from("gemini-3-flash-preview")
}

fn default_image_model() -> String {
    String::from("gemini-2.5-flash-image")
}

fn default_api_base() -> String {
    String::from("https://generativelanguage.googleapis.com/v1beta")
}

fn default_night_start() -> u32 {
    22
}

fn default_night_end() -> u32 {
    6
}

impl Default for AppConfig {
    fn default() -> Self {
        // serde_yaml on an empty mapping would do the same, spelled out here
        // so `AppConfig::default()` works without a parse step
        AppConfig {
            api_key: String::new(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            api_base: default_api_base(),
            retry: RetryConfig::default(),
            fallbacks: Fallbacks::default(),
            night_start_hour: default_night_start(),
            night_end_hour: default_night_end(),
            notify: NotifyConfig::default(),
            user_name: String::new(),
        }
    }
}

impl AppConfig {
    /// Load from `<config_dir>/config.yaml`, falling back to defaults when
    /// the file is absent or unparseable. The API key env var wins over the
    /// file in either case.
    pub fn load(config_dir: &Path) -> AppConfig {
        let path = config_dir.join("config.yaml");
        let mut config = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_yaml::from_str::<AppConfig>(&content).ok())
            .unwrap_or_default();

        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                config.api_key = key;
            }
        }
        config
    }

    /// Default config directory (`~/.vera`)
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vera")
    }

    /// True when `hour` falls inside the configured night window
    pub fn is_night_hour(&self, hour: u32) -> bool {
        hour >= self.night_start_hour || hour < self.night_end_hour
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path());
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.fallbacks.daily, "Сегодня твой день.");
        assert_eq!(config.night_start_hour, 22);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.yaml"),
            "night_start_hour: 21\nretry:\n  max_attempts: 5\n",
        )
        .unwrap();
        let config = AppConfig::load(dir.path());
        assert_eq!(config.night_start_hour, 21);
        assert_eq!(config.retry.max_attempts, 5);
        // untouched fields keep their defaults
        assert_eq!(config.retry.initial_delay_ms, 800);
        assert_eq!(config.text_model, "gemini-3-flash-preview");
    }

    #[test]
    fn test_night_window_wraps_midnight() {
        let config = AppConfig::default();
        assert!(config.is_night_hour(23));
        assert!(config.is_night_hour(2));
        assert!(!config.is_night_hour(12));
        assert!(!config.is_night_hour(6));
    }

    #[test]
    fn test_notify_requires_both_fields() {
        let mut notify = NotifyConfig::default();
        assert!(!notify.is_enabled());
        notify.bot_token = Some("token".into());
        assert!(!notify.is_enabled());
        notify.admin_chat_id = Some("42".into());
        assert!(notify.is_enabled());
    }
}
