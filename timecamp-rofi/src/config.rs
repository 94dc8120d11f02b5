use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::{
    error::{CampError, Result},
    scheduler::PollIntervals,
};

const APP_DIR: &str = "timecamp";
const DEFAULT_PICKER: &str = "rofi -dmenu -i -p Task";
/// One week, in minutes.
const MAX_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Settings from `<state dir>/config.toml`, `<state dir>/.env` and the process environment.
///
/// Keys mirror the environment variable names, so `TIMECAMP_KEY` sets `timecamp_key`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub timecamp_key: String,
    /// Minutes between catalog refreshes.
    #[serde(default = "default_timeout_tasks")]
    pub timeout_tasks: u64,
    /// Minutes between entry refreshes.
    #[serde(default = "default_timeout_entries")]
    pub timeout_entries: u64,
    #[serde(default = "default_timecamp_url")]
    pub timecamp_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_picker")]
    pub picker: String,
    #[serde(default)]
    pub notify_icon: Option<PathBuf>,
}

fn default_timeout_tasks() -> u64 {
    10
}

fn default_timeout_entries() -> u64 {
    5
}

fn default_timecamp_url() -> String {
    timecamp::DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_picker() -> String {
    DEFAULT_PICKER.to_string()
}

impl Settings {
    pub fn intervals(&self) -> PollIntervals {
        PollIntervals {
            tasks: Duration::from_secs(self.timeout_tasks.saturating_mul(60)),
            entries: Duration::from_secs(self.timeout_entries.saturating_mul(60)),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(self) -> Result<Self> {
        if self.timecamp_key.trim().is_empty() {
            return Err(CampError::Configuration(
                "Set TIMECAMP_KEY in the environment, .env or config.toml".to_string(),
            ));
        }
        if self.timeout_tasks == 0 || self.timeout_entries == 0 {
            return Err(CampError::Configuration(
                "TIMEOUT_TASKS and TIMEOUT_ENTRIES must be at least one minute".to_string(),
            ));
        }
        if self.timeout_tasks > MAX_INTERVAL_MINUTES || self.timeout_entries > MAX_INTERVAL_MINUTES
        {
            return Err(CampError::Configuration(format!(
                "TIMEOUT_TASKS and TIMEOUT_ENTRIES must be at most {} minutes",
                MAX_INTERVAL_MINUTES
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CampError::Configuration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(self)
    }
}

/// `$TIMECAMP_DIR`, or `timecamp` under the user's config directory.
pub fn state_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TIMECAMP_DIR").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or_else(|| CampError::Configuration("Cannot determine config directory".to_string()))
}

/// Load and validate settings. A missing credential is an error.
pub fn read_config(dir: &Path) -> Result<Settings> {
    dotenvy::from_path(dir.join(".env")).ok();
    build_settings(dir, None)
}

/// `env` replaces the process environment when given.
fn build_settings(dir: &Path, env: Option<HashMap<String, String>>) -> Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::from(dir.join("config.toml")).required(false))
        .add_source(config::Environment::default().try_parsing(true).source(env))
        .build()
        .and_then(|c| c.try_deserialize::<Settings>())
        .map_err(|e| CampError::Configuration(e.to_string()))?;

    settings.validate()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_credential_is_fatal() {
        let dir = TempDir::new().unwrap();

        let result = build_settings(dir.path(), env(&[]));

        assert!(matches!(result, Err(CampError::Configuration(_))));
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let dir = TempDir::new().unwrap();

        let settings = build_settings(dir.path(), env(&[("TIMECAMP_KEY", "abc")])).unwrap();

        assert_eq!(settings.timecamp_key, "abc");
        assert_eq!(settings.intervals(), PollIntervals::default());
        assert_eq!(settings.timecamp_url, timecamp::DEFAULT_BASE_URL);
        assert_eq!(settings.picker, DEFAULT_PICKER);
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn environment_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "timecamp_key = \"from-file\"\ntimeout_tasks = 30\npicker = \"dmenu -i\"\n",
        )
        .unwrap();

        let settings = build_settings(
            dir.path(),
            env(&[("TIMEOUT_TASKS", "15"), ("TIMEOUT_ENTRIES", "2")]),
        )
        .unwrap();

        assert_eq!(settings.timecamp_key, "from-file");
        assert_eq!(settings.picker, "dmenu -i");
        assert_eq!(settings.intervals().tasks, Duration::from_secs(15 * 60));
        assert_eq!(settings.intervals().entries, Duration::from_secs(2 * 60));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let dir = TempDir::new().unwrap();

        let result = build_settings(
            dir.path(),
            env(&[("TIMECAMP_KEY", "abc"), ("TIMEOUT_ENTRIES", "0")]),
        );

        assert!(matches!(result, Err(CampError::Configuration(_))));
    }

    #[test]
    fn huge_interval_is_rejected() {
        let dir = TempDir::new().unwrap();

        let result = build_settings(
            dir.path(),
            env(&[("TIMECAMP_KEY", "abc"), ("TIMEOUT_TASKS", "20000")]),
        );

        assert!(matches!(result, Err(CampError::Configuration(_))));
    }
}
