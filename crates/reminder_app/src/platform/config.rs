//! User settings, read from `~/.quran_reminder_config.json`.
//!
//! Every field has a default and unknown fields are ignored, so a partial or
//! older file still loads. Out-of-range numbers are clamped where they are read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use reminder_engine::{AyahSettings, FetchSettings, DEFAULT_AYAH_API, MAX_BATCH_SIZE};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = ".quran_reminder_config.json";
const DATA_DIR_NAME: &str = "quran_reminder";

/// Which text paragraphs of a reminder the console prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Both,
    /// First paragraph only.
    Arabic,
    /// Last paragraph only.
    Persian,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub interval_minutes: u64,
    pub max_length: usize,
    pub auto_start: bool,
    pub language: String,
    pub notification_duration: u64,
    pub theme: String,
    pub timeout_seconds: u64,
    pub endpoint: Option<String>,
    pub editions: Vec<String>,
    pub batch_size: usize,
    pub shuffle: bool,
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            max_length: 250,
            auto_start: true,
            language: "both".to_string(),
            notification_duration: 25,
            theme: "light".to_string(),
            timeout_seconds: 10,
            endpoint: None,
            editions: vec!["quran-simple".to_string(), "fa.ansarian".to_string()],
            batch_size: 20,
            shuffle: true,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads `path`. A missing file yields the defaults; an unreadable or
    /// malformed one is an error the caller may downgrade to the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILENAME)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.clamp(1, 1440) * 60)
    }

    pub fn max_length(&self) -> usize {
        self.max_length.clamp(100, 500)
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_duration.clamp(5, 60))
    }

    /// Unrecognized values fall back to [`Language::Both`].
    pub fn language(&self) -> Language {
        match self.language.trim().to_ascii_lowercase().as_str() {
            "arabic" => Language::Arabic,
            "persian" => Language::Persian,
            _ => Language::Both,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DATA_DIR_NAME),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout_seconds.max(1)),
            ..FetchSettings::default()
        }
    }

    pub fn ayah_settings(&self) -> AyahSettings {
        let editions = if self.editions.is_empty() {
            AyahSettings::default().editions
        } else {
            self.editions.clone()
        };
        AyahSettings {
            base_url: DEFAULT_AYAH_API.to_string(),
            editions,
            batch_size: self.batch_size.clamp(1, MAX_BATCH_SIZE),
            max_length: self.max_length(),
            ..AyahSettings::default()
        }
    }

    /// Configured corpus endpoint, ignoring a blank value.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}
