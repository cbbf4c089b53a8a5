//! User-level settings for steward
//!
//! Supports loading settings from:
//! - Environment variables
//! - ~/.config/steward/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Settings {
    /// Config root holding the YAML documents
    pub root: Option<PathBuf>,

    /// Default output format (text, json, markdown)
    pub format: Option<String>,

    /// Default trend window in days
    pub trend_window: Option<i64>,
}

impl Settings {
    /// Load settings from all sources, with priority:
    /// 1. Environment variables (highest)
    /// 2. User settings (~/.config/steward/config.toml)
    pub fn load() -> Result<Self> {
        let mut settings = Settings::default();

        if let Some(user_settings) = Self::user_settings_path()
            .filter(|p| p.exists())
            .and_then(|p| std::fs::read_to_string(&p).ok())
            .and_then(|content| toml::from_str::<Settings>(&content).ok())
        {
            settings.merge(user_settings);
        }

        // Environment variables override everything
        if let Ok(root) = std::env::var("STEWARD_ROOT") {
            if !root.is_empty() {
                settings.root = Some(PathBuf::from(root));
            }
        }

        Ok(settings)
    }

    /// Get the user settings file path
    pub fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("steward").join("config.toml"))
    }

    /// Merge another settings value into this one (other takes priority)
    fn merge(&mut self, other: Settings) {
        if other.root.is_some() {
            self.root = other.root;
        }
        if other.format.is_some() {
            self.format = other.format;
        }
        if other.trend_window.is_some() {
            self.trend_window = other.trend_window;
        }
    }

    /// Config root with the working-directory fallback applied
    pub fn root_or_default(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn trend_window_or_default(&self) -> i64 {
        self.trend_window.unwrap_or(90)
    }
}
