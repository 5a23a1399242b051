//! Engine configuration
//!
//! Only presentation is configurable. Rule thresholds come from the tags
//! themselves and the meal-break gap is fixed.
//!
//! ```toml
//! time_format = "twelve_hour"
//! include_reminders = true
//! diagnostics = false
//! ```

use crate::time::{TimeOfDay, TimeStyle};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How times are rendered inside violation messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// Reuse the notation of the time text the value came from
    #[default]
    Auto,
    TwelveHour,
    TwentyFourHour,
}

impl TimeFormat {
    pub fn render(&self, time: TimeOfDay) -> String {
        match self {
            TimeFormat::Auto => time.to_string(),
            TimeFormat::TwelveHour => time.format(TimeStyle::Meridiem),
            TimeFormat::TwentyFourHour => time.format(TimeStyle::TwentyFourHour),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub time_format: TimeFormat,
    /// Emit manual reminders alongside violations
    pub include_reminders: bool,
    /// Report rules and days skipped because of bad data
    pub diagnostics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_format: TimeFormat::Auto,
            include_reminders: true,
            diagnostics: true,
        }
    }
}

impl EngineConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse engine config TOML")
    }
}
