//! Timeline configuration, loaded from RON.
//!
//! ```ron
//! (
//!     options: (editable: true, show_week_scale: false),
//!     group_property: "Team",
//!     unassigned_label: "No team",
//! )
//! ```
//!
//! Every field is optional. The default location is
//! `~/.config/koyomi/timeline.ron`; a missing or broken file falls back to
//! defaults with a log line rather than failing the view.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::groups::DEFAULT_UNASSIGNED_LABEL;
use crate::projection::DEFAULT_GROUP_PROPERTY;
use crate::widget::TimelineOptions;

/// Errors from loading a config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// View-level settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub options: TimelineOptions,
    /// Schema property name used for grouping.
    pub group_property: String,
    /// Label of the unassigned lane.
    pub unassigned_label: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            options: TimelineOptions::default(),
            group_property: DEFAULT_GROUP_PROPERTY.to_string(),
            unassigned_label: DEFAULT_UNASSIGNED_LABEL.to_string(),
        }
    }
}

/// Default config file path (`~/.config/koyomi/timeline.ron`).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("koyomi").join("timeline.ron"))
}

/// Load config from the default location, falling back to defaults.
pub fn load_config() -> TimelineConfig {
    let Some(path) = config_file_path() else {
        info!("No config directory available, using default timeline config");
        return TimelineConfig::default();
    };
    load_config_or_default(&path)
}

/// Load config from `path`. A missing or unreadable file yields defaults.
pub fn load_config_or_default(path: &Path) -> TimelineConfig {
    if !path.exists() {
        info!("Timeline config not found at {:?}, using defaults", path);
        return TimelineConfig::default();
    }

    match load_config_from(path) {
        Ok(config) => {
            info!("Loaded timeline config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load timeline config from {:?}: {}", path, e);
            warn!("Falling back to default timeline config");
            TimelineConfig::default()
        }
    }
}

/// Load and parse a specific config file.
pub fn load_config_from(path: &Path) -> Result<TimelineConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

/// Parse config text.
pub fn parse_config(text: &str) -> Result<TimelineConfig, ConfigError> {
    Ok(ron::from_str(text)?)
}
