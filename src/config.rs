//! Configuration file support.
//!
//! All settings have defaults matching the standard training layout; an
//! optional JSON file in the platform config directory can override them.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_DATASET_PATH, DEFAULT_MIN_WINDOW_WIDTH,
    DEFAULT_PADDING_BOTTOM, DEFAULT_PADDING_TOP, DEFAULT_SEGMENT_DIR,
};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Errors reading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Window layout section of the config.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Band above the image for the status line
    pub padding_top: f32,
    /// Band below the image for the label line
    pub padding_bottom: f32,
    /// Minimum window width
    pub min_window_width: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_top: DEFAULT_PADDING_TOP,
            padding_bottom: DEFAULT_PADDING_BOTTOM,
            min_window_width: DEFAULT_MIN_WINDOW_WIDTH,
        }
    }
}

impl From<LayoutConfig> for seglabel_ui::WindowLayout {
    fn from(layout: LayoutConfig) -> Self {
        Self {
            padding_top: layout.padding_top,
            padding_bottom: layout.padding_bottom,
            min_width: layout.min_window_width,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Dataset CSV file
    pub dataset_path: PathBuf,
    /// Directory that segment paths are resolved against
    pub segment_dir: PathBuf,
    /// Log verbosity level
    pub log_level: LogLevel,
    /// Window layout
    pub layout: LayoutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            segment_dir: PathBuf::from(DEFAULT_SEGMENT_DIR),
            log_level: LogLevel::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Standard location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Parse configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Read the config at `path`. A missing file yields `Ok(None)`.
    pub fn read(path: &Path) -> Result<Option<Self>, ConfigError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_json(&json)
            .map(Some)
            .map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Load from the standard location, falling back to defaults.
    ///
    /// Runs before logging is set up, so problems are returned as messages
    /// for the caller to report once it is.
    pub fn load_or_default() -> (Self, Option<String>) {
        let Some(path) = Self::default_path() else {
            return (Self::default(), None);
        };
        match Self::read(&path) {
            Ok(Some(config)) => (config, Some(format!("Loaded config from {}", path.display()))),
            Ok(None) => (Self::default(), None),
            Err(e) => (Self::default(), Some(format!("{}; using defaults", e))),
        }
    }
}
