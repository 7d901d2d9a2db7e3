//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.wordtally.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::extractor::{BoundaryMarkers, DEFAULT_END_MARKER, DEFAULT_START_MARKER};
use crate::source::FetchOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".wordtally.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Document source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Region boundary markers.
    #[serde(default)]
    pub markers: MarkerConfig,

    /// Word store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
///
/// Log verbosity is a command-line concern only (`--verbose`, `--quiet`);
/// logging is set up before any config file is read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,
}

/// Document source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the document to analyze.
    #[serde(default = "default_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header for requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_url() -> String {
    "https://www.gutenberg.org/files/1065/1065-h/1065-h.htm".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    concat!("wordtally/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Patterns bounding the region that is scanned for words.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Regex marking the start of the region (line is skipped).
    #[serde(default = "default_start_marker")]
    pub start: String,

    /// Regex marking the end of the region (line is skipped).
    #[serde(default = "default_end_marker")]
    pub end: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            start: default_start_marker(),
            end: default_end_marker(),
        }
    }
}

fn default_start_marker() -> String {
    DEFAULT_START_MARKER.to_string()
}

fn default_end_marker() -> String {
    DEFAULT_END_MARKER.to_string()
}

/// Word store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite database holding the word table.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("word_occurrences.db")
}

/// Report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Show only the top N words.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref url) = args.url {
            self.source.url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
        }

        if let Some(ref start) = args.start_marker {
            self.markers.start = start.clone();
        }
        if let Some(ref end) = args.end_marker {
            self.markers.end = end.clone();
        }

        if let Some(ref store) = args.store {
            self.store.path = store.clone();
        }

        if let Some(format) = args.format {
            self.general.format = format;
        }
        if let Some(limit) = args.limit {
            self.report.limit = Some(limit);
        }
    }

    /// Compile the configured boundary markers.
    pub fn boundary_markers(&self) -> Result<BoundaryMarkers> {
        BoundaryMarkers::new(&self.markers.start, &self.markers.end).with_context(|| {
            format!(
                "Invalid boundary marker pattern (start {:?}, end {:?})",
                self.markers.start, self.markers.end
            )
        })
    }

    /// Fetch options for the configured source.
    pub fn fetch_options(&self, show_progress: bool) -> FetchOptions {
        FetchOptions {
            timeout_seconds: self.source.timeout_seconds,
            user_agent: self.source.user_agent.clone(),
            show_progress,
            ..FetchOptions::default()
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
