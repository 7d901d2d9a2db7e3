//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// wordtally - cumulative word frequencies for HTML-wrapped texts
///
/// Fetches a document, counts the words between its title heading and
/// its end-of-chapter marker, adds them to a persistent tally, and
/// prints every word recorded so far, most frequent first.
///
/// Examples:
///   wordtally
///   wordtally --url https://www.gutenberg.org/files/1065/1065-h/1065-h.htm
///   wordtally --file ./raven.htm --store ./tally.db --limit 20
///   wordtally --format markdown --output report.md
///   wordtally --file ./raven.htm --dry-run
///   wordtally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// URL of the document to analyze
    ///
    /// Defaults to the [source] url in .wordtally.toml, or The Raven on
    /// Project Gutenberg.
    #[arg(short, long, value_name = "URL", env = "WORDTALLY_URL")]
    pub url: Option<String>,

    /// Read the document from a local file instead of fetching it
    ///
    /// Takes precedence over --url.
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Path of the word store (SQLite database)
    #[arg(short, long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .wordtally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Show only the N most frequent words
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Regex marking the start of the scanned region
    #[arg(long, value_name = "REGEX")]
    pub start_marker: Option<String>,

    /// Regex marking the end of the scanned region
    #[arg(long, value_name = "REGEX")]
    pub end_marker: Option<String>,

    /// Extract words and print counts without touching the store
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .wordtally.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Numbered listing, one word per line (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Document URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref path) = self.file {
            if !path.exists() {
                return Err(format!("Document file does not exist: {}", path.display()));
            }
            if !path.is_file() {
                return Err(format!("Document path is not a file: {}", path.display()));
            }
        }

        if self.limit == Some(0) {
            return Err("Limit must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
