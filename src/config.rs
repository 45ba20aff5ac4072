//! Runtime configuration
//!
//! Defaults, then environment (a `.env` file is loaded at startup), then
//! command-line flags.

use crate::summarizer::acknowledgment::ACK_WINDOW;
use crate::summarizer::error::ConfigError;
use crate::summarizer::selection::{SelectionPolicy, DEFAULT_MAX_FILES};
use crate::summarizer::session::{SessionOptions, StalePolicy};
use crate::summarizer::types::SummaryLength;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000/api/summarize";

pub const ENV_ENDPOINT: &str = "SUMMARIZER_ENDPOINT";
pub const ENV_MAX_FILES: &str = "SUMMARIZER_MAX_FILES";
pub const ENV_SELECTION_POLICY: &str = "SUMMARIZER_SELECTION_POLICY";
pub const ENV_LENGTH: &str = "SUMMARIZER_LENGTH";
pub const ENV_OUTPUT_DIR: &str = "SUMMARIZER_OUTPUT_DIR";
pub const ENV_STALE_RESPONSES: &str = "SUMMARIZER_STALE_RESPONSES";

/// Command-line flags
#[derive(Debug, Default, Parser)]
#[command(name = "paper-summarizer", about = "Summarize documents with a remote summarization service")]
pub struct CliArgs {
    /// Documents to select at startup
    pub files: Vec<PathBuf>,

    /// Summarization endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Maximum number of files per selection
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Summary length: short, medium or long
    #[arg(long)]
    pub length: Option<SummaryLength>,

    /// Directory downloads are written to
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Keep only the last chosen file instead of enforcing a cap
    #[arg(long)]
    pub legacy_picker: bool,

    /// Show responses even if the selection changed while they were running
    #[arg(long)]
    pub apply_stale: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub max_files: usize,
    pub legacy_picker: bool,
    pub default_length: SummaryLength,
    pub output_dir: PathBuf,
    pub ack_window: Duration,
    pub stale_policy: StalePolicy,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_files: DEFAULT_MAX_FILES,
            legacy_picker: false,
            default_length: SummaryLength::Medium,
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            ack_window: ACK_WINDOW,
            stale_policy: StalePolicy::Discard,
        }
    }
}

/// Parse an env value, keeping `None` (and logging) when it is malformed
fn parse_var<T: FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "[Config] Ignoring invalid value");
            None
        }
    }
}

impl SummarizerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from defaults plus whatever `lookup` returns per variable
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENV_ENDPOINT).filter(|s| !s.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(max_files) = parse_var::<usize>(ENV_MAX_FILES, lookup(ENV_MAX_FILES)) {
            config.max_files = max_files;
        }
        if let Some(policy) = lookup(ENV_SELECTION_POLICY) {
            match policy.trim().to_lowercase().as_str() {
                "capped" => config.legacy_picker = false,
                "single" => config.legacy_picker = true,
                other => tracing::warn!(
                    key = ENV_SELECTION_POLICY,
                    value = other,
                    "[Config] Ignoring invalid value"
                ),
            }
        }
        if let Some(length) = parse_var::<SummaryLength>(ENV_LENGTH, lookup(ENV_LENGTH)) {
            config.default_length = length;
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|s| !s.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir.trim());
        }
        if let Some(stale) = lookup(ENV_STALE_RESPONSES) {
            match stale.trim().to_lowercase().as_str() {
                "discard" => config.stale_policy = StalePolicy::Discard,
                "apply" => config.stale_policy = StalePolicy::Apply,
                other => tracing::warn!(
                    key = ENV_STALE_RESPONSES,
                    value = other,
                    "[Config] Ignoring invalid value"
                ),
            }
        }

        config
    }

    /// Flags win over environment
    pub fn with_cli(mut self, cli: &CliArgs) -> Self {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(max_files) = cli.max_files {
            self.max_files = max_files;
        }
        if let Some(length) = cli.length {
            self.default_length = length;
        }
        if let Some(dir) = &cli.output_dir {
            self.output_dir = dir.clone();
        }
        if cli.legacy_picker {
            self.legacy_picker = true;
        }
        if cli.apply_stale {
            self.stale_policy = StalePolicy::Apply;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_files == 0 {
            return Err(ConfigError::ZeroMaxFiles);
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        if self.legacy_picker {
            SelectionPolicy::SingleFile
        } else {
            SelectionPolicy::Capped {
                max_files: self.max_files,
            }
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            selection_policy: self.selection_policy(),
            summary_length: self.default_length,
            stale_policy: self.stale_policy,
            ack_window: self.ack_window,
            output_dir: self.output_dir.clone(),
        }
    }
}
