use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and overriding configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language tag (or "auto")
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language tag
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation endpoint settings
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Dispatch settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Output artifact settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation endpoint configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EndpointConfig {
    // @field: Host suffix, requests go to translate.<host>
    #[serde(default = "default_host")]
    pub host: String,

    // @field: Attempts per request while rate-limited (0 = default)
    #[serde(default = "default_tries")]
    pub tries: u32,

    // @field: Pause between rate-limited attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    // @field: Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Attach the tk signature parameter
    #[serde(default)]
    pub sign_requests: bool,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            tries: default_tries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
            sign_requests: false,
        }
    }
}

impl EndpointConfig {
    /// Delay between rate-limited attempts
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Dispatch configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DispatchConfig {
    /// Maximum number of in-flight translation requests in batch mode
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Requests per available CPU in interactive mode
    #[serde(default = "default_interactive_multiplier")]
    pub interactive_multiplier: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            concurrent_requests: default_concurrent_requests(),
            interactive_multiplier: default_interactive_multiplier(),
        }
    }
}

impl DispatchConfig {
    /// Concurrency for the interactive surface, derived from host parallelism
    pub fn interactive_concurrency(&self) -> usize {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        (cpus * self.interactive_multiplier.max(1)).max(1)
    }
}

/// Output artifact configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// 1-based CSV column written to the aligned text file
    #[serde(default = "default_text_column")]
    pub text_column: usize,

    /// Translate each sentence separately into extra columns
    #[serde(default = "default_true")]
    pub retranslate_sentences: bool,

    /// Add a per-word vocabulary column set
    #[serde(default)]
    pub vocabulary: bool,

    /// Keep the endpoint's alternate translations as extra columns
    #[serde(default)]
    pub include_alternates: bool,

    /// Optional stop-word list (one word per line) for the vocabulary columns
    #[serde(default)]
    pub stop_words_file: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            text_column: default_text_column(),
            retranslate_sentences: true,
            vocabulary: false,
            include_alternates: false,
            stop_words_file: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
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

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_host() -> String {
    "google.com".to_string()
}

fn default_tries() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrent_requests() -> usize {
    10
}

fn default_interactive_multiplier() -> usize {
    4
}

fn default_text_column() -> usize {
    3
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load a configuration file, or the defaults when the file does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("missing required 'from' language code"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("missing required 'to' language code"));
        }

        if !self.source_language.trim().eq_ignore_ascii_case("auto") {
            crate::language_utils::get_language_name(&self.source_language)
                .context("Invalid source language")?;
        }
        crate::language_utils::get_language_name(&self.target_language)
            .context("Invalid target language")?;

        if self.dispatch.concurrent_requests == 0 {
            return Err(anyhow!("dispatch.concurrent_requests must be at least 1"));
        }
        if self.output.text_column == 0 {
            return Err(anyhow!("output.text_column is 1-based and must be at least 1"));
        }
        if self.endpoint.host.trim().is_empty() {
            return Err(anyhow!("endpoint.host must not be empty"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            endpoint: EndpointConfig::default(),
            dispatch: DispatchConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
