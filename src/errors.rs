/*!
 * Error types for the paratrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the translation endpoint
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The request timed out before the endpoint answered
    #[error("Bad network: {0}")]
    BadNetwork(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// Every attempt was answered with a rate-limiting status
    #[error("Rate limit exceeded after {attempts} attempt(s)")]
    RateLimitExceeded {
        /// Number of requests issued before giving up
        attempts: u32,
    },
}

/// Errors that can occur while translating a single input line
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The endpoint answered with a body that could not be decoded
    #[error("Row {row_id}: undecodable response: {message}")]
    Decode {
        /// Row id of the offending input line
        row_id: u64,
        /// Decoder message
        message: String,
    },

    /// The result sink is no longer accepting rows
    #[error("Result sink closed: {0}")]
    SinkClosed(String),
}

impl TranslationError {
    /// Attach a row id to a provider error, promoting parse failures to decode errors
    pub fn for_row(row_id: u64, error: ProviderError) -> Self {
        match error {
            ProviderError::ParseError(message) => Self::Decode { row_id, message },
            other => Self::Provider(other),
        }
    }
}

/// Post-processing stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Pad every row to the widest row
    Normalize,
    /// Order rows by numeric row id
    Sort,
    /// Extract the aligned text column
    Extract,
    /// Generate the gettext catalog
    Catalog,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Normalize => "normalize",
            Stage::Sort => "sort",
            Stage::Extract => "extract",
            Stage::Catalog => "catalog",
        };
        write!(f, "{}", name)
    }
}

/// Underlying cause of a failed post-processing stage
#[derive(Error, Debug)]
pub enum StageError {
    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV could not be parsed or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Column 0 of a record was not a row id
    #[error("record {record}: invalid row id '{value}'")]
    InvalidRowId {
        /// 1-based record number in the stage input
        record: usize,
        /// Offending cell content
        value: String,
    },
}

/// A post-processing failure tagged with the stage that produced it
#[derive(Error, Debug)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    /// Stage that failed
    pub stage: Stage,
    /// Underlying cause
    #[source]
    pub source: StageError,
}

impl PipelineError {
    /// Wrap a stage error
    pub fn new(stage: Stage, source: impl Into<StageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from post-processing
    #[error("Post-processing error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    /// Process exit status: 2 for configuration and usage errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

// Recovers the typed cause when it sits under `anyhow` context
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        let error = match error.downcast::<PipelineError>() {
            Ok(e) => return Self::Pipeline(e),
            Err(error) => error,
        };
        let error = match error.downcast::<TranslationError>() {
            Ok(e) => return Self::Translation(e),
            Err(error) => error,
        };
        let error = match error.downcast::<ProviderError>() {
            Ok(e) => return Self::Provider(e),
            Err(error) => error,
        };
        match error.downcast::<std::io::Error>() {
            Ok(e) => Self::File(e.to_string()),
            Err(error) => Self::Unknown(format!("{:#}", error)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
