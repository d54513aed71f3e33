//! Error types for Lexis Core
//!
//! Structural violations are not errors: they are data fed back into the next
//! generation attempt. The types here cover:
//! - Generation failures raised by a capability (transport, API, schema)
//! - Terminal exhaustion of the attempt budget
//! - Invalid input words
//! - Configuration problems

use lexis_record::SchemaError;
use std::path::PathBuf;

/// Failure of a single generation call
///
/// Every variant counts as a transport-level failure for the retry protocol:
/// it consumes an attempt but is never transcribed into feedback.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Network or HTTP client failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Model API answered with a non-success status
    #[error("model API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Response envelope could not be read
    #[error("malformed model response: {0}")]
    MalformedResponse(String),

    /// Response carried no structured output
    #[error("model returned no structured output")]
    EmptyResponse,

    /// Structured output did not match the record schema
    #[error("invalid model output: {0}")]
    Schema(#[from] SchemaError),

    /// No API credential was supplied
    #[error("missing API credential")]
    MissingCredential,

    /// Any other capability-specific failure
    #[error("generation failed: {0}")]
    Other(String),
}

/// Errors surfaced to callers of the decomposition entry points
#[derive(Debug, thiserror::Error)]
pub enum DecompositionError {
    /// Input is not a single word
    #[error("invalid word: {0}")]
    InvalidWord(#[from] WordError),

    /// Every attempt failed in transport and no fallback applied
    #[error("no decomposition after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: GenerationError,
    },

    /// The generation capability could not be set up
    #[error("generation capability unavailable: {0}")]
    Capability(#[source] GenerationError),

    /// Configuration could not be loaded or is invalid
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DecompositionError {
    /// Whether repeating the request as a user retry may succeed
    ///
    /// A user retry of an exhausted request unlocks the default record, so
    /// exhaustion is always worth retrying.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}

/// Rejected input word
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordError {
    /// Nothing left after trimming
    #[error("word is empty")]
    Empty,

    /// Input holds more than one whitespace-separated token
    #[error("only single words can be deconstructed, got {tokens} words")]
    MultipleWords { tokens: usize },
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
