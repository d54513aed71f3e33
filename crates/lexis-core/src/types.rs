//! Core types for Lexis
//!
//! - Request identifiers for correlating diagnostics
//! - Normalized input words
//! - Model selection
//! - Decomposition outcomes

use crate::error::WordError;
use lexis_record::DecompositionRecord;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique decomposition request identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Ulid);

impl RequestId {
    /// Generate new request ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single, trimmed, whitespace-free word
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word(String);

impl Word {
    /// Normalize raw selection text into a word
    ///
    /// # Errors
    /// - `WordError::Empty` if nothing remains after trimming
    /// - `WordError::MultipleWords` if the text holds several tokens
    pub fn parse(raw: &str) -> Result<Self, WordError> {
        let tokens = raw.split_whitespace().count();
        match tokens {
            0 => Err(WordError::Empty),
            1 => Ok(Self(raw.trim().to_string())),
            tokens => Err(WordError::MultipleWords { tokens }),
        }
    }

    /// Borrow the word
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Models offered for selection, with display names
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("gpt-4o", "GPT-4o (Default)"),
    ("gpt-4o-mini", "GPT-4o Mini (Faster)"),
    ("gpt-4.5-preview", "GPT-4.5 Preview"),
];

/// Opaque model identifier passed through to the generation capability
///
/// Identifiers outside [`KNOWN_MODELS`] are accepted unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSelector(String);

impl ModelSelector {
    /// Wrap a model identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Display name for catalogued models
    #[must_use]
    pub fn display_name(&self) -> Option<&'static str> {
        KNOWN_MODELS
            .iter()
            .find(|(id, _)| *id == self.0)
            .map(|(_, name)| *name)
    }

    /// Whether the identifier is in the catalogue
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        self.display_name().is_some()
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl std::fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the returned record was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecompositionStatus {
    /// A candidate passed every structural check
    Accepted,
    /// Attempts ran out; the most recent candidate is returned despite violations
    BestEffort,
    /// No candidate was ever produced; the default record is returned
    Fallback,
}

/// Final result of one decomposition request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Request this result belongs to
    pub request_id: RequestId,
    /// The returned record
    pub record: DecompositionRecord,
    /// How the record was obtained
    pub status: DecompositionStatus,
    /// Generation calls made
    pub attempts: u32,
    /// Outstanding violations (non-empty only for best-effort results)
    pub violations: Vec<String>,
}

impl Decomposition {
    /// Whether the record passed validation
    #[inline]
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.status == DecompositionStatus::Accepted
    }

    /// Unwrap into the record
    #[inline]
    #[must_use]
    pub fn into_record(self) -> DecompositionRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_is_trimmed() {
        let word = Word::parse("  deconstructor\n").unwrap();
        assert_eq!(word.as_str(), "deconstructor");
    }

    #[test]
    fn word_rejects_empty_and_phrases() {
        assert_eq!(Word::parse("   "), Err(WordError::Empty));
        assert_eq!(
            Word::parse("two words"),
            Err(WordError::MultipleWords { tokens: 2 })
        );
    }

    #[test]
    fn model_catalogue_lookup() {
        assert_eq!(ModelSelector::default().as_str(), "gpt-4o");
        assert_eq!(
            ModelSelector::new("gpt-4o-mini").display_name(),
            Some("GPT-4o Mini (Faster)")
        );
        let custom = ModelSelector::new("o3-mini");
        assert!(!custom.is_known());
        assert_eq!(custom.to_string(), "o3-mini");
    }

    #[test]
    fn request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
