//! Violation types
//!
//! Each variant renders, via `Display`, to the exact sentence replayed to the
//! generator in corrective instructions. Changing a message changes what the
//! model is told.

use std::fmt;

/// Structural rule a violation breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    /// Parts spell the word
    Coverage,
    /// Ids are unique across parts and combinations
    Uniqueness,
    /// Last layer holds exactly one combination
    TerminalLayer,
    /// The terminal combination spells the word
    TerminalIdentity,
    /// Sources resolve to parts or strictly earlier layers
    DagClosure,
}

impl Rule {
    /// Whether this rule concerns the terminal layer
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::TerminalLayer | Self::TerminalIdentity)
    }
}

/// Where an id was defined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdLocation {
    /// Among the parts
    Parts,
    /// In a combination layer (1-based, as shown to the generator)
    Layer(usize),
}

impl fmt::Display for IdLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parts => write!(f, "parts"),
            Self::Layer(n) => write!(f, "combinations layer {n}"),
        }
    }
}

/// A single broken structural invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// Part texts do not concatenate to the word
    #[error(
        "The parts \"{}\" (combined: \"{combined}\") do not combine to form the word \"{word}\"",
        .parts.join(", ")
    )]
    Coverage {
        /// Part texts in record order
        parts: Vec<String>,
        /// Normalized concatenation of the parts
        combined: String,
        /// Normalized input word
        word: String,
    },

    /// An id was defined more than once
    #[error(
        "ID \"{id}\" in {location} is already used in {first_seen}. IDs must be unique across both parts and combinations."
    )]
    DuplicateId {
        /// The repeated id
        id: String,
        /// Where the repeat occurs
        location: IdLocation,
        /// Where the id was first defined
        first_seen: IdLocation,
    },

    /// The last layer does not hold exactly one combination
    #[error(
        "The last layer should have exactly one item, which should be the original word, but you have {count} items."
    )]
    TerminalCount {
        /// Combinations in the last layer (0 when there are no layers)
        count: usize,
    },

    /// The terminal combination does not spell the word
    #[error("The final combination \"{found}\" does not match the input word \"{word}\"")]
    TerminalMismatch {
        /// Lowercased text of the terminal combination
        found: String,
        /// The input word
        word: String,
    },

    /// A source id is not defined in the parts or an earlier layer
    #[error(
        "The sourceId \"{source_id}\" in combination \"{combination}\" does not exist in previous layers."
    )]
    UnresolvedSource {
        /// The unresolved reference
        source_id: String,
        /// Id of the referring combination
        combination: String,
        /// Layer of the referring combination (1-based)
        layer: usize,
    },
}

impl Violation {
    /// The rule this violation breaks
    #[must_use]
    pub fn rule(&self) -> Rule {
        match self {
            Self::Coverage { .. } => Rule::Coverage,
            Self::DuplicateId { .. } => Rule::Uniqueness,
            Self::TerminalCount { .. } => Rule::TerminalLayer,
            Self::TerminalMismatch { .. } => Rule::TerminalIdentity,
            Self::UnresolvedSource { .. } => Rule::DagClosure,
        }
    }
}
