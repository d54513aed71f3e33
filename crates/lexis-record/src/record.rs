//! Decomposition record types
//!
//! A record describes how a word splits into atomic parts and how those parts
//! merge, layer by layer, back into the word:
//! - [`WordPart`]: an etymological fragment occupying a slice of the word
//! - [`Combination`]: a node merging earlier parts or combinations
//! - [`CombinationLayer`]: one generation of combinations
//! - [`DecompositionRecord`]: the top-level aggregate
//!
//! Records are plain data. Structural soundness is checked elsewhere and is
//! never silently corrected here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn unknown_origin() -> String {
    "Unknown".to_string()
}

/// One atomic etymological fragment of the input word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordPart {
    /// Identifier unique across the whole record (simple, lowercase, no spaces)
    pub id: String,
    /// The exact section of the original word this part occupies
    pub text: String,
    /// The oldest form this part derives from
    pub original_word: String,
    /// Origin language, e.g. "Latin" or "Greek"
    #[serde(default = "unknown_origin")]
    pub origin: String,
    /// Meaning of this part in its origin language
    #[serde(default)]
    pub meaning: String,
}

impl WordPart {
    /// Create a part with unknown origin and empty meaning
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        original_word: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            original_word: original_word.into(),
            origin: unknown_origin(),
            meaning: String::new(),
        }
    }

    /// With origin language
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// With gloss in the origin language
    #[inline]
    #[must_use]
    pub fn with_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = meaning.into();
        self
    }
}

/// A node formed by merging earlier parts or combinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    /// Identifier unique across parts and all combinations
    pub id: String,
    /// The combined surface form
    pub text: String,
    /// Gloss of the merged meaning
    #[serde(default)]
    pub definition: String,
    /// Ids of the parts or earlier combinations merged into this node
    #[serde(default)]
    pub source_ids: Vec<String>,
}

impl Combination {
    /// Create a combination from its sources
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, text: impl Into<String>, source_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            text: text.into(),
            definition: String::new(),
            source_ids: source_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// With definition of the merged meaning
    #[inline]
    #[must_use]
    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }
}

/// One generation of the combination DAG
pub type CombinationLayer = Vec<Combination>;

/// Full structured result for one word
///
/// Layers in `combinations` run from closest-to-parts to closest-to-word; the
/// last layer is expected to hold the single node spelling the whole word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DecompositionRecord {
    /// Free-text rationale behind the decomposition
    #[serde(default)]
    pub thought: String,
    /// Atomic fragments, in word order
    #[serde(default)]
    pub parts: Vec<WordPart>,
    /// Combination layers, outermost first
    #[serde(default)]
    pub combinations: Vec<CombinationLayer>,
}

/// Borrowed view of any node in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef<'a> {
    /// An atomic part
    Part(&'a WordPart),
    /// A combination and the zero-based layer it sits in
    Combination {
        /// Layer index
        layer: usize,
        /// The combination itself
        node: &'a Combination,
    },
}

impl<'a> NodeRef<'a> {
    /// Identifier of the node
    #[inline]
    #[must_use]
    pub fn id(&self) -> &'a str {
        match self {
            Self::Part(part) => &part.id,
            Self::Combination { node, .. } => &node.id,
        }
    }

    /// Surface text of the node
    #[inline]
    #[must_use]
    pub fn text(&self) -> &'a str {
        match self {
            Self::Part(part) => &part.text,
            Self::Combination { node, .. } => &node.text,
        }
    }
}

impl DecompositionRecord {
    /// Create an empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With rationale
    #[inline]
    #[must_use]
    pub fn with_thought(mut self, thought: impl Into<String>) -> Self {
        self.thought = thought.into();
        self
    }

    /// Append a part
    #[inline]
    #[must_use]
    pub fn with_part(mut self, part: WordPart) -> Self {
        self.parts.push(part);
        self
    }

    /// Append a combination layer
    #[inline]
    #[must_use]
    pub fn with_layer(mut self, layer: CombinationLayer) -> Self {
        self.combinations.push(layer);
        self
    }

    /// Concatenation of all part texts in listed order
    #[must_use]
    pub fn spelled_text(&self) -> String {
        self.parts.iter().map(|p| p.text.as_str()).collect()
    }

    /// The innermost layer, if any
    #[inline]
    #[must_use]
    pub fn last_layer(&self) -> Option<&CombinationLayer> {
        self.combinations.last()
    }

    /// The terminal combination when the last layer holds exactly one node
    #[must_use]
    pub fn final_combination(&self) -> Option<&Combination> {
        match self.last_layer().map(Vec::as_slice) {
            Some([only]) => Some(only),
            _ => None,
        }
    }

    /// Every node in definition order: parts, then each layer in turn
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_>> {
        let parts = self.parts.iter().map(NodeRef::Part);
        let combos = self
            .combinations
            .iter()
            .enumerate()
            .flat_map(|(layer, nodes)| {
                nodes
                    .iter()
                    .map(move |node| NodeRef::Combination { layer, node })
            });
        parts.chain(combos)
    }

    /// Look up the first node carrying `id`
    #[must_use]
    pub fn find(&self, id: &str) -> Option<NodeRef<'_>> {
        self.nodes().find(|n| n.id() == id)
    }

    /// Total number of parts and combinations
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.parts.len() + self.combinations.iter().map(Vec::len).sum::<usize>()
    }

    /// Whether `id` names a part
    #[must_use]
    pub fn is_part(&self, id: &str) -> bool {
        self.parts.iter().any(|p| p.id == id)
    }
}
