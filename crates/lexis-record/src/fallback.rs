//! Hard-coded default record
//!
//! Returned when a user-initiated retry still cannot obtain any candidate from
//! the generator. It is a complete, valid decomposition of [`FALLBACK_WORD`].

use crate::record::{Combination, DecompositionRecord, WordPart};

/// The word the fallback record spells
pub const FALLBACK_WORD: &str = "deconstructor";

impl DecompositionRecord {
    /// The fixed default decomposition of "deconstructor"
    #[must_use]
    pub fn fallback() -> Self {
        Self::new()
            .with_part(
                WordPart::new("de", "de", "de-")
                    .with_origin("Latin")
                    .with_meaning("down, off, away"),
            )
            .with_part(
                WordPart::new("construc", "construc", "construere")
                    .with_origin("Latin")
                    .with_meaning("to build, to pile up"),
            )
            .with_part(
                WordPart::new("tor", "tor", "-or")
                    .with_origin("Latin")
                    .with_meaning("agent noun, one who does an action"),
            )
            .with_layer(vec![Combination::new(
                "constructor",
                "constructor",
                ["construc", "tor"],
            )
            .with_definition("one who constructs or builds")])
            .with_layer(vec![Combination::new(
                "deconstructor",
                FALLBACK_WORD,
                ["de", "constructor"],
            )
            .with_definition("one who takes apart or analyzes the construction of something")])
    }
}
