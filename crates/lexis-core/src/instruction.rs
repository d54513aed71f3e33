//! Generation instructions
//!
//! An instruction is the fixed structural rules followed, once anything has
//! been rejected, by a transcript of every rejected candidate and its
//! violations. Violation messages are replayed verbatim.

use lexis_record::DecompositionRecord;
use std::fmt::Write as _;

/// Fixed description of the record schema and its structural rules
pub const STRUCTURAL_RULES: &str = r#"You are a linguistic expert that deconstructs words into their meaningful parts and explains their etymology. Create multiple layers of combinations to form the final meaning of the word.

Schema Requirements:
- thought: The reasoning behind the word's etymology and how it's constructed
- parts: An array of word parts that MUST combine to form the original word
  - id: Unique identifier for the word part (simple, lowercase, no spaces)
  - text: The EXACT section of text from the original word
  - originalWord: The oldest form this part derives from
  - origin: Brief origin language (e.g., "Latin", "Greek")
  - meaning: The meaning of this part in its original language
- combinations: A directed acyclic graph showing how parts combine
  - Each array is a single layer in the graph
  - Each combination contains:
    - id: Unique identifier (cannot repeat part IDs)
    - text: The combined text
    - definition: Definition of the combined parts
    - sourceIds: Array of IDs of parts or combinations that form this
  - The last layer MUST have exactly one combination matching the full word

If the word has no clear etymology:
1. Still break it into phonetic or meaningful segments
2. Include at least one part
3. Always include at least one combination layer
4. Make sure the final combination is the original word

IMPORTANT: Ensure that:
1. Parts combine exactly to form the original word, no extra or missing letters
2. IDs are unique across all parts and combinations
3. Every node (except the final word) is used exactly once as a source
4. The final layer has exactly one node representing the full word
5. All sourceIds reference existing parts or combinations from previous layers"#;

/// Closing directive appended after a feedback transcript
pub const FIX_DIRECTIVE: &str = "Please fix all the issues and try again.";

/// A candidate that failed validation, with its violations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedCandidate {
    /// The record as generated
    pub candidate: DecompositionRecord,
    /// Violation messages, in validator order
    pub violations: Vec<String>,
}

/// Build the instruction for the next attempt
///
/// With no history this is exactly [`STRUCTURAL_RULES`].
#[must_use]
pub fn build_instruction(history: &[RejectedCandidate]) -> String {
    let mut instruction = String::from(STRUCTURAL_RULES);
    if history.is_empty() {
        return instruction;
    }

    instruction.push_str("\n\nPrevious attempts:");
    for (idx, rejected) in history.iter().enumerate() {
        let _ = write!(
            instruction,
            "\nAttempt {}:\n{}\n",
            idx + 1,
            rejected.candidate.to_pretty_json()
        );
        if !rejected.violations.is_empty() {
            instruction.push_str("Errors:\n");
            for violation in &rejected.violations {
                let _ = writeln!(instruction, "- {violation}");
            }
        }
    }
    instruction.push('\n');
    instruction.push_str(FIX_DIRECTIVE);
    instruction
}
