//! Structural validation of decomposition records
//!
//! Every check runs independently and all violations are collected; nothing
//! short-circuits on the first failure. Incomplete records (no parts, no
//! layers, empty layers) are reported, never rejected with a panic.

use crate::violation::{IdLocation, Violation};
use lexis_record::DecompositionRecord;
use std::collections::{HashMap, HashSet};

/// Case-folded word with all whitespace removed
fn fold_compact(word: &str) -> String {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Pure, stateless checker for the five structural invariants
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl StructuralValidator {
    /// Create new validator instance
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run every check against `word`
    ///
    /// Violations come back grouped by check, in the order coverage,
    /// uniqueness, terminal, DAG closure. An empty result means the record is
    /// valid.
    #[must_use]
    pub fn check(&self, word: &str, record: &DecompositionRecord) -> Vec<Violation> {
        let mut violations = Vec::new();
        violations.extend(self.check_coverage(word, record));
        violations.extend(self.check_unique_ids(record));
        violations.extend(self.check_terminal(word, record));
        violations.extend(self.check_closure(record));
        violations
    }

    /// Parts must spell the word, ignoring case and whitespace in the word
    pub fn check_coverage(&self, word: &str, record: &DecompositionRecord) -> Option<Violation> {
        let combined = record.spelled_text();
        if combined.to_lowercase() == fold_compact(word) {
            return None;
        }

        Some(Violation::Coverage {
            parts: record.parts.iter().map(|p| p.text.clone()).collect(),
            combined,
            word: word.to_string(),
        })
    }

    /// Every id across parts and combinations must be distinct
    ///
    /// Each repeat is reported against the location where the id first
    /// appeared.
    pub fn check_unique_ids(&self, record: &DecompositionRecord) -> Vec<Violation> {
        let mut first_seen: HashMap<&str, IdLocation> = HashMap::new();
        let mut violations = Vec::new();

        let part_ids = record.parts.iter().map(|p| (p.id.as_str(), IdLocation::Parts));
        let combo_ids = record
            .combinations
            .iter()
            .enumerate()
            .flat_map(|(i, layer)| {
                layer
                    .iter()
                    .map(move |c| (c.id.as_str(), IdLocation::Layer(i + 1)))
            });

        for (id, location) in part_ids.chain(combo_ids) {
            match first_seen.get(id) {
                Some(&first) => violations.push(Violation::DuplicateId {
                    id: id.to_string(),
                    location,
                    first_seen: first,
                }),
                None => {
                    first_seen.insert(id, location);
                }
            }
        }

        violations
    }

    /// Last layer must hold one combination that spells the word
    ///
    /// A record without layers counts as a last layer of zero items.
    pub fn check_terminal(&self, word: &str, record: &DecompositionRecord) -> Option<Violation> {
        let count = record.last_layer().map_or(0, Vec::len);
        if count != 1 {
            return Some(Violation::TerminalCount { count });
        }

        let found = record.final_combination()?.text.to_lowercase();
        if found == word.to_lowercase() {
            return None;
        }
        Some(Violation::TerminalMismatch {
            found,
            word: word.to_string(),
        })
    }

    /// Sources must resolve to parts or combinations in strictly earlier layers
    ///
    /// Ids become visible only after their whole layer is checked, so
    /// same-layer and forward references are both reported.
    pub fn check_closure(&self, record: &DecompositionRecord) -> Vec<Violation> {
        let mut defined: HashSet<&str> = record.parts.iter().map(|p| p.id.as_str()).collect();
        let mut violations = Vec::new();

        for (layer, combos) in record.combinations.iter().enumerate() {
            for combo in combos {
                for source in &combo.source_ids {
                    if !defined.contains(source.as_str()) {
                        violations.push(Violation::UnresolvedSource {
                            source_id: source.clone(),
                            combination: combo.id.clone(),
                            layer: layer + 1,
                        });
                    }
                }
            }
            defined.extend(combos.iter().map(|c| c.id.as_str()));
        }

        violations
    }

    /// Whether `record` satisfies every invariant for `word`
    #[inline]
    #[must_use]
    pub fn is_valid(&self, word: &str, record: &DecompositionRecord) -> bool {
        self.check(word, record).is_empty()
    }
}

/// Validate `record` against `word`, returning human-readable violations
///
/// Messages are suitable for verbatim replay into a corrective instruction.
#[must_use]
pub fn validate(word: &str, record: &DecompositionRecord) -> Vec<String> {
    StructuralValidator::new()
        .check(word, record)
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::Rule;
    use lexis_record::{Combination, WordPart};
    use pretty_assertions::assert_eq;

    fn deconstructor() -> DecompositionRecord {
        DecompositionRecord::new()
            .with_part(WordPart::new("de", "de", "de-"))
            .with_part(WordPart::new("construc", "construc", "construere"))
            .with_part(WordPart::new("tor", "tor", "-or"))
            .with_layer(vec![Combination::new(
                "constructor",
                "constructor",
                ["construc", "tor"],
            )])
            .with_layer(vec![Combination::new(
                "deconstructor",
                "deconstructor",
                ["de", "constructor"],
            )])
    }

    #[test]
    fn valid_example_has_no_violations() {
        assert!(validate("deconstructor", &deconstructor()).is_empty());
    }

    #[test]
    fn truncated_final_text_is_single_identity_violation() {
        let mut record = deconstructor();
        record.combinations[1][0].text = "deconstruct".to_string();

        let violations = StructuralValidator::new().check("deconstructor", &record);
        assert_eq!(
            violations,
            vec![Violation::TerminalMismatch {
                found: "deconstruct".to_string(),
                word: "deconstructor".to_string(),
            }]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut record = deconstructor();
        record.parts[0].text = "De".to_string();
        record.combinations[1][0].text = "DeConstructor".to_string();
        assert!(StructuralValidator::new().is_valid("DECONSTRUCTOR", &record));
    }

    #[test]
    fn coverage_ignores_whitespace_in_word() {
        let validator = StructuralValidator::new();
        assert!(validator
            .check_coverage("de construc tor", &deconstructor())
            .is_none());
    }

    #[test]
    fn coverage_mismatch_names_concatenation() {
        let mut record = deconstructor();
        record.parts[2].text = "ter".to_string();
        let msg = validate("deconstructor", &record).remove(0);
        assert!(msg.contains("deconstructer"), "{msg}");
        assert!(msg.contains("\"deconstructor\""), "{msg}");
    }

    #[test]
    fn empty_record_reports_without_panicking() {
        let violations = StructuralValidator::new().check("word", &DecompositionRecord::new());
        let rules: Vec<_> = violations.iter().map(Violation::rule).collect();
        assert_eq!(rules, vec![Rule::Coverage, Rule::TerminalLayer]);
        assert_eq!(violations[1], Violation::TerminalCount { count: 0 });
    }

    #[test]
    fn empty_last_layer_counts_zero() {
        let record = deconstructor().with_layer(vec![]);
        let violations = StructuralValidator::new().check("deconstructor", &record);
        assert_eq!(violations, vec![Violation::TerminalCount { count: 0 }]);
    }

    #[test]
    fn wide_last_layer_skips_identity_check() {
        let mut record = deconstructor();
        record.combinations[1].push(Combination::new("extra", "zzz", ["de"]));
        let violations = StructuralValidator::new().check("deconstructor", &record);
        assert_eq!(violations, vec![Violation::TerminalCount { count: 2 }]);
    }

    #[test]
    fn duplicate_reports_first_location() {
        let mut record = deconstructor();
        record.combinations[0].push(Combination::new("de", "de", ["de"]));
        record.combinations[1].clear();
        record.combinations[1].push(Combination::new("de", "deconstructor", ["constructor"]));

        let dupes = StructuralValidator::new().check_unique_ids(&record);
        assert_eq!(
            dupes,
            vec![
                Violation::DuplicateId {
                    id: "de".into(),
                    location: IdLocation::Layer(1),
                    first_seen: IdLocation::Parts,
                },
                Violation::DuplicateId {
                    id: "de".into(),
                    location: IdLocation::Layer(2),
                    first_seen: IdLocation::Parts,
                },
            ]
        );
    }

    #[test]
    fn duplicate_within_parts_is_reported() {
        let record = deconstructor().with_part(WordPart::new("tor", "", "-or"));
        let dupes = StructuralValidator::new().check_unique_ids(&record);
        assert_eq!(dupes.len(), 1);
        assert!(dupes[0].to_string().contains("ID \"tor\" in parts is already used in parts."));
    }

    #[test]
    fn same_layer_reference_is_unresolved() {
        let record = DecompositionRecord::new()
            .with_part(WordPart::new("a", "a", "a"))
            .with_part(WordPart::new("b", "b", "b"))
            .with_layer(vec![
                Combination::new("x", "a", ["a"]),
                Combination::new("y", "ab", ["x", "b"]),
            ]);
        let unresolved = StructuralValidator::new().check_closure(&record);
        assert_eq!(
            unresolved,
            vec![Violation::UnresolvedSource {
                source_id: "x".into(),
                combination: "y".into(),
                layer: 1,
            }]
        );
    }

    #[test]
    fn forward_and_dangling_references_are_unresolved() {
        let record = DecompositionRecord::new()
            .with_part(WordPart::new("a", "a", "a"))
            .with_layer(vec![Combination::new("x", "a", ["later", "ghost"])])
            .with_layer(vec![Combination::new("later", "a", ["x"])]);
        let ids: Vec<_> = StructuralValidator::new()
            .check_closure(&record)
            .into_iter()
            .filter_map(|v| match v {
                Violation::UnresolvedSource { source_id, .. } => Some(source_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids, vec!["later".to_string(), "ghost".to_string()]);
    }

    #[test]
    fn all_checks_run_together() {
        let record = DecompositionRecord::new()
            .with_part(WordPart::new("a", "x", "a"))
            .with_part(WordPart::new("a", "y", "a"))
            .with_layer(vec![Combination::new("z", "nope", ["missing"])]);
        let rules: Vec<_> = StructuralValidator::new()
            .check("word", &record)
            .iter()
            .map(Violation::rule)
            .collect();
        assert_eq!(
            rules,
            vec![
                Rule::Coverage,
                Rule::Uniqueness,
                Rule::TerminalIdentity,
                Rule::DagClosure,
            ]
        );
    }
}
