use lexis_record::{Combination, DecompositionRecord, WordPart};
use lexis_validator::{validate, Rule, StructuralValidator, Violation};
use proptest::prelude::*;

/// Split `word` at every gap whose flag is set and rebuild it in one layer
fn split_record(word: &str, cuts: &[bool]) -> DecompositionRecord {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for (i, ch) in word.chars().enumerate() {
        current.push(ch);
        if cuts.get(i).copied().unwrap_or(false) {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    let mut record = DecompositionRecord::new();
    for (i, piece) in pieces.iter().enumerate() {
        record = record.with_part(WordPart::new(format!("p{i}"), piece.clone(), piece.clone()));
    }
    let sources: Vec<String> = (0..pieces.len()).map(|i| format!("p{i}")).collect();
    record.with_layer(vec![Combination::new("whole", word, sources)])
}

fn word_and_cuts() -> impl Strategy<Value = (String, Vec<bool>)> {
    "[a-z]{2,12}".prop_flat_map(|word| {
        let len = word.len();
        (Just(word), proptest::collection::vec(any::<bool>(), len))
    })
}

fn rules(word: &str, record: &DecompositionRecord) -> Vec<Rule> {
    StructuralValidator::new()
        .check(word, record)
        .iter()
        .map(Violation::rule)
        .collect()
}

proptest! {
    #[test]
    fn prop_exact_split_is_valid((word, cuts) in word_and_cuts()) {
        let record = split_record(&word, &cuts);
        prop_assert!(validate(&word, &record).is_empty());
        prop_assert!(StructuralValidator::new().is_valid(&word.to_uppercase(), &record));
    }

    #[test]
    fn prop_single_char_mutation_breaks_coverage(
        (word, cuts) in word_and_cuts(),
        part_pick in any::<prop::sample::Index>(),
        char_pick in any::<prop::sample::Index>(),
    ) {
        let mut record = split_record(&word, &cuts);
        let part = part_pick.get(&record.parts).id.clone();
        let target = record.parts.iter_mut().find(|p| p.id == part).unwrap();

        let mut chars: Vec<char> = target.text.chars().collect();
        let at = char_pick.index(chars.len());
        chars[at] = if chars[at] == 'z' { 'a' } else { 'z' };
        target.text = chars.into_iter().collect();

        prop_assert!(rules(&word, &record).contains(&Rule::Coverage));
    }

    #[test]
    fn prop_shared_id_is_reported(
        (word, cuts) in word_and_cuts(),
        first in any::<prop::sample::Index>(),
        second in any::<prop::sample::Index>(),
    ) {
        let mut record = split_record(&word, &cuts);
        let node_count = record.parts.len() + 1;
        let a = first.index(node_count);
        let mut b = second.index(node_count);
        if a == b {
            b = (b + 1) % node_count;
        }
        prop_assume!(a != b);

        let shared = if a < record.parts.len() {
            record.parts[a].id.clone()
        } else {
            record.combinations[0][0].id.clone()
        };
        if b < record.parts.len() {
            record.parts[b].id = shared.clone();
        } else {
            record.combinations[0][0].id = shared.clone();
        }

        let named = StructuralValidator::new()
            .check_unique_ids(&record)
            .into_iter()
            .any(|v| matches!(v, Violation::DuplicateId { ref id, .. } if *id == shared));
        prop_assert!(named);
    }

    #[test]
    fn prop_unknown_source_is_reported(
        (word, cuts) in word_and_cuts(),
        ghost in "[A-Z]{3,6}",
    ) {
        let mut record = split_record(&word, &cuts);
        record.combinations[0][0].source_ids.push(ghost.clone());

        let violations = StructuralValidator::new().check(&word, &record);
        prop_assert_eq!(
            violations,
            vec![Violation::UnresolvedSource {
                source_id: ghost,
                combination: "whole".to_string(),
                layer: 1,
            }]
        );
    }

    #[test]
    fn prop_terminal_clean_iff_single_matching_node(
        (word, cuts) in word_and_cuts(),
        extra in 0usize..3,
        rename in any::<bool>(),
    ) {
        let mut record = split_record(&word, &cuts);
        for i in 0..extra {
            record.combinations[0].push(Combination::new(format!("extra{i}"), word.clone(), ["p0"]));
        }
        if rename {
            record.combinations[0][0].text.push('x');
        }

        let terminal_clean = !rules(&word, &record).iter().any(|r| r.is_terminal());
        let expected = extra == 0 && !rename;
        prop_assert_eq!(terminal_clean, expected);
    }
}

#[test]
fn same_layer_reference_is_reported_for_exact_pair() {
    let record = DecompositionRecord::new()
        .with_part(WordPart::new("a", "a", "a"))
        .with_part(WordPart::new("b", "b", "b"))
        .with_layer(vec![
            Combination::new("ab", "ab", ["a", "b"]),
            Combination::new("ab2", "ab", ["ab"]),
        ])
        .with_layer(vec![Combination::new("final", "ab", ["ab2"])]);

    let messages = validate("ab", &record);
    assert_eq!(
        messages,
        vec!["The sourceId \"ab\" in combination \"ab2\" does not exist in previous layers."]
    );
}

#[test]
fn deconstructor_example_scenarios() {
    let record = DecompositionRecord::fallback();
    assert!(validate("deconstructor", &record).is_empty());

    let mut broken = record.clone();
    broken.combinations[1][0].text = "deconstruct".to_string();
    assert_eq!(
        validate("deconstructor", &broken),
        vec!["The final combination \"deconstruct\" does not match the input word \"deconstructor\""]
    );
}
