//! End-to-end suggestion behavior against a realistic catalog: the
//! documented completion scenarios plus the engine's ordering and
//! range invariants.

mod common;

use rstest::{fixture, rstest};
use sluggen::provider::MemoryProvider;
use sluggen::suggest;
use sluggen::{Suggestion, SuggestionKind};

#[fixture]
fn provider() -> MemoryProvider {
    common::demo_provider()
}

fn texts(suggestions: &[Suggestion]) -> Vec<&str> {
    suggestions.iter().map(|s| s.text.as_str()).collect()
}

#[rstest]
fn tag_suggestions_exclude_used_tags(provider: MemoryProvider) {
    let suggestions = suggest("{noun:+animal +", 15, &provider).unwrap();
    assert_eq!(
        texts(&suggestions),
        ["artifact", "plant", "object", "person", "place"]
    );
    for suggestion in &suggestions {
        assert_eq!(suggestion.kind, SuggestionKind::Tag);
        assert_eq!(suggestion.replace_range, 15..15);
    }
}

#[rstest]
fn prefix_completion_orders_case_groups(provider: MemoryProvider) {
    let suggestions = suggest("{a", 2, &provider).unwrap();
    assert_eq!(
        texts(&suggestions),
        ["adjective", "adverb", "aDjEcTiVe", "aDvErB"]
    );
    for suggestion in &suggestions {
        assert_eq!(suggestion.kind, SuggestionKind::Generator);
        assert_eq!(suggestion.replace_range, 1..2);
    }
}

#[rstest]
fn completed_size_limit_blocks_further_comparisons(provider: MemoryProvider) {
    let suggestions = suggest("{noun:==4", 10, &provider).unwrap();
    assert_eq!(texts(&suggestions), ["+", "-", "}"]);
}

#[rstest]
fn no_second_comparison_operator_is_ever_offered(provider: MemoryProvider) {
    const COMPARISONS: [&str; 6] = ["==", "!=", "<", "<=", ">", ">="];
    for pattern in ["{noun:==4", "{noun:>3 ", "{noun:<= 10 +animal"] {
        let cursor = pattern.chars().count();
        let suggestions = suggest(pattern, cursor, &provider).unwrap();
        for suggestion in &suggestions {
            assert!(
                !COMPARISONS.contains(&suggestion.text.as_str()),
                "pattern {pattern:?} offered {:?}",
                suggestion.text
            );
        }
    }
}

#[rstest]
fn used_tags_are_never_suggested_again(provider: MemoryProvider) {
    for pattern in ["{noun:+animal +", "{noun:-animal +", "{noun:+animal -plant +"] {
        let cursor = pattern.chars().count();
        let suggestions = suggest(pattern, cursor, &provider).unwrap();
        assert!(
            !texts(&suggestions).contains(&"animal"),
            "pattern {pattern:?}"
        );
    }
}

#[rstest]
fn replace_ranges_stay_within_bounds(provider: MemoryProvider) {
    let patterns = [
        ("", 0usize),
        ("{", 1),
        ("{a", 2),
        ("{noun", 5),
        ("{noun:", 6),
        ("{noun:+pl", 9),
        ("{number:5", 9),
        ("{special:3", 10),
        ("literal text", 6),
        ("{noun:+animal +", 15),
    ];
    for (pattern, cursor) in patterns {
        let len = pattern.chars().count();
        for suggestion in suggest(pattern, cursor, &provider).unwrap() {
            let range = &suggestion.replace_range;
            assert!(range.start <= range.end, "{pattern:?}: {suggestion:?}");
            assert!(range.end <= cursor, "{pattern:?}: {suggestion:?}");
            assert!(range.end <= len, "{pattern:?}: {suggestion:?}");
        }
    }
}

#[rstest]
fn suggestions_are_deterministic(provider: MemoryProvider) {
    for (pattern, cursor) in [("{", 1usize), ("{a", 2), ("{noun:+", 7), ("{number:5", 9)] {
        let first = suggest(pattern, cursor, &provider).unwrap();
        let second = suggest(pattern, cursor, &provider).unwrap();
        assert_eq!(first, second, "pattern {pattern:?}");
    }
}

#[rstest]
fn cursor_boundaries(provider: MemoryProvider) {
    // At offset zero the cursor is outside any placeholder.
    let at_start = suggest("{noun}", 0, &provider).unwrap();
    assert_eq!(texts(&at_start), ["{"]);

    // Past the end the cursor clamps to the end.
    let clamped = suggest("{a", 100, &provider).unwrap();
    assert_eq!(clamped, suggest("{a", 2, &provider).unwrap());

    // Empty patterns still offer a placeholder opener.
    let empty = suggest("", 0, &provider).unwrap();
    assert_eq!(texts(&empty), ["{"]);
}

#[rstest]
fn tag_descriptions_come_from_the_catalog(provider: MemoryProvider) {
    let suggestions = suggest("{noun:+", 7, &provider).unwrap();
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].description.as_deref(), Some("animal words"));
}

#[rstest]
fn kind_matching_is_case_insensitive(provider: MemoryProvider) {
    let suggestions = suggest("{NOUN:+", 7, &provider).unwrap();
    assert!(texts(&suggestions).contains(&"animal"));
}

#[rstest]
fn unknown_dictionary_degrades_to_no_tags(provider: MemoryProvider) {
    let suggestions = suggest("{mystery:+", 10, &provider).unwrap();
    assert!(suggestions.is_empty());
}
