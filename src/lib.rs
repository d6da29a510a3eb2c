//! Slug pattern language front-end.
//!
//! Patterns mix literal text with `{...}` placeholders that reference
//! dictionaries (`noun`, `adjective`, ...) or the built-in `number` and
//! `special` generators, optionally followed by a `[...]` block of
//! document-wide defaults:
//!
//! ```text
//! {adjective}-{noun@en:+animal -nsfw >3,case=lower}-{number:5,hex}
//! ```
//!
//! The crate provides the pieces an interactive pattern editor needs: a
//! [full parser](parse) producing an abstract representation, a
//! [partial parser](parse_partial) that describes exactly where a prefix
//! stopped and what may come next, and a [suggestion engine](suggest)
//! emitting ranked completions with replace ranges.

pub mod pattern;
pub mod provider;
pub mod suggest;

pub use pattern::{ParseError, ParsedPattern, ParserContextInfo};
pub use suggest::{Suggestion, SuggestionEngine, SuggestionKind};

use pattern::ExpectedToken;
use provider::{DictionaryProvider, ProviderError};

/// Parse a complete pattern into its structured representation.
pub fn parse(pattern: &str) -> Result<ParsedPattern, ParseError> {
    pattern::parse(pattern)
}

/// Whether `pattern` is a well-formed complete pattern.
pub fn validate(pattern: &str) -> bool {
    pattern::validate(pattern)
}

/// Parse an arbitrary prefix of a pattern, reporting where parsing stopped
/// and which token classes could continue it.
pub fn parse_partial(pattern: &str) -> ParserContextInfo {
    pattern::parse_partial(pattern)
}

/// True iff [`parse`] would succeed.
pub fn is_complete(pattern: &str) -> bool {
    pattern::validate(pattern)
}

/// The longest prefix of `pattern` the partial parser accepts; equals
/// `pattern` when it is complete or merely unfinished.
pub fn valid_prefix(pattern: &str) -> &str {
    pattern::valid_prefix(pattern)
}

/// The token classes that may legally continue `pattern`.
pub fn expected_next(pattern: &str) -> Vec<ExpectedToken> {
    pattern::expected_next(pattern)
}

/// Completion suggestions for `pattern` at character offset `cursor`,
/// consulting `provider` for dictionaries and tags.
pub fn suggest(
    pattern: &str,
    cursor: usize,
    provider: &dyn DictionaryProvider,
) -> Result<Vec<Suggestion>, ProviderError> {
    SuggestionEngine::new(provider).suggest(pattern, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MemoryProvider;
    use rstest::rstest;

    #[rstest]
    #[case("{noun}", true)]
    #[case("{noun", false)]
    #[case("", true)]
    fn is_complete_matches_parse(#[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(is_complete(pattern), expected);
        assert_eq!(parse(pattern).is_ok(), expected);
    }

    #[test]
    fn facade_suggest_consults_provider() {
        let provider = MemoryProvider::new(vec![], vec![]);
        let suggestions = suggest("plain", 3, &provider).unwrap();
        assert_eq!(suggestions[0].text, "{");
    }
}
