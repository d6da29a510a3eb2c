//! Context-aware completion for slug patterns.
//!
//! Given a pattern and a cursor offset, localizes the cursor to a
//! placeholder, classifies the region it sits in (generator name, tags,
//! size limit, options, generator settings), and emits ranked suggestions
//! with the exact character range each one replaces. Parser errors never
//! surface here; uncertain input degrades to a narrower suggestion set.

use std::collections::HashSet;
use std::ops::Range;

use log::debug;
use serde::Serialize;

use crate::pattern::NumberBase;
use crate::provider::{DictionaryProvider, ProviderError, TagInfo};

use super::case;

/// Category of a completion suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Generator,
    Tag,
    Operator,
    Symbol,
    Language,
    Base,
}

/// One completion suggestion. Accepting it replaces the half-open character
/// range `replace_range` with `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub replace_range: Range<usize>,
}

impl Suggestion {
    fn new(text: impl Into<String>, kind: SuggestionKind, replace_range: Range<usize>) -> Self {
        Self {
            text: text.into(),
            kind,
            description: None,
            replace_range,
        }
    }

    fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn symbol(text: impl Into<String>, at: usize) -> Self {
        Self::new(text, SuggestionKind::Symbol, at..at)
    }

    fn operator(text: impl Into<String>, at: usize) -> Self {
        Self::new(text, SuggestionKind::Operator, at..at)
    }
}

/// Completion engine over a dictionary catalog.
pub struct SuggestionEngine<'a> {
    provider: &'a dyn DictionaryProvider,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(provider: &'a dyn DictionaryProvider) -> Self {
        Self { provider }
    }

    /// Suggest completions for `pattern` at character offset `cursor`
    /// (clamped to the pattern length).
    pub fn suggest(&self, pattern: &str, cursor: usize) -> Result<Vec<Suggestion>, ProviderError> {
        let chars: Vec<char> = pattern.chars().collect();
        let cursor = cursor.min(chars.len());

        // Walk back to the nearest `{`; a `}` on the way means the cursor is
        // outside any placeholder.
        let mut placeholder_start = None;
        for i in (0..cursor).rev() {
            match chars[i] {
                '}' => break,
                '{' => {
                    placeholder_start = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let Some(start) = placeholder_start else {
            debug!("cursor {cursor} is outside any placeholder");
            return Ok(vec![Suggestion::symbol("{", cursor)]);
        };

        let end = (cursor..chars.len())
            .find(|&i| chars[i] == '}')
            .unwrap_or(chars.len());
        let content = &chars[start + 1..end];
        let relative = cursor - start - 1;

        match content.iter().position(|&c| c == ':') {
            Some(colon) if relative > colon => {
                let name: String = content[..colon].iter().collect();
                let settings: String = content[colon + 1..].iter().collect();
                self.settings_suggestions(name.trim(), &settings, relative - colon - 1, cursor)
            }
            _ => {
                let input: String = content[..relative].iter().collect();
                self.generator_suggestions(input.trim(), start, cursor)
            }
        }
    }

    /// Completions for the generator-name region of a placeholder.
    fn generator_suggestions(
        &self,
        input: &str,
        placeholder_start: usize,
        cursor: usize,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        debug!("generator-name completion for {input:?}");
        if input.contains('@') {
            // Language region; the catalog has no language inventory.
            return Ok(Vec::new());
        }
        let name_range = (placeholder_start + 1)..cursor;
        if input == "number" {
            return Ok(vec![Suggestion::symbol(":", cursor)]);
        }
        if input == "special" {
            return Ok(vec![
                Suggestion::symbol("}", cursor),
                Suggestion::symbol(":", cursor),
            ]);
        }

        let kinds = self.dictionary_kinds()?;
        if input.is_empty() {
            let mut out = vec![
                Suggestion::new("number", SuggestionKind::Generator, name_range.clone())
                    .with_description("built-in generator"),
                Suggestion::new("special", SuggestionKind::Generator, name_range.clone())
                    .with_description("built-in generator"),
            ];
            for kind in &kinds {
                for variant in [
                    kind.to_ascii_lowercase(),
                    kind.to_ascii_uppercase(),
                    case::titlecase(kind),
                    case::alternating(kind, false),
                ] {
                    out.push(Suggestion::new(
                        variant,
                        SuggestionKind::Generator,
                        name_range.clone(),
                    ));
                }
            }
            return Ok(sorted_generators(out));
        }

        if kinds.iter().any(|kind| kind.eq_ignore_ascii_case(input)) {
            return Ok(vec![
                Suggestion::symbol("}", cursor),
                Suggestion::symbol("@", cursor),
                Suggestion::symbol(":", cursor),
            ]);
        }

        let lower_input = input.to_ascii_lowercase();
        let mut out = Vec::new();
        for kind in &kinds {
            if kind.to_ascii_lowercase().starts_with(&lower_input) {
                for completion in case::completions(input, kind) {
                    out.push(Suggestion::new(
                        completion,
                        SuggestionKind::Generator,
                        name_range.clone(),
                    ));
                }
            }
        }
        for builtin in ["number", "special"] {
            if builtin.starts_with(&lower_input) {
                out.push(
                    Suggestion::new(builtin, SuggestionKind::Generator, name_range.clone())
                        .with_description("built-in generator"),
                );
            }
        }
        Ok(sorted_generators(out))
    }

    /// Completions after the `:` of a placeholder, dispatched on the
    /// generator the placeholder names.
    fn settings_suggestions(
        &self,
        name: &str,
        settings: &str,
        relative: usize,
        cursor: usize,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let fragment: String = settings.chars().take(relative).collect();
        match name {
            "number" => Ok(number_settings_suggestions(&fragment, cursor)),
            "special" => Ok(special_settings_suggestions(&fragment, cursor)),
            _ => {
                let kind = name.split('@').next().unwrap_or(name).trim();
                self.selector_settings_suggestions(kind, settings, &fragment, cursor)
            }
        }
    }

    fn selector_settings_suggestions(
        &self,
        kind: &str,
        settings: &str,
        fragment: &str,
        cursor: usize,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        debug!("selector settings completion for kind {kind:?}, fragment {fragment:?}");
        if ends_with_completed_op(fragment) {
            // Waiting for the size-limit digits.
            return Ok(Vec::new());
        }
        if ends_with_lone_op(fragment) {
            return Ok(vec![Suggestion::operator("=", cursor)]);
        }
        let size_done = has_size_constraint(fragment);
        if let Some(partial) = partial_tag(fragment) {
            return self.tag_suggestions(kind, settings, &partial, size_done, cursor);
        }
        if size_done {
            return Ok(operator_suggestions(true, cursor));
        }
        if fragment.is_empty() || fragment.ends_with(char::is_whitespace) {
            return Ok(operator_suggestions(false, cursor));
        }
        self.tag_suggestions(kind, settings, "", size_done, cursor)
    }

    /// Tag completions: remaining tags of the dictionary, minus those the
    /// placeholder already uses, filtered by the partial tag at the cursor.
    fn tag_suggestions(
        &self,
        kind: &str,
        settings: &str,
        partial: &str,
        size_done: bool,
        cursor: usize,
    ) -> Result<Vec<Suggestion>, ProviderError> {
        let tags = self.tags_for(kind)?;
        let used = used_tags(settings);
        let remaining: Vec<&TagInfo> = tags
            .iter()
            .filter(|t| !used.contains(&t.tag.to_ascii_lowercase()))
            .collect();

        if partial.is_empty() {
            return Ok(remaining
                .iter()
                .map(|t| tag_suggestion(t, cursor..cursor))
                .collect());
        }
        if tags.iter().any(|t| t.tag == partial) {
            // The user just finished a tag: more tags, a size constraint
            // (unless one exists), or close.
            return Ok(operator_suggestions(size_done, cursor));
        }
        let lower_partial = partial.to_ascii_lowercase();
        let replace = (cursor - partial.chars().count())..cursor;
        Ok(remaining
            .iter()
            .filter(|t| t.tag.to_ascii_lowercase().starts_with(&lower_partial))
            .map(|t| tag_suggestion(t, replace.clone()))
            .collect())
    }

    fn dictionary_kinds(&self) -> Result<Vec<String>, ProviderError> {
        Ok(self
            .provider
            .dictionaries()?
            .into_iter()
            .map(|d| d.kind)
            .collect())
    }

    fn tags_for(&self, kind: &str) -> Result<Vec<TagInfo>, ProviderError> {
        Ok(self
            .provider
            .tags()?
            .into_iter()
            .filter(|t| t.kind.eq_ignore_ascii_case(kind))
            .collect())
    }
}

fn tag_suggestion(tag: &TagInfo, replace_range: Range<usize>) -> Suggestion {
    let suggestion = Suggestion::new(&tag.tag, SuggestionKind::Tag, replace_range);
    if tag.description.is_empty() {
        suggestion
    } else {
        suggestion.with_description(&tag.description)
    }
}

/// The operator set offered at a neutral settings position: more tags, a
/// size constraint unless one exists already, or close.
fn operator_suggestions(size_done: bool, cursor: usize) -> Vec<Suggestion> {
    let mut out = vec![Suggestion::operator("+", cursor), Suggestion::operator("-", cursor)];
    if !size_done {
        for op in ["==", "!=", "<", "<=", ">", ">="] {
            out.push(Suggestion::operator(op, cursor));
        }
    }
    out.push(Suggestion::symbol("}", cursor));
    out
}

/// Settings completions for `{number:...}`.
fn number_settings_suggestions(fragment: &str, cursor: usize) -> Vec<Suggestion> {
    let digits = fragment.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return Vec::new();
    }
    let rest: String = fragment.chars().skip(digits).collect();
    if rest.is_empty() {
        return [('d', "dec"), ('x', "hex"), ('X', "HEX"), ('r', "roman"), ('R', "ROMAN")]
            .into_iter()
            .map(|(letter, long)| {
                Suggestion::new(letter.to_string(), SuggestionKind::Base, cursor..cursor)
                    .with_description(long)
            })
            .collect();
    }
    let mut rest_chars = rest.chars();
    if let (Some(letter), None) = (rest_chars.next(), rest_chars.next()) {
        if NumberBase::from_short(letter).is_some() {
            return vec![Suggestion::symbol("}", cursor)];
        }
    }
    if let Some(after_comma) = rest.strip_prefix(',') {
        let partial = after_comma.trim_start();
        if NumberBase::from_long(partial).is_some() {
            return vec![Suggestion::symbol("}", cursor)];
        }
        let replace = (cursor - partial.chars().count())..cursor;
        return NumberBase::LONG_NAMES
            .iter()
            .filter(|long| long.starts_with(partial))
            .map(|long| Suggestion::new(*long, SuggestionKind::Base, replace.clone()))
            .collect();
    }
    Vec::new()
}

/// Settings completions for `{special:...}`.
fn special_settings_suggestions(fragment: &str, cursor: usize) -> Vec<Suggestion> {
    let digits = fragment.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return Vec::new();
    }
    let rest: String = fragment.chars().skip(digits).collect();
    if rest.is_empty() {
        return vec![Suggestion::symbol("-", cursor), Suggestion::symbol("}", cursor)];
    }
    match rest.strip_prefix('-') {
        Some("") => Vec::new(),
        Some(second) if second.chars().all(|c| c.is_ascii_digit()) => {
            vec![Suggestion::symbol("}", cursor)]
        }
        _ => Vec::new(),
    }
}

/// Stable sort for generator-name completions: built-ins, then lowercase,
/// uppercase, titlecase, and mixed-case groups, lexicographic within each.
fn sorted_generators(mut suggestions: Vec<Suggestion>) -> Vec<Suggestion> {
    suggestions.sort_by_key(|s| (case::case_group(&s.text), s.text.clone()));
    suggestions.dedup_by(|a, b| a.text == b.text);
    suggestions
}

/// True when the fragment ends in a completed two-character comparison
/// operator with no digits typed yet.
fn ends_with_completed_op(fragment: &str) -> bool {
    ["==", "!=", "<=", ">="].iter().any(|op| fragment.ends_with(op))
}

/// True when the fragment ends in a comparison-operator character that can
/// still be continued with `=`.
fn ends_with_lone_op(fragment: &str) -> bool {
    fragment
        .chars()
        .last()
        .is_some_and(|c| matches!(c, '=' | '!' | '<' | '>'))
}

/// Whether a size constraint (`[=!<>]=? \s* digits`) already appears in the
/// fragment before the cursor.
fn has_size_constraint(fragment: &str) -> bool {
    let chars: Vec<char> = fragment.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if !matches!(c, '=' | '!' | '<' | '>') {
            continue;
        }
        let mut j = i + 1;
        if chars.get(j) == Some(&'=') {
            j += 1;
        }
        while chars.get(j).is_some_and(|c| c.is_whitespace()) {
            j += 1;
        }
        if chars.get(j).is_some_and(char::is_ascii_digit) {
            return true;
        }
    }
    false
}

/// The partial tag at the end of the fragment: the `\w*` following a `+` or
/// `-` marker. `None` when the fragment does not end in a tag position.
fn partial_tag(fragment: &str) -> Option<String> {
    let chars: Vec<char> = fragment.chars().collect();
    let mut i = chars.len();
    while i > 0 && (chars[i - 1].is_ascii_alphanumeric() || chars[i - 1] == '_') {
        i -= 1;
    }
    if i > 0 && matches!(chars[i - 1], '+' | '-') {
        Some(chars[i..].iter().collect())
    } else {
        None
    }
}

/// All tags mentioned in the settings, lowercased.
fn used_tags(settings: &str) -> HashSet<String> {
    let chars: Vec<char> = settings.chars().collect();
    let mut used = HashSet::new();
    let mut i = 0;
    while i < chars.len() {
        if matches!(chars[i], '+' | '-') {
            let start = i + 1;
            let mut j = start;
            while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
                j += 1;
            }
            if j > start {
                let tag: String = chars[start..j].iter().collect();
                used.insert(tag.to_ascii_lowercase());
            }
            i = j;
        } else {
            i += 1;
        }
    }
    used
}
