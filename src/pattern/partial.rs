//! Partial pattern parser.
//!
//! Scans an arbitrary prefix of a pattern and reports where parsing halted:
//! the deepest state reached, the element under construction, and the token
//! classes that could legally continue the input. Unlike the full parser it
//! never fails on mere incompleteness; a definite syntax error is reported
//! through `is_valid`/`error_message` while still returning the deepest
//! state.

use serde::Serialize;

use super::ast::{
    CompareOp, NumberBase, NumberGen, PatternElement, Selector, SizeLimit, SpecialCharGen,
};
use super::cursor::{Cursor, is_identifier_char, is_identifier_start};
use super::expected::{ExpectedToken, ParserState, expected_for};

/// Where a partial parse stopped and what may come next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParserContextInfo {
    pub state: ParserState,
    /// 0-based character offset where scanning halted.
    pub position: usize,
    /// The input up to `position`.
    pub parsed_so_far: String,
    pub expected_next: Vec<ExpectedToken>,
    /// Most recent identifier or number consumed.
    pub last_parsed_token: Option<String>,
    pub is_valid: bool,
    pub error_message: Option<String>,
    /// The element under construction when scanning halted inside a
    /// placeholder.
    pub partial_element: Option<PatternElement>,
}

/// Scan a prefix of a pattern and describe where parsing halted.
pub fn parse_partial(input: &str) -> ParserContextInfo {
    Scanner {
        cursor: Cursor::new(input),
    }
    .run()
}

/// The expected-token set at the end of `input`.
pub fn expected_next(input: &str) -> Vec<ExpectedToken> {
    parse_partial(input).expected_next
}

/// The longest prefix of `input` for which the partial parser reaches a
/// recognized state; equals `input` when the whole input is well-formed or
/// merely incomplete.
pub fn valid_prefix(input: &str) -> &str {
    let mut prefix = input;
    loop {
        let ctx = parse_partial(prefix);
        if ctx.is_valid {
            return prefix;
        }
        let stop = byte_offset(prefix, ctx.position);
        prefix = if stop < prefix.len() {
            &prefix[..stop]
        } else {
            // The error position sits at the end of the prefix (e.g. a bad
            // range detected after its last digit); back off one character.
            match prefix.char_indices().last() {
                Some((i, _)) => &prefix[..i],
                None => return "",
            }
        };
    }
}

fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices().nth(char_offset).map_or(s.len(), |(i, _)| i)
}

fn unexpected(c: char) -> String {
    format!("unexpected character {c:?}")
}

/// Scanning the shared tag/size/options body: inside a selector the body
/// closes with `}` and accumulates into a partial element; inside the global
/// settings block it closes with `]` and there is no element to build.
struct BodyHost {
    selector: Option<Selector>,
}

impl BodyHost {
    fn closer(&self) -> char {
        if self.selector.is_some() { '}' } else { ']' }
    }

    fn close_state(&self) -> ParserState {
        if self.selector.is_some() {
            ParserState::ExpectingCloseBrace
        } else {
            ParserState::ExpectingCloseBracket
        }
    }

    fn partial(&self) -> Option<PatternElement> {
        self.selector.clone().map(PatternElement::Selector)
    }

    fn add_tag(&mut self, include: bool, tag: String) {
        if let Some(selector) = &mut self.selector {
            if include {
                selector.include_tags.push(tag);
            } else {
                selector.exclude_tags.push(tag);
            }
        }
    }

    fn set_size_limit(&mut self, limit: SizeLimit) {
        if let Some(selector) = &mut self.selector {
            selector.size_limit = Some(limit);
        }
    }

    fn insert_option(&mut self, key: String, value: String) {
        if let Some(selector) = &mut self.selector {
            selector.options.insert(key, value);
        }
    }
}

struct Scanner<'a> {
    cursor: Cursor<'a>,
}

impl Scanner<'_> {
    fn run(mut self) -> ParserContextInfo {
        loop {
            match self.cursor.peek() {
                None => return self.halt(ParserState::OutsidePlaceholder, None),
                Some('{') => {
                    self.cursor.advance();
                    if let Some(ctx) = self.scan_placeholder() {
                        return ctx;
                    }
                }
                Some('[') => {
                    self.cursor.advance();
                    return self.scan_global_settings();
                }
                Some(c @ ('}' | ']')) => {
                    return self.halt_invalid(ParserState::Invalid, None, unexpected(c));
                }
                Some('\\') => {
                    self.cursor.advance();
                    match self.cursor.peek() {
                        None => return self.halt(ParserState::Incomplete, None),
                        Some('{' | '}' | '\\') => {
                            self.cursor.advance();
                        }
                        Some(_) => {
                            return self.halt_invalid(
                                ParserState::Invalid,
                                None,
                                "invalid escape sequence".into(),
                            );
                        }
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Scan one `{...}` placeholder; the opening brace is already consumed.
    /// Returns `None` when the placeholder closed and scanning may continue.
    fn scan_placeholder(&mut self) -> Option<ParserContextInfo> {
        if self.cursor.is_at_end() {
            return Some(self.halt(ParserState::InPlaceholder, None));
        }
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => return Some(self.halt(ParserState::ExpectingIdentifier, None)),
            Some(c) if !is_identifier_start(c) => {
                return Some(self.halt_invalid(
                    ParserState::ExpectingIdentifier,
                    None,
                    unexpected(c),
                ));
            }
            Some(_) => {}
        }
        let name = self.scan_identifier();
        match name.as_str() {
            "number" => self.scan_number_gen(),
            "special" => self.scan_special_gen(),
            _ => self.scan_selector(name),
        }
    }

    fn scan_selector(&mut self, kind: String) -> Option<ParserContextInfo> {
        let mut selector = Selector::new(kind);
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::PartialSelector,
                Some(PatternElement::Selector(selector)),
            ));
        }
        if self.cursor.match_char('@') {
            if self.cursor.is_at_end() {
                return Some(self.halt(
                    ParserState::ExpectingLanguageIdentifier,
                    Some(PatternElement::Selector(selector)),
                ));
            }
            match self.cursor.peek() {
                Some(c) if is_identifier_start(c) => {
                    selector.language = Some(self.scan_identifier());
                }
                Some(c) => {
                    return Some(self.halt_invalid(
                        ParserState::ExpectingLanguageIdentifier,
                        Some(PatternElement::Selector(selector)),
                        unexpected(c),
                    ));
                }
                None => {}
            }
            if self.cursor.is_at_end() {
                return Some(self.halt(
                    ParserState::ExpectingAfterLanguage,
                    Some(PatternElement::Selector(selector)),
                ));
            }
        }
        if self.cursor.match_char(':') {
            return self.scan_settings_body(BodyHost {
                selector: Some(selector),
            });
        }
        self.finish_placeholder(Some(PatternElement::Selector(selector)))
    }

    /// Scan the tag/size/options body shared by selectors and the global
    /// settings block, up to and including the closing delimiter.
    fn scan_settings_body(&mut self, mut host: BodyHost) -> Option<ParserContextInfo> {
        let mut size_seen = false;
        let mut seen_tags: Vec<String> = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            let neutral = if size_seen {
                ParserState::ExpectingTagOnly
            } else {
                ParserState::ExpectingTagOrSizeLimit
            };
            match self.cursor.peek() {
                None => return Some(self.halt(neutral, host.partial())),
                Some(sign @ ('+' | '-')) => {
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Some(self.halt(ParserState::ExpectingTagIdentifier, host.partial()));
                    }
                    if !self.cursor.peek().is_some_and(is_identifier_start) {
                        return Some(self.halt_invalid(
                            ParserState::ExpectingTagIdentifier,
                            host.partial(),
                            "empty tag".into(),
                        ));
                    }
                    let tag = self.scan_identifier();
                    if seen_tags.contains(&tag) {
                        return Some(self.halt_invalid(
                            neutral,
                            host.partial(),
                            format!("duplicate tag `{tag}`"),
                        ));
                    }
                    seen_tags.push(tag.clone());
                    host.add_tag(sign == '+', tag);
                }
                Some('<' | '>' | '=' | '!') => {
                    if size_seen {
                        return Some(self.halt_invalid(
                            ParserState::ExpectingTagOnly,
                            host.partial(),
                            "only one size limit is allowed".into(),
                        ));
                    }
                    let op = match self.scan_compare_op(&host) {
                        Ok(op) => op,
                        Err(ctx) => return Some(ctx),
                    };
                    self.cursor.skip_whitespace();
                    match self.cursor.peek() {
                        None => {
                            return Some(self.halt(ParserState::ExpectingSizeLimit, host.partial()));
                        }
                        Some(c) if !c.is_ascii_digit() => {
                            return Some(self.halt_invalid(
                                ParserState::ExpectingSizeLimit,
                                host.partial(),
                                unexpected(c),
                            ));
                        }
                        Some(_) => {}
                    }
                    match self.scan_number() {
                        Ok(value) => {
                            size_seen = true;
                            host.set_size_limit(SizeLimit { op, value });
                        }
                        Err(message) => {
                            return Some(self.halt_invalid(
                                ParserState::ExpectingSizeLimit,
                                host.partial(),
                                message,
                            ));
                        }
                    }
                }
                Some(',') => {
                    self.cursor.advance();
                    return self.scan_options(host, true);
                }
                Some(c) if is_identifier_start(c) => {
                    return self.scan_options(host, false);
                }
                Some(c) if c == host.closer() => {
                    self.cursor.advance();
                    return None;
                }
                Some(c) => {
                    return Some(self.halt_invalid(neutral, host.partial(), unexpected(c)));
                }
            }
        }
    }

    /// Greedy comparison-operator scan. Halts (via `Err`) at end of input or
    /// on a lone `=`/`!` that cannot complete into `==`/`!=`.
    fn scan_compare_op(&mut self, host: &BodyHost) -> Result<CompareOp, ParserContextInfo> {
        match self.cursor.advance() {
            Some('<') => {
                if self.cursor.is_at_end() {
                    return Err(self.halt(ParserState::ExpectingSizeLimit, host.partial()));
                }
                Ok(if self.cursor.match_char('=') {
                    CompareOp::Le
                } else {
                    CompareOp::Lt
                })
            }
            Some('>') => {
                if self.cursor.is_at_end() {
                    return Err(self.halt(ParserState::ExpectingSizeLimit, host.partial()));
                }
                Ok(if self.cursor.match_char('=') {
                    CompareOp::Ge
                } else {
                    CompareOp::Gt
                })
            }
            Some(c @ ('=' | '!')) => {
                if self.cursor.is_at_end() {
                    return Err(self.halt(ParserState::ExpectingSizeLimit, host.partial()));
                }
                if self.cursor.match_char('=') {
                    Ok(if c == '=' { CompareOp::Eq } else { CompareOp::Ne })
                } else {
                    Err(self.halt_invalid(
                        ParserState::ExpectingSizeLimit,
                        host.partial(),
                        format!("`{c}` must be followed by `=`"),
                    ))
                }
            }
            Some(c) => Err(self.halt_invalid(
                ParserState::ExpectingSizeLimit,
                host.partial(),
                unexpected(c),
            )),
            None => Err(self.halt(ParserState::ExpectingSizeLimit, host.partial())),
        }
    }

    /// Scan the options list; entered either after a `,` or directly at an
    /// option key.
    fn scan_options(&mut self, mut host: BodyHost, after_comma: bool) -> Option<ParserContextInfo> {
        let mut after_comma = after_comma;
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Some(self.halt(ParserState::ExpectingOption, host.partial())),
                Some(c) if is_identifier_start(c) => {}
                Some(c) if c == host.closer() && after_comma => {
                    return Some(self.halt_invalid(
                        ParserState::ExpectingOption,
                        host.partial(),
                        "trailing comma".into(),
                    ));
                }
                Some(c) => {
                    return Some(self.halt_invalid(
                        ParserState::ExpectingOption,
                        host.partial(),
                        unexpected(c),
                    ));
                }
            }
            let key = self.scan_identifier();
            if self.cursor.is_at_end() {
                return Some(self.halt(ParserState::ExpectingOption, host.partial()));
            }
            if !self.cursor.match_char('=') {
                return Some(self.halt_invalid(
                    ParserState::ExpectingOption,
                    host.partial(),
                    format!("option `{key}` is missing `=`"),
                ));
            }
            let value = self.scan_option_value();
            host.insert_option(key, value);
            if self.cursor.is_at_end() {
                return Some(self.halt(host.close_state(), host.partial()));
            }
            if self.cursor.match_char(',') {
                after_comma = true;
                continue;
            }
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None => return Some(self.halt(host.close_state(), host.partial())),
                Some(c) if c == host.closer() => {
                    self.cursor.advance();
                    return None;
                }
                Some(c) => {
                    return Some(self.halt_invalid(host.close_state(), host.partial(), unexpected(c)));
                }
            }
        }
    }

    fn scan_number_gen(&mut self) -> Option<ParserContextInfo> {
        let mut gen = NumberGen::default();
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::PartialNumberGen,
                Some(PatternElement::Number(gen)),
            ));
        }
        if !self.cursor.match_char(':') {
            return self.finish_placeholder(Some(PatternElement::Number(gen)));
        }
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::ExpectingNumberLength,
                Some(PatternElement::Number(gen)),
            ));
        }
        match self.cursor.peek() {
            Some(c) if !c.is_ascii_digit() => {
                return Some(self.halt_invalid(
                    ParserState::ExpectingNumberLength,
                    Some(PatternElement::Number(gen)),
                    unexpected(c),
                ));
            }
            _ => {}
        }
        match self.scan_number() {
            Ok(value) => gen.max_length = value,
            Err(message) => {
                return Some(self.halt_invalid(
                    ParserState::ExpectingNumberLength,
                    Some(PatternElement::Number(gen)),
                    message,
                ));
            }
        }
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::ExpectingNumberBase,
                Some(PatternElement::Number(gen)),
            ));
        }
        match self.cursor.peek() {
            Some(',') => {
                self.cursor.advance();
                self.cursor.skip_whitespace();
                if self.cursor.is_at_end() {
                    return Some(self.halt(
                        ParserState::ExpectingNumberBase,
                        Some(PatternElement::Number(gen)),
                    ));
                }
                match self.cursor.peek() {
                    Some(c) if !is_identifier_start(c) => {
                        return Some(self.halt_invalid(
                            ParserState::ExpectingNumberBase,
                            Some(PatternElement::Number(gen)),
                            unexpected(c),
                        ));
                    }
                    _ => {}
                }
                let name = self.scan_identifier();
                match NumberBase::from_long(&name) {
                    Some(base) => {
                        gen.base = base;
                        self.finish_placeholder(Some(PatternElement::Number(gen)))
                    }
                    None if self.cursor.is_at_end() && is_long_base_prefix(&name) => Some(
                        self.halt(
                            ParserState::ExpectingNumberBase,
                            Some(PatternElement::Number(gen)),
                        ),
                    ),
                    None => Some(self.halt_invalid(
                        ParserState::ExpectingNumberBase,
                        Some(PatternElement::Number(gen)),
                        format!("unknown number base `{name}`"),
                    )),
                }
            }
            Some(c) => {
                if let Some(base) = NumberBase::from_short(c) {
                    self.cursor.advance();
                    gen.base = base;
                    if self.cursor.peek() == Some(',') {
                        return Some(self.halt_invalid(
                            ParserState::ExpectingCloseBrace,
                            Some(PatternElement::Number(gen)),
                            "only one number base is allowed".into(),
                        ));
                    }
                }
                self.finish_placeholder(Some(PatternElement::Number(gen)))
            }
            None => self.finish_placeholder(Some(PatternElement::Number(gen))),
        }
    }

    fn scan_special_gen(&mut self) -> Option<ParserContextInfo> {
        let mut gen = SpecialCharGen::default();
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::PartialSpecialGen,
                Some(PatternElement::Special(gen)),
            ));
        }
        if !self.cursor.match_char(':') {
            return self.finish_placeholder(Some(PatternElement::Special(gen)));
        }
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::ExpectingSpecialLength,
                Some(PatternElement::Special(gen)),
            ));
        }
        match self.cursor.peek() {
            Some(c) if !c.is_ascii_digit() => {
                return Some(self.halt_invalid(
                    ParserState::ExpectingSpecialLength,
                    Some(PatternElement::Special(gen)),
                    unexpected(c),
                ));
            }
            _ => {}
        }
        match self.scan_number() {
            Ok(value) => {
                gen.min_length = value;
                gen.max_length = value;
            }
            Err(message) => {
                return Some(self.halt_invalid(
                    ParserState::ExpectingSpecialLength,
                    Some(PatternElement::Special(gen)),
                    message,
                ));
            }
        }
        if gen.min_length == 0 {
            return Some(self.halt_invalid(
                ParserState::ExpectingSpecialRange,
                Some(PatternElement::Special(gen)),
                "special length must be positive".into(),
            ));
        }
        if self.cursor.is_at_end() {
            return Some(self.halt(
                ParserState::ExpectingSpecialRange,
                Some(PatternElement::Special(gen)),
            ));
        }
        if self.cursor.match_char('-') {
            if self.cursor.is_at_end() {
                return Some(self.halt(
                    ParserState::ExpectingSpecialRange,
                    Some(PatternElement::Special(gen)),
                ));
            }
            match self.cursor.peek() {
                Some(c) if !c.is_ascii_digit() => {
                    return Some(self.halt_invalid(
                        ParserState::ExpectingSpecialRange,
                        Some(PatternElement::Special(gen)),
                        unexpected(c),
                    ));
                }
                _ => {}
            }
            match self.scan_number() {
                Ok(value) => gen.max_length = value,
                Err(message) => {
                    return Some(self.halt_invalid(
                        ParserState::ExpectingSpecialRange,
                        Some(PatternElement::Special(gen)),
                        message,
                    ));
                }
            }
            if gen.min_length > gen.max_length {
                return Some(self.halt_invalid(
                    ParserState::ExpectingCloseBrace,
                    Some(PatternElement::Special(gen)),
                    format!("invalid range {}-{}", gen.min_length, gen.max_length),
                ));
            }
        }
        self.finish_placeholder(Some(PatternElement::Special(gen)))
    }

    fn scan_global_settings(&mut self) -> ParserContextInfo {
        self.cursor.skip_whitespace();
        if self.cursor.is_at_end() {
            return self.halt(ParserState::InGlobalSettings, None);
        }
        if self.cursor.match_char('@') {
            if self.cursor.is_at_end() {
                return self.halt(ParserState::ExpectingLanguageIdentifier, None);
            }
            match self.cursor.peek() {
                Some(c) if !is_identifier_start(c) => {
                    return self.halt_invalid(
                        ParserState::ExpectingLanguageIdentifier,
                        None,
                        unexpected(c),
                    );
                }
                _ => {}
            }
            self.scan_identifier();
            if self.cursor.is_at_end() {
                return self.halt(ParserState::InGlobalSettings, None);
            }
        }
        match self.scan_settings_body(BodyHost { selector: None }) {
            Some(ctx) => ctx,
            None => {
                self.cursor.skip_whitespace();
                match self.cursor.peek() {
                    None => self.halt(ParserState::Complete, None),
                    Some(c) => self.halt_invalid(
                        ParserState::Invalid,
                        None,
                        format!("unexpected {c:?} after settings block"),
                    ),
                }
            }
        }
    }

    /// Expect optional whitespace and the closing brace. Returns `None` when
    /// the placeholder closed.
    fn finish_placeholder(&mut self, partial: Option<PatternElement>) -> Option<ParserContextInfo> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Some(self.halt(ParserState::ExpectingCloseBrace, partial)),
            Some('}') => {
                self.cursor.advance();
                None
            }
            Some(c) => {
                Some(self.halt_invalid(ParserState::ExpectingCloseBrace, partial, unexpected(c)))
            }
        }
    }

    /// Consume an identifier; the caller has verified an identifier-start
    /// character is next.
    fn scan_identifier(&mut self) -> String {
        self.cursor.parse_identifier().unwrap_or_default()
    }

    /// Consume a possibly empty run of `[A-Za-z0-9_]`.
    fn scan_option_value(&mut self) -> String {
        let mut value = String::new();
        while let Some(c) = self.cursor.peek() {
            if !is_identifier_char(c) {
                break;
            }
            value.push(c);
            self.cursor.advance();
        }
        value
    }

    /// Consume digits; the caller has verified a digit is next, so the only
    /// remaining failure is numeric overflow.
    fn scan_number(&mut self) -> Result<u32, String> {
        self.cursor.parse_number().map_err(|e| e.to_string())
    }

    fn halt(&self, state: ParserState, partial_element: Option<PatternElement>) -> ParserContextInfo {
        self.context(state, partial_element, true, None)
    }

    fn halt_invalid(
        &self,
        state: ParserState,
        partial_element: Option<PatternElement>,
        message: String,
    ) -> ParserContextInfo {
        self.context(state, partial_element, false, Some(message))
    }

    fn context(
        &self,
        state: ParserState,
        partial_element: Option<PatternElement>,
        is_valid: bool,
        error_message: Option<String>,
    ) -> ParserContextInfo {
        let position = self.cursor.position();
        ParserContextInfo {
            state,
            position,
            parsed_so_far: self.cursor.slice(0, position),
            expected_next: expected_for(state).to_vec(),
            last_parsed_token: self.cursor.last_token().map(str::to_string),
            is_valid,
            error_message,
            partial_element,
        }
    }
}

fn is_long_base_prefix(name: &str) -> bool {
    !name.is_empty()
        && NumberBase::LONG_NAMES
            .iter()
            .any(|long| long.starts_with(name))
}
