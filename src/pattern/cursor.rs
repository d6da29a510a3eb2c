//! Character-indexed reader over a pattern string.
//!
//! Both parsers drive one of these. Offsets are character offsets, not byte
//! offsets, so literal runs may contain non-ASCII text without skewing error
//! positions or replace ranges.

use super::ParseError;

/// Returns true for the first character of an identifier (`[A-Za-z_]`).
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Returns true for a continuation character of an identifier (`[A-Za-z0-9_]`).
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

pub struct Cursor<'a> {
    input: &'a str,
    chars: Vec<char>,
    position: usize,
    last_token: Option<String>,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            position: 0,
            last_token: None,
        }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current 0-based character offset.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// Consume `c` if it is next; returns whether it was consumed.
    pub fn match_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume `c` or fail with a positioned error.
    pub fn expect(&mut self, c: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == c => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedChar {
                found,
                position: self.position,
            }),
            None => Err(ParseError::UnexpectedEnd {
                position: self.position,
            }),
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Consume a non-negative decimal integer. Fails unless a digit is next.
    pub fn parse_number(&mut self) -> Result<u32, ParseError> {
        let start = self.position;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
        if self.position == start {
            return Err(match self.peek() {
                Some(found) => ParseError::UnexpectedChar {
                    found,
                    position: start,
                },
                None => ParseError::UnexpectedEnd { position: start },
            });
        }
        let digits = self.slice(start, self.position);
        let value = digits.parse().map_err(|_| ParseError::Semantic {
            position: start,
            message: format!("number `{digits}` is out of range"),
        })?;
        self.last_token = Some(digits);
        Ok(value)
    }

    /// Consume an identifier (`[A-Za-z_][A-Za-z0-9_]*`). Fails unless an
    /// identifier-start character is next.
    pub fn parse_identifier(&mut self) -> Result<String, ParseError> {
        let start = self.position;
        match self.peek() {
            Some(c) if is_identifier_start(c) => self.position += 1,
            Some(found) => {
                return Err(ParseError::UnexpectedChar {
                    found,
                    position: start,
                });
            }
            None => {
                return Err(ParseError::UnexpectedEnd { position: start });
            }
        }
        while self.peek().is_some_and(is_identifier_char) {
            self.position += 1;
        }
        let ident = self.slice(start, self.position);
        self.last_token = Some(ident.clone());
        Ok(ident)
    }

    /// The most recent multi-character token consumed by `parse_number` or
    /// `parse_identifier`.
    pub fn last_token(&self) -> Option<&str> {
        self.last_token.as_deref()
    }

    /// The input between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn peek_does_not_consume() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn advance_consumes_in_order() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.advance(), None);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn match_char_consumes_only_on_match() {
        let mut cursor = Cursor::new("a");
        assert!(!cursor.match_char('b'));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.match_char('a'));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn expect_reports_found_character() {
        let mut cursor = Cursor::new("x");
        assert_eq!(
            cursor.expect('}'),
            Err(ParseError::UnexpectedChar {
                found: 'x',
                position: 0
            })
        );
    }

    #[test]
    fn expect_reports_end_of_input() {
        let mut cursor = Cursor::new("");
        assert_eq!(
            cursor.expect('}'),
            Err(ParseError::UnexpectedEnd { position: 0 })
        );
    }

    #[test]
    fn skip_whitespace_stops_at_content() {
        let mut cursor = Cursor::new("  \t x");
        cursor.skip_whitespace();
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("007", 7)]
    fn parse_number_ok(#[case] input: &str, #[case] expected: u32) {
        let mut cursor = Cursor::new(input);
        assert_eq!(cursor.parse_number().unwrap(), expected);
        assert_eq!(cursor.last_token(), Some(input));
    }

    #[test]
    fn parse_number_stops_at_non_digit() {
        let mut cursor = Cursor::new("12x");
        assert_eq!(cursor.parse_number().unwrap(), 12);
        assert_eq!(cursor.peek(), Some('x'));
    }

    #[rstest]
    #[case("x1")]
    #[case("")]
    #[case(" 5")]
    fn parse_number_requires_leading_digit(#[case] input: &str) {
        let mut cursor = Cursor::new(input);
        assert!(cursor.parse_number().is_err());
    }

    #[test]
    fn parse_number_out_of_range() {
        let mut cursor = Cursor::new("99999999999");
        assert!(matches!(
            cursor.parse_number(),
            Err(ParseError::Semantic { position: 0, .. })
        ));
    }

    #[rstest]
    #[case("noun", "noun")]
    #[case("_private", "_private")]
    #[case("a1_b2", "a1_b2")]
    #[case("noun@en", "noun")]
    fn parse_identifier_ok(#[case] input: &str, #[case] expected: &str) {
        let mut cursor = Cursor::new(input);
        assert_eq!(cursor.parse_identifier().unwrap(), expected);
        assert_eq!(cursor.last_token(), Some(expected));
    }

    #[rstest]
    #[case("1abc")]
    #[case("+tag")]
    #[case("")]
    fn parse_identifier_requires_alpha_start(#[case] input: &str) {
        let mut cursor = Cursor::new(input);
        assert!(cursor.parse_identifier().is_err());
    }

    #[test]
    fn positions_are_character_offsets() {
        let mut cursor = Cursor::new("héllo");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), Some('l'));
        assert_eq!(cursor.slice(0, 2), "hé");
    }
}
