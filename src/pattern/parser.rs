//! Full pattern parser: recursive descent over the surface grammar,
//! producing a [`ParsedPattern`] or the first positioned [`ParseError`].

use indexmap::IndexMap;

use super::ast::{
    CompareOp, GlobalSettings, NumberBase, NumberGen, ParsedPattern, PatternElement, Selector,
    SizeLimit, SpecialCharGen,
};
use super::cursor::{Cursor, is_identifier_char, is_identifier_start};
use super::error::ParseError;

/// Parse a complete pattern.
pub fn parse(input: &str) -> Result<ParsedPattern, ParseError> {
    let mut cursor = Cursor::new(input);
    let mut elements = Vec::new();
    let mut text_chunks = Vec::new();
    let mut chunk = String::new();

    while let Some(c) = cursor.peek() {
        match c {
            '{' => {
                let open_pos = cursor.position();
                cursor.advance();
                text_chunks.push(std::mem::take(&mut chunk));
                elements.push(parse_element(&mut cursor, open_pos)?);
            }
            '[' => {
                let open_pos = cursor.position();
                cursor.advance();
                text_chunks.push(std::mem::take(&mut chunk));
                let settings = parse_global_settings(&mut cursor, open_pos)?;
                cursor.skip_whitespace();
                if let Some(extra) = cursor.peek() {
                    return Err(ParseError::UnexpectedChar {
                        found: extra,
                        position: cursor.position(),
                    });
                }
                return Ok(ParsedPattern {
                    elements,
                    global_settings: Some(settings),
                    text_chunks,
                });
            }
            '}' | ']' => {
                return Err(ParseError::UnexpectedChar {
                    found: c,
                    position: cursor.position(),
                });
            }
            '\\' => {
                let escape_pos = cursor.position();
                cursor.advance();
                match cursor.peek() {
                    Some(escaped @ ('{' | '}' | '\\')) => {
                        cursor.advance();
                        chunk.push('\\');
                        chunk.push(escaped);
                    }
                    _ => {
                        return Err(ParseError::InvalidEscape {
                            position: escape_pos,
                        });
                    }
                }
            }
            _ => {
                chunk.push(c);
                cursor.advance();
            }
        }
    }

    text_chunks.push(chunk);
    Ok(ParsedPattern {
        elements,
        global_settings: None,
        text_chunks,
    })
}

/// Check a pattern without exposing the diagnostic.
pub fn validate(input: &str) -> bool {
    parse(input).is_ok()
}

/// Parse one `{...}` element; the opening brace is already consumed.
fn parse_element(cursor: &mut Cursor, open_pos: usize) -> Result<PatternElement, ParseError> {
    cursor.skip_whitespace();
    if cursor.is_at_end() {
        return Err(ParseError::UnterminatedPlaceholder { position: open_pos });
    }
    let name = cursor.parse_identifier()?;
    let element = match name.as_str() {
        "number" => PatternElement::Number(parse_number_gen(cursor)?),
        "special" => PatternElement::Special(parse_special_gen(cursor)?),
        _ => PatternElement::Selector(parse_selector(cursor, name)?),
    };
    cursor.skip_whitespace();
    match cursor.peek() {
        Some('}') => {
            cursor.advance();
            Ok(element)
        }
        Some(found) => Err(ParseError::UnexpectedChar {
            found,
            position: cursor.position(),
        }),
        None => Err(ParseError::UnterminatedPlaceholder { position: open_pos }),
    }
}

fn parse_selector(cursor: &mut Cursor, kind: String) -> Result<Selector, ParseError> {
    let mut selector = Selector::new(kind);
    if cursor.match_char('@') {
        selector.language = Some(cursor.parse_identifier()?);
    }
    if cursor.match_char(':') {
        let body = parse_settings_body(cursor)?;
        selector.include_tags = body.include_tags;
        selector.exclude_tags = body.exclude_tags;
        selector.size_limit = body.size_limit;
        selector.options = body.options;
    }
    Ok(selector)
}

fn parse_number_gen(cursor: &mut Cursor) -> Result<NumberGen, ParseError> {
    let mut gen = NumberGen::default();
    if !cursor.match_char(':') {
        return Ok(gen);
    }
    gen.max_length = cursor.parse_number()?;
    match cursor.peek() {
        Some(',') => {
            cursor.advance();
            cursor.skip_whitespace();
            let base_pos = cursor.position();
            let name = cursor.parse_identifier()?;
            gen.base =
                NumberBase::from_long(&name).ok_or_else(|| ParseError::InvalidIdentifier {
                    position: base_pos,
                    message: format!("unknown number base `{name}`"),
                })?;
        }
        Some(c) => {
            if let Some(base) = NumberBase::from_short(c) {
                cursor.advance();
                if cursor.peek() == Some(',') {
                    return Err(ParseError::Semantic {
                        position: cursor.position(),
                        message: "only one number base is allowed".into(),
                    });
                }
                gen.base = base;
            }
            // Anything else is left for the caller's close-brace check.
        }
        None => {}
    }
    Ok(gen)
}

fn parse_special_gen(cursor: &mut Cursor) -> Result<SpecialCharGen, ParseError> {
    let mut gen = SpecialCharGen::default();
    if !cursor.match_char(':') {
        return Ok(gen);
    }
    let min_pos = cursor.position();
    gen.min_length = cursor.parse_number()?;
    gen.max_length = gen.min_length;
    if cursor.match_char('-') {
        let max_pos = cursor.position();
        gen.max_length = cursor.parse_number()?;
        if gen.min_length > gen.max_length {
            return Err(ParseError::Semantic {
                position: max_pos,
                message: format!("invalid range {}-{}", gen.min_length, gen.max_length),
            });
        }
    }
    if gen.min_length == 0 {
        return Err(ParseError::Semantic {
            position: min_pos,
            message: "special length must be positive".into(),
        });
    }
    Ok(gen)
}

fn parse_global_settings(
    cursor: &mut Cursor,
    open_pos: usize,
) -> Result<GlobalSettings, ParseError> {
    let mut settings = GlobalSettings::default();
    cursor.skip_whitespace();
    if cursor.match_char('@') {
        settings.language = Some(cursor.parse_identifier()?);
    }
    let body = parse_settings_body(cursor)?;
    settings.include_tags = body.include_tags;
    settings.exclude_tags = body.exclude_tags;
    settings.size_limit = body.size_limit;
    settings.options = body.options;
    match cursor.peek() {
        Some(']') => {
            cursor.advance();
            Ok(settings)
        }
        Some(found) => Err(ParseError::UnexpectedChar {
            found,
            position: cursor.position(),
        }),
        None => Err(ParseError::UnterminatedSettings { position: open_pos }),
    }
}

/// The tag/size/options triple shared by selector bodies and the global
/// settings block.
#[derive(Default)]
struct SettingsBody {
    include_tags: Vec<String>,
    exclude_tags: Vec<String>,
    size_limit: Option<SizeLimit>,
    options: IndexMap<String, String>,
}

/// Parse the settings body up to (not including) the closing delimiter.
/// Tag atoms and the size limit may interleave, but at most one size limit
/// is allowed; options terminate the body.
fn parse_settings_body(cursor: &mut Cursor) -> Result<SettingsBody, ParseError> {
    let mut body = SettingsBody::default();
    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            Some('+') => {
                cursor.advance();
                parse_tag(cursor, &mut body, true)?;
            }
            Some('-') => {
                cursor.advance();
                parse_tag(cursor, &mut body, false)?;
            }
            Some('<' | '>' | '=' | '!') => {
                let op_pos = cursor.position();
                if body.size_limit.is_some() {
                    return Err(ParseError::Semantic {
                        position: op_pos,
                        message: "only one size limit is allowed".into(),
                    });
                }
                let op = parse_compare_op(cursor)?;
                cursor.skip_whitespace();
                let value = cursor.parse_number()?;
                body.size_limit = Some(SizeLimit { op, value });
            }
            Some(',') => {
                cursor.advance();
                cursor.skip_whitespace();
                parse_options(cursor, &mut body.options)?;
                return Ok(body);
            }
            Some(c) if is_identifier_start(c) => {
                parse_options(cursor, &mut body.options)?;
                return Ok(body);
            }
            _ => return Ok(body),
        }
    }
}

fn parse_tag(cursor: &mut Cursor, body: &mut SettingsBody, include: bool) -> Result<(), ParseError> {
    let tag_pos = cursor.position();
    if !cursor.peek().is_some_and(is_identifier_start) {
        return Err(ParseError::Semantic {
            position: tag_pos,
            message: "empty tag".into(),
        });
    }
    let tag = cursor.parse_identifier()?;
    if body.include_tags.contains(&tag) || body.exclude_tags.contains(&tag) {
        return Err(ParseError::Semantic {
            position: tag_pos,
            message: format!("duplicate tag `{tag}`"),
        });
    }
    if include {
        body.include_tags.push(tag);
    } else {
        body.exclude_tags.push(tag);
    }
    Ok(())
}

/// Tokenize a comparison operator greedily: `<=`, `<`, `>=`, `>`, `==`, `!=`.
/// A lone `=` or `!` is an error.
fn parse_compare_op(cursor: &mut Cursor) -> Result<CompareOp, ParseError> {
    let op_pos = cursor.position();
    match cursor.advance() {
        Some('<') => Ok(if cursor.match_char('=') {
            CompareOp::Le
        } else {
            CompareOp::Lt
        }),
        Some('>') => Ok(if cursor.match_char('=') {
            CompareOp::Ge
        } else {
            CompareOp::Gt
        }),
        Some('=') => {
            if cursor.match_char('=') {
                Ok(CompareOp::Eq)
            } else {
                Err(ParseError::UnexpectedChar {
                    found: '=',
                    position: op_pos,
                })
            }
        }
        Some('!') => {
            if cursor.match_char('=') {
                Ok(CompareOp::Ne)
            } else {
                Err(ParseError::UnexpectedChar {
                    found: '!',
                    position: op_pos,
                })
            }
        }
        Some(found) => Err(ParseError::UnexpectedChar {
            found,
            position: op_pos,
        }),
        None => Err(ParseError::UnexpectedEnd { position: op_pos }),
    }
}

fn parse_options(
    cursor: &mut Cursor,
    options: &mut IndexMap<String, String>,
) -> Result<(), ParseError> {
    loop {
        cursor.skip_whitespace();
        let key_pos = cursor.position();
        let key = match cursor.peek() {
            Some(c) if is_identifier_start(c) => cursor.parse_identifier()?,
            Some('}' | ']') | None => {
                return Err(ParseError::Semantic {
                    position: key_pos,
                    message: "trailing comma".into(),
                });
            }
            Some(found) => {
                return Err(ParseError::UnexpectedChar {
                    found,
                    position: key_pos,
                });
            }
        };
        if !cursor.match_char('=') {
            return Err(ParseError::Semantic {
                position: cursor.position(),
                message: format!("option `{key}` is missing `=`"),
            });
        }
        let value = parse_option_value(cursor);
        options.insert(key, value);
        if !cursor.match_char(',') {
            return Ok(());
        }
    }
}

/// Option values are a possibly empty run of `[A-Za-z0-9_]`.
fn parse_option_value(cursor: &mut Cursor) -> String {
    let mut value = String::new();
    while let Some(c) = cursor.peek() {
        if !is_identifier_char(c) {
            break;
        }
        value.push(c);
        cursor.advance();
    }
    value
}
