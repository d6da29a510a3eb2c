//! Parser states and the token classes each state legally accepts next.

use serde::Serialize;

/// Where a partial parse halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserState {
    OutsidePlaceholder,
    InPlaceholder,
    InGlobalSettings,
    ExpectingIdentifier,
    ExpectingColon,
    ExpectingLanguageIdentifier,
    ExpectingAfterLanguage,
    ExpectingTagOrSizeLimit,
    ExpectingTagOnly,
    ExpectingTagIdentifier,
    ExpectingSizeLimit,
    ExpectingOption,
    ExpectingNumberLength,
    ExpectingNumberBase,
    ExpectingSpecialLength,
    ExpectingSpecialRange,
    ExpectingCloseBrace,
    ExpectingCloseBracket,
    PartialSelector,
    PartialNumberGen,
    PartialSpecialGen,
    Complete,
    Incomplete,
    Invalid,
}

/// Token classes the grammar accepts at a given parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedToken {
    Identifier,
    Colon,
    CloseBrace,
    CloseBracket,
    TagSpec,
    ComparisonOp,
    Number,
    Option,
    OpenBrace,
    OpenBracket,
    Equals,
    Exclamation,
    Plus,
    Minus,
    Dash,
    NumberBase,
    AtSign,
}

/// The token classes that may legally continue the input from `state`.
///
/// Pure lookup; once a size limit is present the tag states no longer
/// advertise comparison operators (`ExpectingTagOnly`), which the suggestion
/// engine relies on.
pub fn expected_for(state: ParserState) -> &'static [ExpectedToken] {
    use ExpectedToken as T;
    match state {
        ParserState::OutsidePlaceholder => &[T::OpenBrace, T::OpenBracket],
        ParserState::InPlaceholder => &[T::Identifier],
        ParserState::InGlobalSettings => &[
            T::AtSign,
            T::TagSpec,
            T::ComparisonOp,
            T::Option,
            T::CloseBracket,
        ],
        ParserState::ExpectingIdentifier => &[T::Identifier],
        ParserState::ExpectingColon => &[T::Colon],
        ParserState::ExpectingLanguageIdentifier => &[T::Identifier],
        ParserState::ExpectingAfterLanguage => &[T::Colon, T::CloseBrace],
        ParserState::ExpectingTagOrSizeLimit => {
            &[T::TagSpec, T::ComparisonOp, T::Option, T::CloseBrace]
        }
        ParserState::ExpectingTagOnly => &[T::TagSpec, T::Option, T::CloseBrace],
        ParserState::ExpectingTagIdentifier => &[T::Identifier],
        ParserState::ExpectingSizeLimit => &[T::Number, T::Equals],
        ParserState::ExpectingOption => &[T::Option],
        ParserState::ExpectingNumberLength => &[T::Number],
        ParserState::ExpectingNumberBase => &[T::NumberBase, T::CloseBrace],
        ParserState::ExpectingSpecialLength => &[T::Number],
        ParserState::ExpectingSpecialRange => &[T::Number, T::Dash, T::CloseBrace],
        ParserState::ExpectingCloseBrace => &[T::CloseBrace],
        ParserState::ExpectingCloseBracket => &[T::CloseBracket],
        ParserState::PartialSelector => &[T::AtSign, T::Colon, T::CloseBrace],
        ParserState::PartialNumberGen => &[T::Colon, T::CloseBrace],
        ParserState::PartialSpecialGen => &[T::Colon, T::CloseBrace],
        ParserState::Complete | ParserState::Incomplete | ParserState::Invalid => &[],
    }
}
