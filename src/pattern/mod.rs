pub mod ast;
pub mod cursor;
mod error;
pub mod expected;
pub mod parser;
pub mod partial;

pub use ast::{
    CompareOp, GlobalSettings, NumberBase, NumberGen, ParsedPattern, PatternElement, Selector,
    SizeLimit, SpecialCharGen,
};
pub use error::*;
pub use expected::{ExpectedToken, ParserState, expected_for};
pub use parser::{parse, validate};
pub use partial::{ParserContextInfo, expected_next, parse_partial, valid_prefix};
