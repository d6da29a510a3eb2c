//! Value types for parsed slug patterns: elements, selectors, generators,
//! size limits, and the pattern itself.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Comparison operator in a size limit (e.g. `>3`, `<=10`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric base for the `number` generator.
///
/// Short forms (`d`, `x`, `X`, `r`, `R`) and long forms (`dec`, `hex`, `HEX`,
/// `roman`, `ROMAN`) select the same five renderings; long forms are
/// case-sensitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumberBase {
    #[default]
    #[serde(rename = "dec")]
    Dec,
    #[serde(rename = "hex")]
    Hex,
    #[serde(rename = "HEX")]
    HexUpper,
    #[serde(rename = "roman")]
    Roman,
    #[serde(rename = "ROMAN")]
    RomanUpper,
}

impl NumberBase {
    /// Resolve a single-letter base: `d`, `x`, `X`, `r`, `R`.
    pub fn from_short(c: char) -> Option<Self> {
        match c {
            'd' => Some(NumberBase::Dec),
            'x' => Some(NumberBase::Hex),
            'X' => Some(NumberBase::HexUpper),
            'r' => Some(NumberBase::Roman),
            'R' => Some(NumberBase::RomanUpper),
            _ => None,
        }
    }

    /// Resolve a long base name (case-sensitive).
    pub fn from_long(name: &str) -> Option<Self> {
        match name {
            "dec" => Some(NumberBase::Dec),
            "hex" => Some(NumberBase::Hex),
            "HEX" => Some(NumberBase::HexUpper),
            "roman" => Some(NumberBase::Roman),
            "ROMAN" => Some(NumberBase::RomanUpper),
            _ => None,
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            NumberBase::Dec => "dec",
            NumberBase::Hex => "hex",
            NumberBase::HexUpper => "HEX",
            NumberBase::Roman => "roman",
            NumberBase::RomanUpper => "ROMAN",
        }
    }

    /// The long names in suggestion order.
    pub const LONG_NAMES: [&'static str; 5] = ["dec", "hex", "HEX", "roman", "ROMAN"];
}

impl fmt::Display for NumberBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// A constraint on the length of the generated word (e.g. `>3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeLimit {
    pub op: CompareOp,
    pub value: u32,
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.value)
    }
}

/// A dictionary placeholder: `{noun@en:+animal -nsfw >3,case=lower}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub kind: String,
    pub language: Option<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub size_limit: Option<SizeLimit>,
    /// Rendering options in source order; a repeated key overwrites the
    /// earlier value without moving.
    pub options: IndexMap<String, String>,
}

impl Selector {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    fn has_body(&self) -> bool {
        !self.include_tags.is_empty()
            || !self.exclude_tags.is_empty()
            || self.size_limit.is_some()
            || !self.options.is_empty()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
        }
        if self.has_body() {
            f.write_str(":")?;
            write_settings_body(
                f,
                &self.include_tags,
                &self.exclude_tags,
                self.size_limit,
                &self.options,
            )?;
        }
        Ok(())
    }
}

/// The built-in `{number}` generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberGen {
    pub max_length: u32,
    pub base: NumberBase,
}

impl Default for NumberGen {
    fn default() -> Self {
        Self {
            max_length: 1,
            base: NumberBase::Dec,
        }
    }
}

impl fmt::Display for NumberGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("number")?;
        if self.base != NumberBase::Dec {
            write!(f, ":{},{}", self.max_length, self.base)
        } else if self.max_length != 1 {
            write!(f, ":{}", self.max_length)
        } else {
            Ok(())
        }
    }
}

/// The built-in `{special}` generator producing a run of special characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCharGen {
    pub min_length: u32,
    pub max_length: u32,
}

impl Default for SpecialCharGen {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 1,
        }
    }
}

impl fmt::Display for SpecialCharGen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("special")?;
        if self.min_length != self.max_length {
            write!(f, ":{}-{}", self.min_length, self.max_length)
        } else if self.min_length != 1 {
            write!(f, ":{}", self.min_length)
        } else {
            Ok(())
        }
    }
}

/// One placeholder of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternElement {
    Selector(Selector),
    Number(NumberGen),
    Special(SpecialCharGen),
}

impl fmt::Display for PatternElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternElement::Selector(selector) => selector.fmt(f),
            PatternElement::Number(gen) => gen.fmt(f),
            PatternElement::Special(gen) => gen.fmt(f),
        }
    }
}

/// Document-wide defaults from a trailing `[...]` block. Shaped like a
/// [`Selector`] without the dictionary kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    pub language: Option<String>,
    pub include_tags: Vec<String>,
    pub exclude_tags: Vec<String>,
    pub size_limit: Option<SizeLimit>,
    pub options: IndexMap<String, String>,
}

impl GlobalSettings {
    fn has_body(&self) -> bool {
        !self.include_tags.is_empty()
            || !self.exclude_tags.is_empty()
            || self.size_limit.is_some()
            || !self.options.is_empty()
    }
}

impl fmt::Display for GlobalSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if let Some(language) = &self.language {
            write!(f, "@{language}")?;
            if self.has_body() {
                f.write_str(" ")?;
            }
        }
        write_settings_body(
            f,
            &self.include_tags,
            &self.exclude_tags,
            self.size_limit,
            &self.options,
        )?;
        f.write_str("]")
    }
}

/// A fully parsed pattern.
///
/// `text_chunks` always has exactly one more entry than `elements`:
/// interleaving `text_chunks[0], elements[0], text_chunks[1], ...` plus the
/// optional settings block reproduces the source (up to whitespace
/// normalization inside placeholders). Escape sequences are preserved
/// verbatim in the chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPattern {
    pub elements: Vec<PatternElement>,
    pub global_settings: Option<GlobalSettings>,
    pub text_chunks: Vec<String>,
}

impl fmt::Display for ParsedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chunk) in self.text_chunks.iter().enumerate() {
            f.write_str(chunk)?;
            if let Some(element) = self.elements.get(i) {
                write!(f, "{{{element}}}")?;
            }
        }
        if let Some(settings) = &self.global_settings {
            settings.fmt(f)?;
        }
        Ok(())
    }
}

/// Render the shared tag/size/options triple: tag atoms separated by single
/// spaces, then the size limit, then `,`-joined options.
fn write_settings_body(
    f: &mut fmt::Formatter<'_>,
    include_tags: &[String],
    exclude_tags: &[String],
    size_limit: Option<SizeLimit>,
    options: &IndexMap<String, String>,
) -> fmt::Result {
    let mut need_space = false;
    for tag in include_tags {
        if need_space {
            f.write_str(" ")?;
        }
        write!(f, "+{tag}")?;
        need_space = true;
    }
    for tag in exclude_tags {
        if need_space {
            f.write_str(" ")?;
        }
        write!(f, "-{tag}")?;
        need_space = true;
    }
    if let Some(limit) = size_limit {
        if need_space {
            f.write_str(" ")?;
        }
        write!(f, "{limit}")?;
        need_space = true;
    }
    if !options.is_empty() {
        if need_space {
            f.write_str(",")?;
        }
        let mut first = true;
        for (key, value) in options {
            if !first {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CompareOp::Eq, "==")]
    #[case(CompareOp::Ne, "!=")]
    #[case(CompareOp::Lt, "<")]
    #[case(CompareOp::Le, "<=")]
    #[case(CompareOp::Gt, ">")]
    #[case(CompareOp::Ge, ">=")]
    fn compare_op_display(#[case] op: CompareOp, #[case] expected: &str) {
        assert_eq!(op.to_string(), expected);
    }

    #[rstest]
    #[case('d', Some(NumberBase::Dec))]
    #[case('x', Some(NumberBase::Hex))]
    #[case('X', Some(NumberBase::HexUpper))]
    #[case('r', Some(NumberBase::Roman))]
    #[case('R', Some(NumberBase::RomanUpper))]
    #[case('D', None)]
    #[case('h', None)]
    fn number_base_from_short(#[case] c: char, #[case] expected: Option<NumberBase>) {
        assert_eq!(NumberBase::from_short(c), expected);
    }

    #[rstest]
    #[case("dec", Some(NumberBase::Dec))]
    #[case("hex", Some(NumberBase::Hex))]
    #[case("HEX", Some(NumberBase::HexUpper))]
    #[case("roman", Some(NumberBase::Roman))]
    #[case("ROMAN", Some(NumberBase::RomanUpper))]
    #[case("Dec", None)]
    #[case("Hex", None)]
    #[case("octal", None)]
    fn number_base_from_long(#[case] name: &str, #[case] expected: Option<NumberBase>) {
        assert_eq!(NumberBase::from_long(name), expected);
    }

    #[test]
    fn number_gen_defaults() {
        let gen = NumberGen::default();
        assert_eq!(gen.max_length, 1);
        assert_eq!(gen.base, NumberBase::Dec);
    }

    #[rstest]
    #[case(NumberGen::default(), "number")]
    #[case(NumberGen { max_length: 5, base: NumberBase::Dec }, "number:5")]
    #[case(NumberGen { max_length: 5, base: NumberBase::Hex }, "number:5,hex")]
    #[case(NumberGen { max_length: 1, base: NumberBase::RomanUpper }, "number:1,ROMAN")]
    fn number_gen_display(#[case] gen: NumberGen, #[case] expected: &str) {
        assert_eq!(gen.to_string(), expected);
    }

    #[rstest]
    #[case(SpecialCharGen::default(), "special")]
    #[case(SpecialCharGen { min_length: 4, max_length: 4 }, "special:4")]
    #[case(SpecialCharGen { min_length: 3, max_length: 7 }, "special:3-7")]
    fn special_gen_display(#[case] gen: SpecialCharGen, #[case] expected: &str) {
        assert_eq!(gen.to_string(), expected);
    }

    #[test]
    fn selector_display_full() {
        let mut selector = Selector::new("noun");
        selector.language = Some("en".into());
        selector.include_tags.push("animal".into());
        selector.exclude_tags.push("nsfw".into());
        selector.size_limit = Some(SizeLimit {
            op: CompareOp::Gt,
            value: 3,
        });
        selector.options.insert("case".into(), "lower".into());
        assert_eq!(selector.to_string(), "noun@en:+animal -nsfw >3,case=lower");
    }

    #[test]
    fn selector_display_bare_kind() {
        assert_eq!(Selector::new("noun").to_string(), "noun");
    }

    #[test]
    fn selector_display_options_only() {
        let mut selector = Selector::new("verb");
        selector.options.insert("case".into(), "upper".into());
        selector.options.insert("sep".into(), String::new());
        assert_eq!(selector.to_string(), "verb:case=upper,sep=");
    }

    #[test]
    fn selector_options_overwrite_in_place() {
        let mut selector = Selector::new("noun");
        selector.options.insert("case".into(), "lower".into());
        selector.options.insert("sep".into(), "x".into());
        selector.options.insert("case".into(), "upper".into());
        let keys: Vec<&str> = selector.options.keys().map(String::as_str).collect();
        assert_eq!(keys, ["case", "sep"]);
        assert_eq!(selector.options["case"], "upper");
    }

    #[test]
    fn global_settings_display() {
        let mut settings = GlobalSettings {
            language: Some("en".into()),
            ..GlobalSettings::default()
        };
        settings.include_tags.push("common".into());
        assert_eq!(settings.to_string(), "[@en +common]");
    }

    #[test]
    fn global_settings_display_empty() {
        assert_eq!(GlobalSettings::default().to_string(), "[]");
    }

    #[test]
    fn pattern_display_interleaves_chunks() {
        let pattern = ParsedPattern {
            elements: vec![
                PatternElement::Selector(Selector::new("adjective")),
                PatternElement::Number(NumberGen {
                    max_length: 3,
                    base: NumberBase::Dec,
                }),
            ],
            global_settings: None,
            text_chunks: vec!["pre-".into(), "-mid-".into(), "-post".into()],
        };
        assert_eq!(pattern.to_string(), "pre-{adjective}-mid-{number:3}-post");
    }

    #[test]
    fn pattern_display_preserves_escapes() {
        let pattern = ParsedPattern {
            elements: vec![],
            global_settings: None,
            text_chunks: vec![r"a\{b\\c".into()],
        };
        assert_eq!(pattern.to_string(), r"a\{b\\c");
    }
}
