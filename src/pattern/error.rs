/// Errors produced while parsing a pattern. Every variant carries the
/// 0-based character offset where the problem was detected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character {found:?} at position {position}")]
    UnexpectedChar { found: char, position: usize },
    #[error("unexpected end of input at position {position}")]
    UnexpectedEnd { position: usize },
    #[error("unterminated placeholder starting at position {position}")]
    UnterminatedPlaceholder { position: usize },
    #[error("unterminated settings block starting at position {position}")]
    UnterminatedSettings { position: usize },
    #[error("invalid escape sequence at position {position}")]
    InvalidEscape { position: usize },
    #[error("invalid identifier at position {position}: {message}")]
    InvalidIdentifier { position: usize, message: String },
    #[error("{message} at position {position}")]
    Semantic { position: usize, message: String },
}

impl ParseError {
    /// 0-based character offset of the failure.
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedChar { position, .. }
            | ParseError::UnexpectedEnd { position }
            | ParseError::UnterminatedPlaceholder { position }
            | ParseError::UnterminatedSettings { position }
            | ParseError::InvalidEscape { position }
            | ParseError::InvalidIdentifier { position, .. }
            | ParseError::Semantic { position, .. } => *position,
        }
    }
}
