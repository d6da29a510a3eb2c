mod case;
mod engine;

pub use engine::{Suggestion, SuggestionEngine, SuggestionKind};
