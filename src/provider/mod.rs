//! Dictionary catalog provider: the seam between the suggestion engine and
//! whatever backend knows which dictionaries and tags exist.

mod file;
mod memory;

use serde::{Deserialize, Serialize};

pub use file::FileProvider;
pub use memory::MemoryProvider;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("failed to read dictionary catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dictionary catalog: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// One dictionary offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryInfo {
    pub kind: String,
    #[serde(default)]
    pub count: u64,
}

/// One tag within a dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub kind: String,
    pub tag: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub opt_in: bool,
    #[serde(default)]
    pub word_count: u64,
}

/// Read-only access to the dictionary catalog. Both queries are idempotent;
/// consumers match `kind` case-insensitively.
pub trait DictionaryProvider {
    fn dictionaries(&self) -> Result<Vec<DictionaryInfo>, ProviderError>;
    fn tags(&self) -> Result<Vec<TagInfo>, ProviderError>;
}
