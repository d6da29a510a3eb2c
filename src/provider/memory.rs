use super::{DictionaryInfo, DictionaryProvider, ProviderError, TagInfo};

/// In-memory catalog, for tests and embedders that already hold the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    dictionaries: Vec<DictionaryInfo>,
    tags: Vec<TagInfo>,
}

impl MemoryProvider {
    pub fn new(dictionaries: Vec<DictionaryInfo>, tags: Vec<TagInfo>) -> Self {
        Self { dictionaries, tags }
    }
}

impl DictionaryProvider for MemoryProvider {
    fn dictionaries(&self) -> Result<Vec<DictionaryInfo>, ProviderError> {
        Ok(self.dictionaries.clone())
    }

    fn tags(&self) -> Result<Vec<TagInfo>, ProviderError> {
        Ok(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_what_it_was_given() {
        let provider = MemoryProvider::new(
            vec![DictionaryInfo {
                kind: "noun".into(),
                count: 120,
            }],
            vec![TagInfo {
                kind: "noun".into(),
                tag: "animal".into(),
                description: "living creatures".into(),
                opt_in: false,
                word_count: 40,
            }],
        );
        assert_eq!(provider.dictionaries().unwrap().len(), 1);
        assert_eq!(provider.tags().unwrap()[0].tag, "animal");
    }

    #[test]
    fn default_is_empty() {
        let provider = MemoryProvider::default();
        assert!(provider.dictionaries().unwrap().is_empty());
        assert!(provider.tags().unwrap().is_empty());
    }
}
