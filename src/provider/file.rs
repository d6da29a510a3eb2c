use std::path::Path;

use serde::Deserialize;

use super::{DictionaryInfo, DictionaryProvider, ProviderError, TagInfo};

/// On-disk catalog shape: a YAML document with `dictionaries` and `tags`
/// lists.
#[derive(Debug, Default, Deserialize)]
struct Catalog {
    #[serde(default)]
    dictionaries: Vec<DictionaryInfo>,
    #[serde(default)]
    tags: Vec<TagInfo>,
}

/// Catalog loaded once from a YAML file. The load happens at construction,
/// so repeated queries never touch the filesystem again.
#[derive(Debug)]
pub struct FileProvider {
    catalog: Catalog,
}

impl FileProvider {
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ProviderError> {
        let catalog = serde_yaml::from_str(text)?;
        Ok(Self { catalog })
    }
}

impl DictionaryProvider for FileProvider {
    fn dictionaries(&self) -> Result<Vec<DictionaryInfo>, ProviderError> {
        Ok(self.catalog.dictionaries.clone())
    }

    fn tags(&self) -> Result<Vec<TagInfo>, ProviderError> {
        Ok(self.catalog.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use std::io::Write as _;

    const CATALOG: &str = indoc! {"
        dictionaries:
          - kind: noun
            count: 120
          - kind: adjective
            count: 80
        tags:
          - kind: noun
            tag: animal
            description: living creatures
            word_count: 40
          - kind: noun
            tag: nsfw
            opt_in: true
    "};

    #[test]
    fn from_yaml_parses_catalog() {
        let provider = FileProvider::from_yaml(CATALOG).unwrap();
        let dictionaries = provider.dictionaries().unwrap();
        assert_eq!(dictionaries.len(), 2);
        assert_eq!(dictionaries[0].kind, "noun");
        assert_eq!(dictionaries[0].count, 120);

        let tags = provider.tags().unwrap();
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].description, "living creatures");
        assert!(tags[1].opt_in);
        assert_eq!(tags[1].word_count, 0);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        let provider = FileProvider::load(file.path()).unwrap();
        assert_eq!(provider.dictionaries().unwrap().len(), 2);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = FileProvider::load(Path::new("/nonexistent/catalog.yml")).unwrap_err();
        assert!(matches!(err, ProviderError::Io(_)));
    }

    #[test]
    fn malformed_yaml_is_format_error() {
        let err = FileProvider::from_yaml("dictionaries: {not a list").unwrap_err();
        assert!(matches!(err, ProviderError::Format(_)));
    }

    #[test]
    fn empty_document_gives_empty_catalog() {
        let provider = FileProvider::from_yaml("{}").unwrap();
        assert!(provider.dictionaries().unwrap().is_empty());
        assert!(provider.tags().unwrap().is_empty());
    }
}
