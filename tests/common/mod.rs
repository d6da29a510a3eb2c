#![allow(
    dead_code,
    reason = "shared test helper: not all helpers are used in every test binary"
)]

use sluggen::provider::{DictionaryInfo, MemoryProvider, TagInfo};

pub fn dictionary(kind: &str, count: u64) -> DictionaryInfo {
    DictionaryInfo {
        kind: kind.into(),
        count,
    }
}

pub fn tag(kind: &str, name: &str) -> TagInfo {
    TagInfo {
        kind: kind.into(),
        tag: name.into(),
        description: format!("{name} words"),
        opt_in: false,
        word_count: 25,
    }
}

/// The catalog the suggestion tests run against: four dictionaries plus the
/// standard `noun` tag set.
pub fn demo_provider() -> MemoryProvider {
    MemoryProvider::new(
        vec![
            dictionary("adjective", 1500),
            dictionary("adverb", 300),
            dictionary("noun", 2600),
            dictionary("verb", 950),
        ],
        vec![
            tag("noun", "animal"),
            tag("noun", "artifact"),
            tag("noun", "plant"),
            tag("noun", "object"),
            tag("noun", "person"),
            tag("noun", "place"),
            tag("adjective", "color"),
        ],
    )
}
