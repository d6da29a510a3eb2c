//! Case classification and completion recasing for generator names.

/// The case shape of what the user has typed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseShape {
    Lower,
    Upper,
    Title,
    Mixed,
}

/// Classify the alphabetic characters of `input`.
///
/// A single uppercase letter counts as `Upper` (it seeds the upper, title,
/// and alternating variants); `Title` requires an uppercase letter followed
/// by at least one lowercase letter.
pub fn classify(input: &str) -> CaseShape {
    let letters: Vec<char> = input.chars().filter(|c| c.is_ascii_alphabetic()).collect();
    if letters.iter().all(|c| c.is_ascii_lowercase()) {
        return CaseShape::Lower;
    }
    if letters.iter().all(|c| c.is_ascii_uppercase()) {
        return CaseShape::Upper;
    }
    if letters[0].is_ascii_uppercase() && letters[1..].iter().all(|c| c.is_ascii_lowercase()) {
        return CaseShape::Title;
    }
    CaseShape::Mixed
}

/// Completion candidates for `word` matching the case shape of `input`.
///
/// `input` is assumed to be a case-insensitive prefix of `word`. Mixed-case
/// input is preserved verbatim and continued in alternating case starting
/// from the opposite of the last typed letter, so `aDj` over `adjective`
/// yields `aDjEcTiVe`.
pub fn completions(input: &str, word: &str) -> Vec<String> {
    match classify(input) {
        CaseShape::Lower => vec![word.to_ascii_lowercase(), alternating(word, false)],
        CaseShape::Upper => vec![
            word.to_ascii_uppercase(),
            titlecase(word),
            alternating(word, true),
        ],
        CaseShape::Title => vec![titlecase(word)],
        CaseShape::Mixed => vec![mixed_continuation(input, word)],
    }
}

/// Group key for the stable suggestion sort: built-in generators first, then
/// lowercase, uppercase, titlecase, and mixed-case completions.
pub fn case_group(text: &str) -> u8 {
    if text == "number" || text == "special" {
        return 0;
    }
    match classify(text) {
        CaseShape::Lower => 1,
        CaseShape::Upper => 2,
        CaseShape::Title => 3,
        CaseShape::Mixed => 4,
    }
}

pub fn titlecase(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

/// Alternate letter case over `word`, starting upper or lower.
pub fn alternating(word: &str, start_upper: bool) -> String {
    let mut upper = start_upper;
    word.chars()
        .map(|c| {
            let recased = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = !upper;
            recased
        })
        .collect()
}

/// Keep the user's typed prefix exactly and continue in alternating case
/// starting from the opposite of the last typed letter.
fn mixed_continuation(input: &str, word: &str) -> String {
    let typed = input.chars().count();
    let last_was_upper = input
        .chars()
        .rev()
        .find(|c| c.is_ascii_alphabetic())
        .is_some_and(|c| c.is_ascii_uppercase());
    let mut upper = !last_was_upper;
    let mut result = input.to_string();
    for c in word.chars().skip(typed) {
        if upper {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c.to_ascii_lowercase());
        }
        upper = !upper;
    }
    result
}
