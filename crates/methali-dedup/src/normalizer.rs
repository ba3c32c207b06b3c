//! Canonical comparison keys for quote text.

use unicode_normalization::UnicodeNormalization;

/// Characters removed from keys: brackets, quotes, parentheses, sentence
/// punctuation and the hyphen/dash family.
const STRIPPED: &[char] = &[
    '[', ']', '"', '\'', '`', '(', ')', ',', '.', ':', ';', '!', '?',
    '-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}',
    '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}',
];

/// Map raw quote text to its canonical key.
///
/// Case, punctuation and whitespace differences vanish; NFKC folds
/// compatibility code points. An empty result means the text has no
/// content worth indexing.
pub fn normalize(raw: &str) -> String {
    let nfkc: String = raw.trim().nfkc().collect();
    let lowered = collapse_whitespace(&nfkc).to_lowercase();
    let stripped: String = lowered.chars().filter(|c| !STRIPPED.contains(c)).collect();
    // Stripping can leave a double space ("a - b"), collapse again so keys are fixed points.
    collapse_whitespace(&stripped)
}

/// Trim and squeeze every whitespace run to one ASCII space.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
