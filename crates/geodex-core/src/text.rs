//! Unicode-aware text helpers shared by the sorter, the indexes and the
//! matchers.
//!
//! The Geonames snapshot is full of non-ASCII names ("Zürich", "東京",
//! "São Paulo"), so every fold in this crate goes through the standard
//! library's full Unicode lowercasing. ASCII-only folding corrupts both the
//! arena sort order and index keys and must not be reintroduced.

use std::cmp::Ordering;

/// Lowercase fold used for index keys and comparisons.
#[inline]
pub(crate) fn fold(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive equality on the folded forms.
#[inline]
pub(crate) fn eq_fold(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Case-insensitive ordering; drives the arena sort.
#[inline]
pub(crate) fn cmp_fold(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Truncates to at most `max` characters, never splitting a code point.
pub(crate) fn truncate_runes(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Strips a case-insensitive prefix, returning the remainder.
///
/// `pattern` must already be folded. A match requires the input to be
/// strictly longer than the pattern; whole-string equality is handled by
/// the callers separately. When Unicode lowercasing changes byte lengths
/// the remainder is taken from the folded form, which is equivalent for
/// every later (case-insensitive) use of the remainder.
pub(crate) fn strip_prefix_fold(s: &str, pattern: &str) -> Option<String> {
    let folded = s.to_lowercase();
    if folded.len() > pattern.len() && folded.starts_with(pattern) {
        if s.len() == folded.len() && s.is_char_boundary(pattern.len()) {
            return Some(s[pattern.len()..].to_string());
        }
        return Some(folded[pattern.len()..].to_string());
    }
    None
}

/// Suffix twin of [`strip_prefix_fold`].
pub(crate) fn strip_suffix_fold(s: &str, pattern: &str) -> Option<String> {
    let folded = s.to_lowercase();
    if folded.len() > pattern.len() && folded.ends_with(pattern) {
        let cut = folded.len() - pattern.len();
        if s.len() == folded.len() && s.is_char_boundary(cut) {
            return Some(s[..cut].to_string());
        }
        return Some(folded[..cut].to_string());
    }
    None
}

/// Standalone 2-3 letter words of the input, in order of appearance.
///
/// A word is a maximal run of `[A-Za-z0-9_]`; only runs made purely of two
/// or three ASCII letters qualify. "Austin, TX" yields `["TX"]`; "ab1" has
/// no boundary after "ab" and yields nothing.
pub(crate) fn abbreviation_tokens(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut run = String::new();
    let mut letters_only = true;

    for ch in s.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            letters_only &= ch.is_ascii_alphabetic();
            run.push(ch);
        } else {
            if letters_only && (run.len() == 2 || run.len() == 3) {
                out.push(std::mem::take(&mut run));
            } else {
                run.clear();
            }
            letters_only = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_handles_unicode() {
        assert_eq!(fold("ZÜRICH"), "zürich");
        assert!(eq_fold("São Paulo", "sãO paulo"));
        assert_eq!(cmp_fold("zwolle", "Zürich"), Ordering::Less);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_runes("東京都渋谷区", 2), "東京");
        assert_eq!(truncate_runes("abc", 10), "abc");
        let long = "é".repeat(300);
        let cut = truncate_runes(&long, 256);
        assert_eq!(cut.chars().count(), 256);
        assert!(cut.is_char_boundary(cut.len()));
    }

    #[test]
    fn prefix_suffix_strip() {
        assert_eq!(
            strip_prefix_fold("France, Paris", "france, ").as_deref(),
            Some("Paris")
        );
        assert_eq!(
            strip_suffix_fold("Paris, France", ", france").as_deref(),
            Some("Paris")
        );
        // whole-string equality is not a strip
        assert_eq!(strip_prefix_fold("France", "france"), None);
        assert_eq!(strip_suffix_fold("France", "france"), None);
        assert_eq!(strip_prefix_fold("Fra", "france, "), None);
    }

    #[test]
    fn abbreviations_need_word_boundaries() {
        assert_eq!(abbreviation_tokens("Austin, TX"), vec!["TX"]);
        assert_eq!(abbreviation_tokens("New York NY"), vec!["New", "NY"]);
        assert!(abbreviation_tokens("ab1 x 1cd word").is_empty());
        assert_eq!(abbreviation_tokens("us-east"), vec!["us"]);
    }
}
