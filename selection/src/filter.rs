//! Match predicates deciding which items stay visible for a filter term.

use std::sync::Mutex;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use regex::{Regex, RegexBuilder};

/// Decides whether an item's text matches a filter term.
///
/// Any `Fn(&str, &str) -> bool` closure is a predicate:
///
/// ```
/// use selection::filter::MatchPredicate;
///
/// let prefix = |text: &str, term: &str| text.starts_with(term);
/// assert!(prefix.matches("Berlin", "Ber"));
/// ```
pub trait MatchPredicate: Send + Sync {
    fn matches(&self, text: &str, term: &str) -> bool;
}

impl<F> MatchPredicate for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn matches(&self, text: &str, term: &str) -> bool {
        self(text, term)
    }
}

/// Default predicate: whitespace is stripped from both text and term, then
/// the term is searched case-insensitively as a regular expression.
///
/// A term that is not a valid pattern (e.g. `"(draft"`) falls back to a
/// case-insensitive literal search. The last compiled pattern is cached so a
/// filter pass over many items compiles it once.
#[derive(Debug, Default)]
pub struct RegexMatch {
    cache: Mutex<Option<(String, Option<Regex>)>>,
}

impl RegexMatch {
    pub fn new() -> Self {
        Self::default()
    }

    fn compiled(&self, term: &str) -> Option<Regex> {
        let Ok(mut cache) = self.cache.lock() else {
            return compile(term);
        };
        match cache.as_ref() {
            Some((cached, regex)) if cached == term => regex.clone(),
            _ => {
                let regex = compile(term);
                *cache = Some((term.to_string(), regex.clone()));
                regex
            }
        }
    }
}

fn compile(term: &str) -> Option<Regex> {
    RegexBuilder::new(term).case_insensitive(true).build().ok()
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

impl MatchPredicate for RegexMatch {
    fn matches(&self, text: &str, term: &str) -> bool {
        let term = strip_whitespace(term);
        if term.is_empty() {
            return true;
        }
        let text = strip_whitespace(text);
        match self.compiled(&term) {
            Some(regex) => regex.is_match(&text),
            None => text.to_lowercase().contains(&term.to_lowercase()),
        }
    }
}

/// Fuzzy predicate using nucleo-matcher, for hosts that prefer
/// subsequence matching ("nyk" matches "New York").
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatch;

impl MatchPredicate for FuzzyMatch {
    fn matches(&self, text: &str, term: &str) -> bool {
        if term.trim().is_empty() {
            return true;
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::new(
            term,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
        );
        let mut buf = Vec::new();
        let haystack = Utf32Str::new(text, &mut buf);
        pattern.score(haystack, &mut matcher).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_term_matches_everything() {
        let m = RegexMatch::new();
        assert!(m.matches("anything", ""));
        assert!(m.matches("anything", "   "));
    }

    #[test]
    fn test_case_insensitive_containment() {
        let m = RegexMatch::new();
        assert!(m.matches("New York", "york"));
        assert!(!m.matches("New York", "paris"));
    }

    #[test]
    fn test_whitespace_stripped_from_both_sides() {
        let m = RegexMatch::new();
        assert!(m.matches("New York", "wy"));
        assert!(m.matches("NewYork", "new york"));
    }

    #[test]
    fn test_regex_term() {
        let m = RegexMatch::new();
        assert!(m.matches("item-42", "^item-\\d+$"));
        assert!(!m.matches("item-x", "^item-\\d+$"));
    }

    #[test]
    fn test_invalid_regex_falls_back_to_literal() {
        let m = RegexMatch::new();
        assert!(m.matches("(Draft) notes", "(draft"));
        assert!(!m.matches("Final notes", "(draft"));
    }

    #[test]
    fn test_fuzzy_subsequence() {
        assert!(FuzzyMatch.matches("New York", "nyk"));
        assert!(!FuzzyMatch.matches("Berlin", "xyz"));
        assert!(FuzzyMatch.matches("Berlin", ""));
    }
}
