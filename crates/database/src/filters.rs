//! Helpers shared by the list filters.
//!
//! Admin lists load the whole table and then narrow it down, so most
//! predicates here work on already fetched models. The public teacher
//! search runs in SQL and only borrows the needle handling.

use serde::Deserialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Normalized search needle; `None` when the term is blank
pub fn search_term(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Escapes `LIKE` wildcards so the needle matches literally under `ESCAPE '\'`
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive substring test against a lower-cased needle
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive ordering for display names
pub fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// `true` when the optional equality filter is unset or matches
pub fn matches_opt<T: PartialEq>(filter: Option<T>, value: T) -> bool {
    filter.is_none_or(|f| f == value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_search_is_ignored() {
        assert_eq!(search_term(Some("   ")), None);
        assert_eq!(search_term(None), None);
        assert_eq!(search_term(Some(" García ")), Some("garcía".to_string()));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like(r"a\b"), r"a\\b");
        assert_eq!(escape_like("garcía"), "garcía");
    }

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("Cálculo Diferencial", "cálculo"));
        assert!(!contains_ci("Física", "quím"));
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
    }

    #[test]
    fn test_matches_opt() {
        assert!(matches_opt(None, true));
        assert!(matches_opt(Some(true), true));
        assert!(!matches_opt(Some(false), true));
    }
}
