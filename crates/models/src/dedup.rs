use std::{collections::HashSet, hash::Hash};

/// Keeps the first item for every distinct key, preserving input order.
///
/// Joined queries return one row per assignment, so a subject taught in
/// several semesters shows up several times; this collapses those rows.
pub fn dedup_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}
