//! core::select
//!
//! Candidate selection among entries sharing a normalized name.
//!
//! Deeper nodes are more specific: a settlement beats the region or country
//! that shares its name. Entries tied at the maximum depth are all returned,
//! since the downstream search accepts several alternative identifiers for
//! one query term.

use std::collections::BTreeSet;

use super::index::IndexEntry;

/// Identifiers of the deepest candidates, deduplicated and sorted.
///
/// # Example
///
/// ```
/// use georesolve::core::index::AreaEntry;
/// use georesolve::core::select::choose_best;
///
/// let region = AreaEntry { id: "2019".into(), name: "Москва".into(), depth: 1, path: String::new() };
/// let city = AreaEntry { id: "1".into(), name: "Москва".into(), depth: 2, path: String::new() };
///
/// assert_eq!(choose_best([&region, &city]), vec!["1".to_string()]);
/// assert!(choose_best(Vec::<&AreaEntry>::new()).is_empty());
/// ```
pub fn choose_best<'a, E, I>(candidates: I) -> Vec<String>
where
    E: IndexEntry + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let candidates: Vec<&E> = candidates.into_iter().collect();
    let Some(max_depth) = candidates.iter().map(|c| c.depth()).max() else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|c| c.depth() == max_depth)
        .map(|c| c.id())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
