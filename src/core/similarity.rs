//! core::similarity
//!
//! Approximate string matching for the fuzzy resolution step.
//!
//! # Metrics
//!
//! - [`Metric::Sequence`] (default): Ratcliff/Obershelp gestalt ratio,
//!   `2·M / (|a| + |b|)` where `M` counts the characters in the recursively
//!   found longest common blocks. Strings are compared per Unicode scalar.
//! - [`Metric::Levenshtein`]: `strsim::normalized_levenshtein`.
//!
//! # Cost
//!
//! [`close_matches`] scores every vocabulary name. Cheap upper bounds reject
//! most names before the full ratio is computed, but the worst case is
//! O(V·L²) for the sequence metric (V names of length L). This is fine for
//! national area and metro vocabularies (tens of thousands of names) and is
//! the scaling limit of the resolver.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Similarity metric used by the fuzzy step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Longest-matching-blocks ratio
    #[default]
    Sequence,
    /// Normalized Levenshtein similarity
    Levenshtein,
}

impl Metric {
    /// Valid metric names, as accepted in configuration.
    pub const NAMES: &'static [&'static str] = &["sequence", "levenshtein"];

    /// Similarity of `a` and `b` in `[0, 1]`.
    pub fn score(self, a: &str, b: &str) -> f64 {
        match self {
            Metric::Sequence => sequence_ratio(a, b),
            Metric::Levenshtein => strsim::normalized_levenshtein(a, b),
        }
    }

    /// A bound `>= score(a, b)` that is cheap to compute.
    fn upper_bound(self, a: &[char], b: &[char]) -> f64 {
        let (la, lb) = (a.len(), b.len());
        if la + lb == 0 {
            return 1.0;
        }
        match self {
            Metric::Sequence => {
                let length_bound = 2.0 * la.min(lb) as f64 / (la + lb) as f64;
                if length_bound == 0.0 {
                    return 0.0;
                }
                length_bound.min(multiset_ratio(a, b))
            }
            Metric::Levenshtein => 1.0 - la.abs_diff(lb) as f64 / la.max(lb) as f64,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Sequence => write!(f, "sequence"),
            Metric::Levenshtein => write!(f, "levenshtein"),
        }
    }
}

/// A vocabulary name that scored above the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseMatch<'a> {
    pub name: &'a str,
    pub score: f64,
}

/// Best `limit` vocabulary names with `score >= cutoff`.
///
/// Ordered by score, highest first; equal scores put the greater name first.
///
/// # Example
///
/// ```
/// use georesolve::core::similarity::{close_matches, Metric};
///
/// let vocabulary = vec!["казань".to_string(), "москва".to_string(), "тверь".to_string()];
/// let matches = close_matches("масква", &vocabulary, 3, 0.75, Metric::Sequence);
///
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0].name, "москва");
/// ```
pub fn close_matches<'a>(
    word: &str,
    vocabulary: &'a [String],
    limit: usize,
    cutoff: f64,
    metric: Metric,
) -> Vec<CloseMatch<'a>> {
    if limit == 0 {
        return Vec::new();
    }

    let word_chars: Vec<char> = word.chars().collect();
    let mut matches: Vec<CloseMatch<'a>> = vocabulary
        .iter()
        .filter_map(|name| {
            let name_chars: Vec<char> = name.chars().collect();
            if metric.upper_bound(&name_chars, &word_chars) < cutoff {
                return None;
            }
            let score = match metric {
                Metric::Sequence => SequenceMatcher::new(&name_chars, &word_chars).ratio(),
                Metric::Levenshtein => metric.score(name, word),
            };
            (score >= cutoff).then_some(CloseMatch {
                name: name.as_str(),
                score,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.name.cmp(a.name))
    });
    matches.truncate(limit);
    matches
}

/// Gestalt similarity ratio of two strings.
///
/// # Example
///
/// ```
/// use georesolve::core::similarity::sequence_ratio;
///
/// assert_eq!(sequence_ratio("abcd", "bcde"), 0.75);
/// assert_eq!(sequence_ratio("", ""), 1.0);
/// ```
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    SequenceMatcher::new(&a, &b).ratio()
}

/// Ratio computed from the character multiset intersection.
fn multiset_ratio(a: &[char], b: &[char]) -> f64 {
    let mut available: HashMap<char, usize> = HashMap::new();
    for &c in b {
        *available.entry(c).or_default() += 1;
    }
    let mut common = 0usize;
    for c in a {
        if let Some(n) = available.get_mut(c) {
            if *n > 0 {
                *n -= 1;
                common += 1;
            }
        }
    }
    2.0 * common as f64 / (a.len() + b.len()) as f64
}

/// Longest-matching-blocks matcher over two character sequences.
struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character in `b`, ascending
    b_positions: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_positions.entry(c).or_default().push(j);
        }
        Self { a, b, b_positions }
    }

    fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_chars() as f64 / total as f64
    }

    /// Total size of the matching blocks.
    fn matched_chars(&self) -> usize {
        let mut matched = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }

    /// Longest common block of `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Returns `(i, j, k)` with `a[i..i+k] == b[j..j+k]`. Among blocks of
    /// maximal size the one starting earliest in `a`, then in `b`, wins.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        // run length of the match ending at b[j], for the previous row of a
        let mut run_ending: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_run: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b_positions.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_ending.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            run_ending = next_run;
        }

        (best_i, best_j, best_k)
    }
}
