//! core::resolver
//!
//! Free-form name → canonical identifiers.
//!
//! # Strategy ladder
//!
//! Evaluated in order; the first strategy producing identifiers wins:
//!
//! 1. **Blank**: input normalizes to nothing → no-match policy
//! 2. **Exact**: the normalized input is an index key
//! 3. **Token**: the rightmost whitespace token that is an index key
//! 4. **Fuzzy**: the best vocabulary name above the similarity cutoff
//! 5. **Fallback**: no-match policy
//!
//! The no-match policy differs per kind: areas fall back to a fixed list of
//! default identifiers (country and capital), metro returns nothing.
//!
//! # Concurrency
//!
//! A resolver is immutable after construction and `Send + Sync`; share it
//! behind an `Arc` and call [`Resolver::resolve`] from any thread.
//!
//! # Example
//!
//! ```
//! use georesolve::core::resolver::AreaResolver;
//! use georesolve::core::tree::AreaNode;
//!
//! let forest = vec![AreaNode::with_children(
//!     "113",
//!     "Россия",
//!     vec![AreaNode::leaf("1", "Москва")],
//! )];
//! let resolver = AreaResolver::from_forest(&forest);
//!
//! assert_eq!(resolver.resolve("г. Москва"), vec!["1"]);
//! assert_eq!(resolver.resolve(""), vec!["113", "1"]);
//! ```

use serde::Serialize;

use super::index::{
    build_area_index, build_metro_index, AreaEntry, IndexEntry, MetroEntry, NameIndex,
};
use super::normalize::Normalizer;
use super::select::choose_best;
use super::similarity::{close_matches, Metric};
use super::stats::{Fingerprint, IndexStats, ResolverKind};
use super::tree::{AreaNode, MetroCity};

/// Area identifiers returned when nothing matches: Russia (113), Moscow (1).
pub const FALLBACK_IDS: [&str; 2] = ["113", "1"];

/// Default similarity cutoff for the fuzzy step.
pub const DEFAULT_CUTOFF: f64 = 0.75;

/// Default number of fuzzy candidates considered.
pub const DEFAULT_LIMIT: usize = 3;

/// What to return when no strategy matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatch {
    /// Return a copy of these identifiers
    Fallback(Vec<String>),
    /// Return nothing
    Empty,
}

impl NoMatch {
    /// The built-in area fallback.
    pub fn area_default() -> Self {
        NoMatch::Fallback(FALLBACK_IDS.iter().map(|s| s.to_string()).collect())
    }

    fn ids(&self) -> Vec<String> {
        match self {
            NoMatch::Fallback(ids) => ids.clone(),
            NoMatch::Empty => Vec::new(),
        }
    }
}

/// Fuzzy step parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyOptions {
    /// Minimum similarity in `(0, 1]`
    pub cutoff: f64,
    /// Number of close matches considered
    pub limit: usize,
    pub metric: Metric,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            limit: DEFAULT_LIMIT,
            metric: Metric::default(),
        }
    }
}

/// The strategy that produced a [`Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Blank,
    Exact,
    Token,
    Fuzzy,
    Fallback,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::Blank => "blank",
            Strategy::Exact => "exact",
            Strategy::Token => "token",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Fallback => "fallback",
        };
        write!(f, "{}", s)
    }
}

/// Identifiers for one query, with how they were found.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Canonical identifiers, sorted unless taken from the fallback list
    pub ids: Vec<String>,
    pub strategy: Strategy,
    /// The normalized query
    pub normalized: String,
    /// Index key whose bucket supplied the identifiers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_key: Option<String>,
    /// Similarity of the fuzzy match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Resolver over one kind of reference data.
#[derive(Debug, Clone)]
pub struct Resolver<E> {
    kind: ResolverKind,
    index: NameIndex<E>,
    normalizer: Normalizer,
    fuzzy: FuzzyOptions,
    no_match: NoMatch,
    fingerprint: Option<Fingerprint>,
}

/// Resolver for administrative areas.
pub type AreaResolver = Resolver<AreaEntry>;

/// Resolver for metro stations.
pub type MetroResolver = Resolver<MetroEntry>;

impl AreaResolver {
    /// Build an area resolver with default prefixes, fuzzy options and fallback.
    pub fn from_forest(forest: &[AreaNode]) -> Self {
        let normalizer = Normalizer::areas();
        let index = build_area_index(forest, &normalizer);
        Resolver::new(
            ResolverKind::Area,
            index,
            normalizer,
            FuzzyOptions::default(),
            NoMatch::area_default(),
        )
    }
}

impl MetroResolver {
    /// Build a metro resolver with default prefixes and fuzzy options.
    pub fn from_cities(cities: &[MetroCity]) -> Self {
        let normalizer = Normalizer::metro();
        let index = build_metro_index(cities, &normalizer);
        Resolver::new(
            ResolverKind::Metro,
            index,
            normalizer,
            FuzzyOptions::default(),
            NoMatch::Empty,
        )
    }
}

impl<E: IndexEntry> Resolver<E> {
    /// Wrap a built index.
    ///
    /// `normalizer` must be the one the index was built with, otherwise
    /// queries will not line up with index keys.
    pub fn new(
        kind: ResolverKind,
        index: NameIndex<E>,
        normalizer: Normalizer,
        fuzzy: FuzzyOptions,
        no_match: NoMatch,
    ) -> Self {
        Self {
            kind,
            index,
            normalizer,
            fuzzy,
            no_match,
            fingerprint: None,
        }
    }

    /// Attach the fingerprint of the data the index was built from.
    pub fn with_fingerprint(mut self, fingerprint: Fingerprint) -> Self {
        self.fingerprint = Some(fingerprint);
        self
    }

    /// Resolve a user query into canonical identifiers.
    ///
    /// Never fails; unmatched input yields the no-match policy. The returned
    /// vector is owned by the caller.
    pub fn resolve(&self, user_input: &str) -> Vec<String> {
        self.resolve_detailed(user_input).ids
    }

    /// Resolve a user query and report the strategy that matched.
    pub fn resolve_detailed(&self, user_input: &str) -> Resolution {
        let normalized = self.normalizer.normalize(user_input);
        let resolution = self.run_ladder(normalized);

        tracing::debug!(
            kind = %self.kind,
            input = user_input,
            normalized = %resolution.normalized,
            strategy = %resolution.strategy,
            matched_key = resolution.matched_key.as_deref().unwrap_or(""),
            ids = ?resolution.ids,
            "resolved"
        );

        resolution
    }

    fn run_ladder(&self, normalized: String) -> Resolution {
        if normalized.is_empty() {
            return self.no_match_resolution(Strategy::Blank, normalized);
        }

        if let Some(ids) = self.select(&normalized) {
            let key = normalized.clone();
            return Resolution {
                ids,
                strategy: Strategy::Exact,
                normalized,
                matched_key: Some(key),
                score: None,
            };
        }

        let token_hit = normalized
            .split_whitespace()
            .rev()
            .find_map(|token| self.select(token).map(|ids| (token.to_string(), ids)));
        if let Some((token, ids)) = token_hit {
            return Resolution {
                ids,
                strategy: Strategy::Token,
                normalized,
                matched_key: Some(token),
                score: None,
            };
        }

        let fuzzy_hit = close_matches(
            &normalized,
            self.index.vocabulary(),
            self.fuzzy.limit,
            self.fuzzy.cutoff,
            self.fuzzy.metric,
        )
        .into_iter()
        .next()
        .and_then(|best| {
            self.select(best.name)
                .map(|ids| (best.name.to_string(), best.score, ids))
        });
        if let Some((key, score, ids)) = fuzzy_hit {
            return Resolution {
                ids,
                strategy: Strategy::Fuzzy,
                normalized,
                matched_key: Some(key),
                score: Some(score),
            };
        }

        self.no_match_resolution(Strategy::Fallback, normalized)
    }

    /// Best identifiers for an index key, or `None` if nothing is there.
    fn select(&self, key: &str) -> Option<Vec<String>> {
        self.index
            .lookup(key)
            .map(|bucket| choose_best(bucket))
            .filter(|ids| !ids.is_empty())
    }

    fn no_match_resolution(&self, strategy: Strategy, normalized: String) -> Resolution {
        Resolution {
            ids: self.no_match.ids(),
            strategy,
            normalized,
            matched_key: None,
            score: None,
        }
    }

    /// Which reference data this resolver serves.
    pub fn kind(&self) -> ResolverKind {
        self.kind
    }

    /// The underlying index.
    pub fn index(&self) -> &NameIndex<E> {
        &self.index
    }

    /// The normalizer applied to queries and index keys.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Fuzzy step parameters.
    pub fn fuzzy_options(&self) -> FuzzyOptions {
        self.fuzzy
    }

    /// Summary statistics of the index.
    pub fn stats(&self) -> IndexStats {
        IndexStats {
            kind: self.kind,
            entries: self.index.entries().len(),
            keys: self.index.key_count(),
            vocabulary: self.index.vocabulary().len(),
            ambiguous_keys: self.index.ambiguous_key_count(),
            max_depth: self.index.max_depth(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}
