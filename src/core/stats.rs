//! core::stats
//!
//! Resolver kinds, data fingerprints and index statistics.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The kind of reference data a resolver serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    /// Administrative areas (country → region → city)
    Area,
    /// Metro stations (city → line → station)
    Metro,
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverKind::Area => write!(f, "area"),
            ResolverKind::Metro => write!(f, "metro"),
        }
    }
}

/// SHA-256 digest of a reference data file.
///
/// Identifies which dataset a running resolver was built from.
///
/// # Example
///
/// ```
/// use georesolve::core::stats::Fingerprint;
///
/// let a = Fingerprint::compute(b"[]");
/// let b = Fingerprint::compute(b"[]");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash raw file contents.
    pub fn compute(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of a built index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub kind: ResolverKind,
    /// Stored entries (one per indexed node or station)
    pub entries: usize,
    /// Distinct normalized keys
    pub keys: usize,
    /// Fuzzy vocabulary size
    pub vocabulary: usize,
    /// Keys mapping to more than one identifier
    pub ambiguous_keys: usize,
    pub max_depth: Option<usize>,
    /// Digest of the source file, if loaded from one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<Fingerprint>,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "kind: {}", self.kind)?;
        writeln!(f, "entries: {}", self.entries)?;
        writeln!(f, "keys: {}", self.keys)?;
        writeln!(f, "vocabulary: {}", self.vocabulary)?;
        writeln!(f, "ambiguous keys: {}", self.ambiguous_keys)?;
        match self.max_depth {
            Some(depth) => writeln!(f, "max depth: {}", depth)?,
            None => writeln!(f, "max depth: -")?,
        }
        match &self.fingerprint {
            Some(fp) => write!(f, "fingerprint: {}", fp),
            None => write!(f, "fingerprint: -"),
        }
    }
}
