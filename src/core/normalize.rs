//! core::normalize
//!
//! Canonical comparison keys for place and station names.
//!
//! # Algorithm
//!
//! A single normalization pass:
//! 1. Trim and lower-case (Unicode aware, folds Cyrillic and Latin)
//! 2. Strip one leading locational prefix (`г.`, `пос `, `станция `, ...)
//! 3. Replace commas with spaces
//! 4. Drop everything except digits, word characters, whitespace,
//!    Cyrillic letters and `-`
//! 5. Collapse whitespace runs and trim
//!
//! Passes are repeated while they keep shortening the string, so a prefix
//! exposed by step 4 (`"г. г. москва"`) is stripped as well and the result is
//! a fixed point: `normalize(normalize(x)) == normalize(x)`.
//!
//! Area and metro names share the algorithm and differ only in their prefix
//! vocabulary.
//!
//! # Example
//!
//! ```
//! use georesolve::core::normalize::Normalizer;
//!
//! let areas = Normalizer::areas();
//! assert_eq!(areas.normalize("г. Москва"), "москва");
//! assert_eq!(areas.normalize("  Санкт-Петербург, (центр) "), "санкт-петербург центр");
//! assert_eq!(areas.normalize(""), "");
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Prefixes stripped from administrative area names.
pub const AREA_PREFIXES: &[&str] = &[
    "г.", "г ", "город ", "пос.", "пос ", "пгт ", "деревня ", "мкр ", "р-н ", "р.н.",
];

/// Prefixes stripped from metro station names.
pub const METRO_PREFIXES: &[&str] = &[
    "ст. ", "ст ", "станция ", "м.", "м ", "г.", "г ", "город ",
];

static NON_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9\w\sа-яёА-ЯЁ\-]").expect("static pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

/// Name normalizer configured with a prefix vocabulary.
#[derive(Debug, Clone)]
pub struct Normalizer {
    prefixes: Option<Regex>,
}

impl Normalizer {
    /// Normalizer for administrative area names.
    pub fn areas() -> Self {
        Self::with_prefixes(AREA_PREFIXES).expect("built-in area prefixes are valid")
    }

    /// Normalizer for metro station names.
    pub fn metro() -> Self {
        Self::with_prefixes(METRO_PREFIXES).expect("built-in metro prefixes are valid")
    }

    /// Build a normalizer that strips the given literal prefixes.
    ///
    /// Prefixes are matched case-insensitively at the start of the trimmed
    /// input, first listed wins. An empty list disables prefix stripping.
    ///
    /// # Errors
    ///
    /// Returns the underlying regex error if the combined pattern exceeds the
    /// regex size limits.
    pub fn with_prefixes<S: AsRef<str>>(prefixes: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = prefixes
            .iter()
            .map(|p| p.as_ref().to_lowercase())
            .filter(|p| !p.is_empty())
            .map(|p| regex::escape(&p))
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { prefixes: None });
        }

        let pattern = format!(r"(?i)^\s*(?:{})\s*", alternatives.join("|"));
        Ok(Self {
            prefixes: Some(Regex::new(&pattern)?),
        })
    }

    /// Normalize a raw name into its comparison key.
    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        loop {
            let next = self.pass(&current);
            if next.len() >= current.len() {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let lowered = raw.trim().to_lowercase();
        let stripped = match &self.prefixes {
            Some(re) => re.replace(&lowered, ""),
            None => lowered.as_str().into(),
        };
        let spaced = stripped.replace(',', " ");
        let cleaned = NON_NAME_CHARS.replace_all(&spaced, "");
        let collapsed = WHITESPACE_RUN.replace_all(&cleaned, " ");

        collapsed.trim().to_string()
    }
}
