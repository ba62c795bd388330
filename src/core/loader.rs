//! core::loader
//!
//! One-time construction of resolvers from reference data files.
//!
//! # Lifecycle
//!
//! Reference files are read once at startup. A missing, unreadable or
//! malformed file is a [`LoadError`]: the caller should refuse to start
//! rather than run with a partial resolver. After loading, resolvers are
//! immutable and handed out as `Arc`s through [`Resolvers`].

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use super::config::Config;
use super::index::{build_area_index, build_metro_index};
use super::normalize::Normalizer;
use super::resolver::{AreaResolver, MetroResolver, NoMatch, Resolver};
use super::stats::{Fingerprint, ResolverKind};
use super::tree::{parse_areas, parse_metro};

/// Errors from building a resolver.
///
/// Distinct from a failed match: a `LoadError` means the resolver is
/// unusable.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {kind} reference data '{path}': {source}")]
    Read {
        kind: ResolverKind,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed {kind} reference data '{path}': {source}")]
    Parse {
        kind: ResolverKind,
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid {kind} prefix configuration: {source}")]
    Prefixes {
        kind: ResolverKind,
        source: regex::Error,
    },
}

impl LoadError {
    /// Which resolver failed to load.
    pub fn kind(&self) -> ResolverKind {
        match self {
            LoadError::Read { kind, .. }
            | LoadError::Parse { kind, .. }
            | LoadError::Prefixes { kind, .. } => *kind,
        }
    }
}

/// Build the area resolver from the configured data file.
pub fn load_area_resolver(config: &Config) -> Result<AreaResolver, LoadError> {
    let kind = ResolverKind::Area;
    let path = config.areas_path();
    let bytes = read(kind, &path)?;

    let text = decode(kind, &path, &bytes)?;
    let forest = parse_areas(text).map_err(|source| LoadError::Parse {
        kind,
        path: path.clone(),
        source,
    })?;

    let normalizer = normalizer(kind, &config.area_prefixes())?;
    let index = build_area_index(&forest, &normalizer);
    let resolver = Resolver::new(kind, index, normalizer, config.fuzzy(), config.area_no_match())
        .with_fingerprint(Fingerprint::compute(&bytes));

    log_loaded(&path, &resolver.stats());
    Ok(resolver)
}

/// Build the metro resolver from the configured data file.
pub fn load_metro_resolver(config: &Config) -> Result<MetroResolver, LoadError> {
    let kind = ResolverKind::Metro;
    let path = config.metro_path();
    let bytes = read(kind, &path)?;

    let text = decode(kind, &path, &bytes)?;
    let cities = parse_metro(text).map_err(|source| LoadError::Parse {
        kind,
        path: path.clone(),
        source,
    })?;

    let normalizer = normalizer(kind, &config.metro_prefixes())?;
    let index = build_metro_index(&cities, &normalizer);
    let resolver = Resolver::new(kind, index, normalizer, config.fuzzy(), NoMatch::Empty)
        .with_fingerprint(Fingerprint::compute(&bytes));

    log_loaded(&path, &resolver.stats());
    Ok(resolver)
}

fn read(kind: ResolverKind, path: &Path) -> Result<Vec<u8>, LoadError> {
    fs::read(path).map_err(|source| LoadError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })
}

/// Decode file contents as UTF-8, tolerating a leading byte order mark.
fn decode<'b>(kind: ResolverKind, path: &Path, bytes: &'b [u8]) -> Result<&'b str, LoadError> {
    let text = std::str::from_utf8(bytes).map_err(|e| LoadError::Read {
        kind,
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

fn normalizer(kind: ResolverKind, prefixes: &[String]) -> Result<Normalizer, LoadError> {
    Normalizer::with_prefixes(prefixes).map_err(|source| LoadError::Prefixes { kind, source })
}

fn log_loaded(path: &Path, stats: &super::stats::IndexStats) {
    tracing::info!(
        kind = %stats.kind,
        path = %path.display(),
        entries = stats.entries,
        vocabulary = stats.vocabulary,
        ambiguous_keys = stats.ambiguous_keys,
        fingerprint = stats.fingerprint.as_ref().map(|f| f.short()).unwrap_or("-"),
        "loaded reference index"
    );
}

/// Both resolvers, built once and shared read-only.
///
/// This is the application state handed to request handling code. Clone it
/// freely; clones share the same resolvers.
#[derive(Debug, Clone)]
pub struct Resolvers {
    pub areas: Arc<AreaResolver>,
    pub metro: Arc<MetroResolver>,
}

impl Resolvers {
    /// Load both resolvers eagerly.
    ///
    /// # Errors
    ///
    /// Fails on the first reference file that cannot be loaded.
    pub fn load(config: &Config) -> Result<Self, LoadError> {
        Ok(Self {
            areas: Arc::new(load_area_resolver(config)?),
            metro: Arc::new(load_metro_resolver(config)?),
        })
    }

    /// Wrap already-built resolvers.
    pub fn new(areas: AreaResolver, metro: MetroResolver) -> Self {
        Self {
            areas: Arc::new(areas),
            metro: Arc::new(metro),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const AREAS: &str = r#"[{"id": "113", "name": "Россия", "areas": [
        {"id": "1", "name": "Москва", "areas": []}
    ]}]"#;

    const METRO: &str = r#"[{"id": "1", "name": "Москва", "lines": [
        {"id": "l1", "name": "Сокольническая", "stations": [{"id": "s1", "name": "Сокольники"}]}
    ]}]"#;

    fn config_for(dir: &Path) -> Config {
        Config::default()
            .with_areas_path(dir.join("areas.json"))
            .with_metro_path(dir.join("metro.json"))
    }

    #[test]
    fn loads_both_resolvers() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("areas.json"), AREAS).unwrap();
        fs::write(temp.path().join("metro.json"), METRO).unwrap();

        let resolvers = Resolvers::load(&config_for(temp.path())).unwrap();

        assert_eq!(resolvers.areas.resolve("москва"), vec!["1"]);
        assert_eq!(resolvers.metro.resolve("сокольники"), vec!["s1"]);
        assert_eq!(
            resolvers.areas.stats().fingerprint,
            Some(Fingerprint::compute(AREAS.as_bytes()))
        );
    }

    #[test]
    fn missing_file_is_read_error() {
        let temp = TempDir::new().unwrap();
        let err = load_area_resolver(&config_for(temp.path())).unwrap_err();

        assert!(matches!(err, LoadError::Read { .. }));
        assert_eq!(err.kind(), ResolverKind::Area);
        assert!(err.to_string().contains("area reference data"));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("metro.json"), r#"{"not": "a list"}"#).unwrap();

        let err = load_metro_resolver(&config_for(temp.path())).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(err.kind(), ResolverKind::Metro);
    }

    #[test]
    fn invalid_utf8_is_read_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("areas.json"), [0xff, 0xfe, 0x00]).unwrap();

        let err = load_area_resolver(&config_for(temp.path())).unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn byte_order_mark_is_tolerated() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("areas.json"), format!("\u{feff}{}", AREAS)).unwrap();

        let resolver = load_area_resolver(&config_for(temp.path())).unwrap();
        assert_eq!(resolver.resolve("россия"), vec!["113"]);
    }

    #[test]
    fn metro_failure_fails_whole_load() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("areas.json"), AREAS).unwrap();

        let err = Resolvers::load(&config_for(temp.path())).unwrap_err();
        assert_eq!(err.kind(), ResolverKind::Metro);
    }

    #[test]
    fn configured_fallback_is_used() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("areas.json"), AREAS).unwrap();
        let config_path = temp.path().join("config.toml");
        fs::write(
            &config_path,
            "[areas]\npath = \"areas.json\"\nfallback_ids = [\"1\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        let resolver = load_area_resolver(&config).unwrap();

        assert_eq!(resolver.resolve(""), vec!["1"]);
    }
}
