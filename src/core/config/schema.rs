//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order (first existing wins):
//! 1. `$GEORESOLVE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/georesolve/config.toml`
//! 3. `~/.georesolve/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing: cutoffs must lie in `(0, 1]`, limits
//! must be positive, prefixes and fallback identifiers must be non-empty.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::similarity::Metric;

/// Resolver configuration file.
///
/// # Example
///
/// ```toml
/// [areas]
/// path = "data/areas.json"
/// fallback_ids = ["113", "1"]
///
/// [metro]
/// path = "data/metro.json"
/// prefixes = ["ст. ", "станция ", "м."]
///
/// [fuzzy]
/// cutoff = 0.75
/// limit = 3
/// metric = "sequence"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Area reference data settings
    pub areas: Option<AreaSection>,

    /// Metro reference data settings
    pub metro: Option<MetroSection>,

    /// Fuzzy matching settings
    pub fuzzy: Option<FuzzySection>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(areas) = &self.areas {
            areas.validate()?;
        }
        if let Some(metro) = &self.metro {
            metro.validate()?;
        }
        if let Some(fuzzy) = &self.fuzzy {
            fuzzy.validate()?;
        }
        Ok(())
    }
}

/// `[areas]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AreaSection {
    /// Path to the area tree JSON
    pub path: Option<String>,

    /// Override of the leading prefixes stripped from names
    pub prefixes: Option<Vec<String>>,

    /// Identifiers returned when nothing matches
    pub fallback_ids: Option<Vec<String>>,
}

impl AreaSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path("areas.path", self.path.as_deref())?;
        validate_prefixes("areas.prefixes", self.prefixes.as_deref())?;

        if let Some(ids) = &self.fallback_ids {
            if ids.iter().any(|id| id.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "areas.fallback_ids cannot contain empty identifiers".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// `[metro]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MetroSection {
    /// Path to the metro tree JSON
    pub path: Option<String>,

    /// Override of the leading prefixes stripped from names
    pub prefixes: Option<Vec<String>>,
}

impl MetroSection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path("metro.path", self.path.as_deref())?;
        validate_prefixes("metro.prefixes", self.prefixes.as_deref())
    }
}

/// `[fuzzy]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FuzzySection {
    /// Minimum similarity, in `(0, 1]`
    pub cutoff: Option<f64>,

    /// Number of close matches considered
    pub limit: Option<usize>,

    /// Similarity metric
    pub metric: Option<Metric>,
}

impl FuzzySection {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cutoff) = self.cutoff {
            if !(cutoff > 0.0 && cutoff <= 1.0) {
                return Err(ConfigError::InvalidValue(format!(
                    "fuzzy.cutoff must be in (0, 1], got {}",
                    cutoff
                )));
            }
        }
        if self.limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "fuzzy.limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_path(key: &str, path: Option<&str>) -> Result<(), ConfigError> {
    match path {
        Some(p) if p.trim().is_empty() => Err(ConfigError::InvalidValue(format!(
            "{} cannot be empty",
            key
        ))),
        _ => Ok(()),
    }
}

fn validate_prefixes(key: &str, prefixes: Option<&[String]>) -> Result<(), ConfigError> {
    if let Some(prefixes) = prefixes {
        if prefixes.iter().any(|p| p.is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "{} cannot contain empty prefixes",
                key
            )));
        }
    }
    Ok(())
}
