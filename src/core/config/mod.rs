//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Config file
//! 3. CLI flags (`--areas`, `--metro`)
//!
//! # Config Locations
//!
//! An explicit `--config <path>` must exist. Otherwise searched in order:
//! 1. `$GEORESOLVE_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/georesolve/config.toml`
//! 3. `~/.georesolve/config.toml` (canonical write location)
//!
//! A missing config file is not an error; defaults are used. Relative data
//! paths inside a config file are resolved against the file's directory.
//!
//! # Example
//!
//! ```no_run
//! use georesolve::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! let config = result.config;
//!
//! println!("Areas: {}", config.areas_path().display());
//! println!("Cutoff: {}", config.fuzzy().cutoff);
//! ```

pub mod schema;

pub use schema::{AreaSection, ConfigFile, FuzzySection, MetroSection};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::normalize::{AREA_PREFIXES, METRO_PREFIXES};
use crate::core::resolver::{FuzzyOptions, NoMatch, FALLBACK_IDS};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GEORESOLVE_CONFIG";

/// Default area data location, relative to the working directory.
pub const DEFAULT_AREAS_PATH: &str = "data/areas.json";

/// Default metro data location, relative to the working directory.
pub const DEFAULT_METRO_PATH: &str = "data/metro.json";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("config file '{0}' already exists")]
    AlreadyExists(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Effective configuration.
///
/// Accessor methods apply defaults and CLI overrides automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed config file contents
    pub file: ConfigFile,
    /// Path the config file was loaded from
    path: Option<PathBuf>,
    areas_override: Option<PathBuf>,
    metro_override: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// If `explicit` is given, that file must exist. Otherwise the standard
    /// locations are searched.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated, or if an explicit path does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => Self::discover(&mut warnings),
        };

        let config = match path {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };

        Ok(ConfigLoadResult { config, warnings })
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
            ..Default::default()
        })
    }

    /// Find a config file in the standard locations.
    fn discover(warnings: &mut Vec<ConfigWarning>) -> Option<PathBuf> {
        // 1. Check $GEORESOLVE_CONFIG
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            warnings.push(ConfigWarning {
                message: format!("{} points to a missing file; ignoring it", CONFIG_ENV),
                path,
            });
        }

        // 2. Check $XDG_CONFIG_HOME/georesolve/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("georesolve/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.georesolve/config.toml
        dirs::home_dir()
            .map(|home| home.join(".georesolve/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.georesolve/config.toml`.
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".georesolve/config.toml"))
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Refuses to replace an existing
    /// file unless `overwrite` is set.
    pub fn write(path: &Path, file: &ConfigFile, overwrite: bool) -> Result<(), ConfigError> {
        if path.exists() && !overwrite {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(file).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Write to temp file in same directory (for atomic rename)
        let temp_path = path.with_extension("toml.tmp");
        let mut temp = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        temp.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        temp.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// The config file contents with every default spelled out.
    pub fn defaults_file() -> ConfigFile {
        ConfigFile {
            areas: Some(AreaSection {
                path: Some(DEFAULT_AREAS_PATH.to_string()),
                prefixes: Some(AREA_PREFIXES.iter().map(|s| s.to_string()).collect()),
                fallback_ids: Some(FALLBACK_IDS.iter().map(|s| s.to_string()).collect()),
            }),
            metro: Some(MetroSection {
                path: Some(DEFAULT_METRO_PATH.to_string()),
                prefixes: Some(METRO_PREFIXES.iter().map(|s| s.to_string()).collect()),
            }),
            fuzzy: Some(FuzzySection {
                cutoff: Some(crate::core::resolver::DEFAULT_CUTOFF),
                limit: Some(crate::core::resolver::DEFAULT_LIMIT),
                metric: Some(Default::default()),
            }),
        }
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    /// Override the area data path (CLI flag).
    pub fn with_areas_path(mut self, path: PathBuf) -> Self {
        self.areas_override = Some(path);
        self
    }

    /// Override the metro data path (CLI flag).
    pub fn with_metro_path(mut self, path: PathBuf) -> Self {
        self.metro_override = Some(path);
        self
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Path to the area tree.
    ///
    /// Defaults to `data/areas.json`.
    pub fn areas_path(&self) -> PathBuf {
        if let Some(path) = &self.areas_override {
            return path.clone();
        }
        let configured = self.file.areas.as_ref().and_then(|a| a.path.as_deref());
        self.data_path(configured, DEFAULT_AREAS_PATH)
    }

    /// Path to the metro tree.
    ///
    /// Defaults to `data/metro.json`.
    pub fn metro_path(&self) -> PathBuf {
        if let Some(path) = &self.metro_override {
            return path.clone();
        }
        let configured = self.file.metro.as_ref().and_then(|m| m.path.as_deref());
        self.data_path(configured, DEFAULT_METRO_PATH)
    }

    fn data_path(&self, configured: Option<&str>, default: &str) -> PathBuf {
        match configured {
            Some(p) => {
                let p = PathBuf::from(p);
                match self.path.as_deref().and_then(Path::parent) {
                    Some(base) if p.is_relative() => base.join(p),
                    _ => p,
                }
            }
            None => PathBuf::from(default),
        }
    }

    /// Prefixes stripped from area names.
    pub fn area_prefixes(&self) -> Vec<String> {
        self.file
            .areas
            .as_ref()
            .and_then(|a| a.prefixes.clone())
            .unwrap_or_else(|| AREA_PREFIXES.iter().map(|s| s.to_string()).collect())
    }

    /// Prefixes stripped from metro station names.
    pub fn metro_prefixes(&self) -> Vec<String> {
        self.file
            .metro
            .as_ref()
            .and_then(|m| m.prefixes.clone())
            .unwrap_or_else(|| METRO_PREFIXES.iter().map(|s| s.to_string()).collect())
    }

    /// What the area resolver returns when nothing matches.
    ///
    /// Defaults to `["113", "1"]`.
    pub fn area_no_match(&self) -> NoMatch {
        match self.file.areas.as_ref().and_then(|a| a.fallback_ids.clone()) {
            Some(ids) => NoMatch::Fallback(ids),
            None => NoMatch::area_default(),
        }
    }

    /// Fuzzy matching parameters.
    ///
    /// Defaults to cutoff 0.75, limit 3, sequence metric.
    pub fn fuzzy(&self) -> FuzzyOptions {
        let defaults = FuzzyOptions::default();
        match &self.file.fuzzy {
            Some(f) => FuzzyOptions {
                cutoff: f.cutoff.unwrap_or(defaults.cutoff),
                limit: f.limit.unwrap_or(defaults.limit),
                metric: f.metric.unwrap_or(defaults.metric),
            },
            None => defaults,
        }
    }

    /// Get the path the config file was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The configuration actually in effect, with defaults and overrides
    /// resolved into a complete file.
    pub fn effective(&self) -> ConfigFile {
        let fallback_ids = match self.area_no_match() {
            NoMatch::Fallback(ids) => Some(ids),
            NoMatch::Empty => None,
        };
        let fuzzy = self.fuzzy();

        ConfigFile {
            areas: Some(AreaSection {
                path: Some(self.areas_path().display().to_string()),
                prefixes: Some(self.area_prefixes()),
                fallback_ids,
            }),
            metro: Some(MetroSection {
                path: Some(self.metro_path().display().to_string()),
                prefixes: Some(self.metro_prefixes()),
            }),
            fuzzy: Some(FuzzySection {
                cutoff: Some(fuzzy.cutoff),
                limit: Some(fuzzy.limit),
                metric: Some(fuzzy.metric),
            }),
        }
    }
}
