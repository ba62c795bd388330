//! core::tree
//!
//! Reference trees as published by the vacancy-search API.
//!
//! # Shapes
//!
//! - Areas: a forest of `{id, name, areas: [...]}` nodes of arbitrary depth
//!   (country → region → city → ...).
//! - Metro: `city {id, name, lines: [line {id, name, stations: [...]}]}`.
//!
//! # Leniency
//!
//! Reference dumps are not always tidy. Identifiers may be strings or
//! numbers and are kept as strings. Missing or `null` identifiers, names and
//! child lists become empty values. Fields this crate does not use
//! (coordinates, colors, ordering) are ignored. Only structurally wrong
//! documents (e.g. a node that is not an object) fail to parse.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A node of the administrative area forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaNode {
    /// Canonical identifier
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    /// Display name
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    /// Child areas
    #[serde(default, deserialize_with = "null_as_default")]
    pub areas: Vec<AreaNode>,
}

impl AreaNode {
    /// Create a leaf node.
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            areas: Vec::new(),
        }
    }

    /// Create a node with children.
    pub fn with_children(
        id: impl Into<String>,
        name: impl Into<String>,
        areas: Vec<AreaNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            areas,
        }
    }
}

/// A city in the metro forest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetroCity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub lines: Vec<MetroLine>,
}

/// A metro line within a city.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetroLine {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub stations: Vec<MetroStation>,
}

/// A station on a metro line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetroStation {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
}

/// Parse an area forest from JSON text.
pub fn parse_areas(json: &str) -> Result<Vec<AreaNode>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Parse a metro forest from JSON text.
pub fn parse_metro(json: &str) -> Result<Vec<MetroCity>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Accept strings, numbers, booleans or `null` and keep them as a string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => {
            return Err(serde::de::Error::custom(format!(
                "expected a string or number, found {}",
                other
            )))
        }
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
