//! core
//!
//! Name resolution for administrative areas and metro stations.
//!
//! # Modules
//!
//! - [`normalize`] - Canonical form of free-form names
//! - [`tree`] - Reference data trees and their JSON shape
//! - [`index`] - Normalized name → entry indexes
//! - [`select`] - Choosing among candidates sharing a key
//! - [`similarity`] - Fuzzy matching over the index vocabulary
//! - [`resolver`] - The exact → token → fuzzy → fallback ladder
//! - [`loader`] - Building resolvers from reference files
//! - [`query`] - Vacancy search query construction
//! - [`stats`] - Resolver kinds, fingerprints and index statistics
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Indexes are built once and never mutated afterwards
//! - Resolution never fails; an unmatched query yields the fallback
//! - All matching is deterministic

pub mod config;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod query;
pub mod resolver;
pub mod select;
pub mod similarity;
pub mod stats;
pub mod tree;
