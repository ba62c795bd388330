//! Georesolve - resolution of free-form place names to reference identifiers
//!
//! Georesolve maps user-typed area names ("г. Москва", "Масква") and metro
//! station names ("м. Сокольники") to the identifiers used by a vacancy
//! search API, using a fixed strategy ladder: exact match, token suffix,
//! fuzzy match, then fallback.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to core)
//! - [`core`] - Normalization, indexing, resolution and query building
//! - [`ui`] - User-facing output utilities
//!
//! # Guarantees
//!
//! 1. Resolution is total: every query yields a result
//! 2. Equal inputs over equal data yield equal outputs
//! 3. Loaded indexes are immutable and safe to share across threads

pub mod cli;
pub mod core;
pub mod ui;
