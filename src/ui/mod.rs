//! ui
//!
//! User-facing output utilities.
//!
//! # Modules
//!
//! - [`output`] - Output formatting and display
//!
//! # Design
//!
//! All user-facing output goes through this module so that quiet mode and
//! JSON output behave the same in every command. Diagnostics go to the
//! `tracing` subscriber instead.

pub mod output;
