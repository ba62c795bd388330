//! ui::output
//!
//! Terminal output for command results.
//!
//! Results (identifiers, query pairs, JSON documents) always reach stdout.
//! Commentary such as explanations, warnings and confirmations is dropped in
//! quiet mode. Log lines are not printed here; they go through `tracing`.

use std::fmt::Display;

use serde::Serialize;

/// How chatty the CLI is, from `--quiet` / `--debug`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Debug,
}

impl Verbosity {
    /// `--quiet` wins over `--debug`.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        match (quiet, debug) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Debug,
            (false, false) => Verbosity::Normal,
        }
    }

    /// Default log filter directive for this level.
    pub fn log_level(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Debug => "debug",
        }
    }

    fn chatty(self) -> bool {
        self != Verbosity::Quiet
    }
}

/// Print commentary to stdout unless quiet.
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity.chatty() {
        println!("{}", message);
    }
}

/// Print an error to stderr, even when quiet.
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning to stderr unless quiet.
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity.chatty() {
        eprintln!("warning: {}", message);
    }
}

/// Confirm a completed action unless quiet.
pub fn success(message: impl Display, verbosity: Verbosity) {
    print(message, verbosity);
}

/// Print identifiers one per line.
pub fn print_ids(ids: &[String]) {
    if !ids.is_empty() {
        println!("{}", format_list(ids, ""));
    }
}

/// Print a result as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Join items into lines, each starting with `prefix`.
pub fn format_list<T: Display>(items: &[T], prefix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}", prefix, item))
        .collect::<Vec<_>>()
        .join("\n")
}
