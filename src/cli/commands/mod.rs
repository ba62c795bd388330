//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads the resolvers it needs from the configured reference data
//! 2. Calls into [`crate::core`]
//! 3. Formats and displays output (text or JSON)

mod completion;
mod config_cmd;
mod inspect;
mod query;
mod resolve;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{init as config_init, path as config_path, show as config_show};
pub use inspect::inspect;
pub use query::query;
pub use resolve::resolve;

use crate::cli::args::{Command, ConfigAction};
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Resolve {
            target,
            query,
            explain,
        } => resolve::resolve(ctx, target, &query.join(" "), explain),
        Command::Inspect { target, lookup } => inspect::inspect(ctx, target, lookup.as_deref()),
        Command::Query(args) => query::query(ctx, &args),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Path => config_cmd::path(ctx),
            ConfigAction::Init { force } => config_cmd::init(ctx, force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
