//! resolve command - Resolve a place name to identifiers

use crate::cli::args::Target;
use crate::cli::Context;
use crate::core::index::IndexEntry;
use crate::core::loader::{load_area_resolver, load_metro_resolver};
use crate::core::resolver::{Resolution, Resolver};
use crate::ui::output;
use anyhow::Result;

/// Resolve `query` against the selected reference data.
pub fn resolve(ctx: &Context, target: Target, query: &str, explain: bool) -> Result<()> {
    let resolution = match target {
        Target::Area => run(&load_area_resolver(&ctx.config)?, query),
        Target::Metro => run(&load_metro_resolver(&ctx.config)?, query),
    };

    if ctx.json {
        output::print_json(&resolution)?;
        return Ok(());
    }

    if explain {
        output::print(explain_text(&resolution), ctx.verbosity);
    }
    output::print_ids(&resolution.ids);
    Ok(())
}

fn run<E: IndexEntry>(resolver: &Resolver<E>, query: &str) -> Resolution {
    resolver.resolve_detailed(query)
}

fn explain_text(resolution: &Resolution) -> String {
    let mut lines = vec![
        format!("strategy: {}", resolution.strategy),
        format!("normalized: {:?}", resolution.normalized),
    ];
    if let Some(key) = &resolution.matched_key {
        lines.push(format!("matched key: {:?}", key));
    }
    if let Some(score) = resolution.score {
        lines.push(format!("score: {:.3}", score));
    }
    lines.join("\n")
}
