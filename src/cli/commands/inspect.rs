//! inspect command - Index statistics and bucket dumps

use crate::cli::args::Target;
use crate::cli::Context;
use crate::core::index::IndexEntry;
use crate::core::loader::{load_area_resolver, load_metro_resolver};
use crate::core::resolver::Resolver;
use crate::ui::output;
use anyhow::Result;
use serde::Serialize;

/// Show statistics for the selected index, or the bucket under `lookup`.
pub fn inspect(ctx: &Context, target: Target, lookup: Option<&str>) -> Result<()> {
    match target {
        Target::Area => show(ctx, &load_area_resolver(&ctx.config)?, lookup),
        Target::Metro => show(ctx, &load_metro_resolver(&ctx.config)?, lookup),
    }
}

#[derive(Serialize)]
struct Bucket<'a, E> {
    key: String,
    entries: Vec<&'a E>,
}

fn show<E: IndexEntry + Serialize>(
    ctx: &Context,
    resolver: &Resolver<E>,
    lookup: Option<&str>,
) -> Result<()> {
    let Some(raw) = lookup else {
        let stats = resolver.stats();
        if ctx.json {
            output::print_json(&stats)?;
        } else {
            println!("{}", stats);
        }
        return Ok(());
    };

    let key = resolver.normalizer().normalize(raw);
    let entries = resolver.index().lookup(&key).unwrap_or_default();

    if ctx.json {
        output::print_json(&Bucket { key, entries })?;
        return Ok(());
    }

    if entries.is_empty() {
        output::warn(format!("no entries under key {:?}", key), ctx.verbosity);
        return Ok(());
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{}\t{}\t(depth {})", e.id(), e.path(), e.depth()))
        .collect();
    println!("{}", output::format_list(&lines, ""));
    Ok(())
}
