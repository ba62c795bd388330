//! config command - Show or initialize configuration

use crate::cli::Context;
use crate::core::config::Config;
use crate::ui::output;
use anyhow::{Context as _, Result};

/// Print the effective configuration.
pub fn show(ctx: &Context) -> Result<()> {
    let effective = ctx.config.effective();

    if ctx.json {
        output::print_json(&effective)?;
        return Ok(());
    }

    match ctx.config.loaded_from() {
        Some(path) => println!("# Loaded from {}", path.display()),
        None => println!("# No config file found; using defaults"),
    }
    let text = toml::to_string_pretty(&effective).context("Failed to render config")?;
    print!("{}", text);
    Ok(())
}

/// Print the canonical config location.
pub fn path(_ctx: &Context) -> Result<()> {
    let path = Config::default_config_path()?;
    println!("{}", path.display());
    Ok(())
}

/// Write a config file with every default spelled out.
///
/// Writes to `--config` when given, otherwise to the canonical location.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => Config::default_config_path()?,
    };

    Config::write(&path, &Config::defaults_file(), force)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output::success(format!("Wrote {}", path.display()), ctx.verbosity);
    Ok(())
}
