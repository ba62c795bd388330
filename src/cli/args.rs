//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching
//! - `--areas-data <path>` / `--metro-data <path>`: Override reference data paths
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--json`: Machine-readable output

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Georesolve - resolve free-form place names to reference identifiers
#[derive(Parser, Debug)]
#[command(name = "georesolve")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use (skips the standard search)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Area tree JSON (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub areas_data: Option<PathBuf>,

    /// Metro tree JSON (overrides config)
    #[arg(long, global = true, value_name = "PATH")]
    pub metro_data: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a place name to identifiers
    #[command(
        name = "resolve",
        long_about = "Resolve a free-form place name to reference identifiers.\n\n\
            The name is normalized (case, prefixes like \"г.\" or \"м.\", punctuation) \
            and then matched by trying, in order: an exact match, the last word of the \
            name, and the closest similar names. Areas fall back to a default list \
            when nothing matches; metro stations yield nothing.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Resolve a city
    georesolve resolve area 'г. Москва'

    # Resolve a metro station
    georesolve resolve metro 'м. Сокольники'

    # See which strategy matched and why
    georesolve resolve area Масква --explain

    # Machine-readable result
    georesolve --json resolve area Масква"
    )]
    Resolve {
        /// Which reference data to resolve against
        #[arg(value_enum)]
        target: Target,

        /// Name to resolve (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Show the strategy, normalized form and matched key
        #[arg(long)]
        explain: bool,
    },

    /// Show index statistics or dump a key's bucket
    #[command(
        name = "inspect",
        long_about = "Show statistics about a built index.\n\n\
            Prints entry and key counts, fuzzy vocabulary size, the number of keys \
            shared by several places, the deepest level and the reference file \
            fingerprint. With --lookup, prints every entry stored under a key.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Area index summary
    georesolve inspect area

    # Which places share the name 'троицк'
    georesolve inspect area --lookup троицк"
    )]
    Inspect {
        #[arg(value_enum)]
        target: Target,

        /// Dump entries stored under this key (normalized first)
        #[arg(long, value_name = "KEY")]
        lookup: Option<String>,
    },

    /// Build vacancy search query parameters
    #[command(
        name = "query",
        long_about = "Build the parameter list for a vacancy search request.\n\n\
            Area and metro names are resolved to identifiers; list values become \
            repeated parameters. Unknown enumeration values are dropped.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Rust jobs in Moscow near a station
    georesolve query --text rust --area Москва --metro Сокольники

    # Remote, with salary only
    georesolve query --text rust --work-format REMOTE --only-with-salary"
    )]
    Query(QueryArgs),

    /// Show or initialize configuration
    #[command(
        name = "config",
        long_about = "View or create the georesolve configuration file.\n\n\
            Configuration is searched in $GEORESOLVE_CONFIG, \
            $XDG_CONFIG_HOME/georesolve/config.toml and ~/.georesolve/config.toml.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Effective configuration
    georesolve config show

    # Where 'config init' writes
    georesolve config path

    # Write defaults
    georesolve config init"
    )]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    georesolve completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    georesolve completion zsh >> ~/.zshrc

    # Fish
    georesolve completion fish > ~/.config/fish/completions/georesolve.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Search form fields for `query`.
#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Free-text search
    #[arg(long)]
    pub text: Option<String>,

    /// Area name
    #[arg(long)]
    pub area: Option<String>,

    /// Metro station name
    #[arg(long = "metro", visible_aliases = ["station", "metro-station"], value_name = "NAME")]
    pub metro_station: Option<String>,

    /// noExperience | between1And3 | between3And6 | moreThan6
    #[arg(long)]
    pub experience: Option<String>,

    /// FULL | PART | PROJECT | FLY_IN_FLY_OUT
    #[arg(long)]
    pub employment_form: Option<String>,

    /// fullDay | shift | flexible | remote
    #[arg(long)]
    pub schedule: Option<String>,

    /// ON_SITE | REMOTE | HYBRID | FIELD_WORK
    #[arg(long)]
    pub work_format: Option<String>,

    /// not_required_or_not_specified | special_secondary | higher
    #[arg(long)]
    pub education: Option<String>,

    #[arg(long)]
    pub salary: Option<String>,

    #[arg(long)]
    pub currency: Option<String>,

    #[arg(long)]
    pub only_with_salary: bool,

    #[arg(long)]
    pub premium: bool,

    /// Omit response counts from results
    #[arg(long)]
    pub no_responses_count: bool,

    /// Allow query rewriting on the search side
    #[arg(long)]
    pub magic: bool,

    #[arg(long, default_value_t = 0)]
    pub page: u32,

    #[arg(long, default_value_t = 20)]
    pub per_page: u32,
}

/// Reference data a command operates on.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Area,
    Metro,
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the canonical config file location
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn resolve_joins_words() {
        let cli = Cli::try_parse_from(["georesolve", "resolve", "area", "Нижний", "Новгород"]).unwrap();
        match cli.command {
            Command::Resolve { target, query, explain } => {
                assert_eq!(target, Target::Area);
                assert_eq!(query, vec!["Нижний", "Новгород"]);
                assert!(!explain);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["georesolve", "inspect", "metro", "--json", "--debug"]).unwrap();
        assert!(cli.json);
        assert!(cli.debug);
    }

    #[test]
    fn quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["georesolve", "-q", "--debug", "config", "path"]).is_err());
    }

    #[test]
    fn query_defaults() {
        let cli = Cli::try_parse_from(["georesolve", "query", "--text", "rust"]).unwrap();
        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.text.as_deref(), Some("rust"));
                assert_eq!(args.page, 0);
                assert_eq!(args.per_page, 20);
                assert!(!args.magic);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn query_metro_is_station_filter() {
        let cli = Cli::try_parse_from([
            "georesolve",
            "query",
            "--area",
            "Москва",
            "--metro",
            "Сокольники",
        ])
        .unwrap();
        assert!(cli.metro_data.is_none());
        match cli.command {
            Command::Query(args) => assert_eq!(args.metro_station.as_deref(), Some("Сокольники")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn data_paths_are_global() {
        let cli = Cli::try_parse_from([
            "georesolve",
            "resolve",
            "metro",
            "Курская",
            "--metro-data",
            "/srv/metro.json",
        ])
        .unwrap();
        assert_eq!(cli.metro_data, Some(PathBuf::from("/srv/metro.json")));
    }
}
