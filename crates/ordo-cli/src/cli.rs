//! Command-line interface definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use ordo_core::RequestSpec;

/// ordo - Liturgical calendar years as a subscribable iCalendar feed
#[derive(Debug, Parser)]
#[command(name = "ordo")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "ORDO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate an iCalendar feed for one or more years
    Generate(GenerateArgs),

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Options of `ordo generate`.
///
/// Every option left unset falls back to the configuration file, then to
/// the built-in default.
#[derive(Debug, Clone, Default, Args)]
pub struct GenerateArgs {
    /// Gregorian years to include in the feed
    #[arg(required = true, num_args = 1.., value_parser = parse_year)]
    pub years: Vec<i32>,

    /// Path of the .ics file to write
    #[arg(long, short)]
    pub output: PathBuf,

    /// Locale understood by the calendar library (e.g. en, fr)
    #[arg(long)]
    pub locale: Option<String>,

    /// Calendar to use (e.g. general, unitedStates)
    #[arg(long)]
    pub calendar: Option<String>,

    /// Calendar name shown to subscribers
    #[arg(long)]
    pub name: Option<String>,

    /// PRODID property (derived from domain and name when unset)
    #[arg(long)]
    pub prodid: Option<String>,

    /// Domain used for deterministic event UIDs
    #[arg(long)]
    pub domain: Option<String>,

    /// Time zone exposed via X-WR-TIMEZONE
    #[arg(long)]
    pub timezone: Option<String>,

    /// METHOD property; empty or "none" omits it
    #[arg(long)]
    pub method: Option<String>,

    /// REFRESH-INTERVAL duration; empty or "none" omits it
    #[arg(long)]
    pub refresh_interval: Option<String>,

    /// X-PUBLISHED-TTL duration; empty or "none" omits it
    #[arg(long)]
    pub published_ttl: Option<String>,

    /// Path to the bridge script
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Program that runs the bridge script
    #[arg(long)]
    pub node: Option<String>,

    /// Per-call bridge timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Include optional memorials (default)
    #[arg(long, conflicts_with = "exclude_optional")]
    pub include_optional: bool,

    /// Exclude optional memorials
    #[arg(long)]
    pub exclude_optional: bool,
}

impl GenerateArgs {
    /// Returns the optional-memorial choice, if either flag was given.
    pub fn include_optional(&self) -> Option<bool> {
        if self.exclude_optional {
            Some(false)
        } else if self.include_optional {
            Some(true)
        } else {
            None
        }
    }
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump the effective configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

fn parse_year(text: &str) -> Result<i32, String> {
    RequestSpec::parse_year(text).map_err(|e| e.to_string())
}
