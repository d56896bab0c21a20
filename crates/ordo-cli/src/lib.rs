//! CLI, configuration file and feed generation
//!
//! This crate provides the `ordo` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::OrdoConfig;
pub use error::{CliError, CliResult};
