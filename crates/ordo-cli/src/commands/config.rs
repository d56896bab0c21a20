//! Configuration commands.

use ordo_feed::FeedConfig;

use crate::config::{BRIDGE_SCRIPT_NAME, OrdoConfig, normalize_optional};
use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &OrdoConfig) -> CliResult<()> {
    let toml_str = toml::to_string_pretty(config).map_err(|e| {
        CliError::Config(format!("failed to serialize config: {}", e))
    })?;
    println!("# config.toml ({})", OrdoConfig::default_path().display());
    println!("{}", toml_str);

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &OrdoConfig) -> CliResult<()> {
    check(config)?;

    let script = config.source.script_path();
    if !script.exists() {
        println!("Bridge script not found at {}.", script.display());
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    println!("config: {}", OrdoConfig::default_path().display());
    let bridge = OrdoConfig::default_data_dir().join(BRIDGE_SCRIPT_NAME);
    println!("bridge: {}", bridge.display());
    Ok(())
}

fn check(config: &OrdoConfig) -> CliResult<()> {
    let feed = &config.feed;
    FeedConfig::new(&feed.name, &feed.domain, &feed.timezone)
        .with_method(normalize_optional(&feed.method))
        .with_refresh_interval(normalize_optional(&feed.refresh_interval))
        .with_published_ttl(normalize_optional(&feed.published_ttl))
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    if config.source.locale.trim().is_empty() {
        return Err(CliError::Config(
            "source locale must not be empty".to_string(),
        ));
    }
    if config.source.node.trim().is_empty() {
        return Err(CliError::Config(
            "source node program must not be empty".to_string(),
        ));
    }
    if config.source.timeout_secs == Some(0) {
        return Err(CliError::Config(
            "source timeout_secs must be positive".to_string(),
        ));
    }
    Ok(())
}
