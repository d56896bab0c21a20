//! `ordo generate`: fetch every year, merge, encode and write the feed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use ordo_core::{RequestSpec, aggregate};
use ordo_feed::{FeedConfig, encode_feed};
use ordo_sources::{BridgeConfig, BridgeScript, FallbackFetcher};

use crate::cli::GenerateArgs;
use crate::config::{OrdoConfig, normalize_optional};
use crate::error::{CliError, CliResult};

/// Everything one run needs, after merging flags, file and defaults.
#[derive(Debug, Clone)]
pub struct GeneratePlan {
    /// One request per year, in command-line order.
    pub requests: Vec<RequestSpec>,
    /// Feed metadata.
    pub feed: FeedConfig,
    /// How to launch the bridge script.
    pub bridge: BridgeConfig,
    /// Output file.
    pub output: PathBuf,
}

impl GeneratePlan {
    /// Merges command-line options over the configuration file.
    pub fn resolve(args: &GenerateArgs, config: &OrdoConfig) -> Self {
        let source = &config.source;
        let feed = &config.feed;

        let locale = pick(&args.locale, &source.locale);
        let calendar = pick(&args.calendar, &source.calendar);
        let include_optional = args.include_optional().unwrap_or(source.include_optional);
        let requests = args
            .years
            .iter()
            .map(|&year| {
                RequestSpec::new(year)
                    .with_locale(locale.clone())
                    .with_calendar(calendar.clone())
                    .with_include_optional(include_optional)
            })
            .collect();

        let prodid = args.prodid.as_ref().or(feed.prodid.as_ref());
        let feed = FeedConfig::new(
            pick(&args.name, &feed.name),
            pick(&args.domain, &feed.domain),
            pick(&args.timezone, &feed.timezone),
        )
        .with_prodid(prodid.map(String::as_str).and_then(normalize_optional))
        .with_method(normalize_optional(&pick(&args.method, &feed.method)))
        .with_refresh_interval(normalize_optional(&pick(
            &args.refresh_interval,
            &feed.refresh_interval,
        )))
        .with_published_ttl(normalize_optional(&pick(
            &args.published_ttl,
            &feed.published_ttl,
        )));

        let script = args.script.clone().unwrap_or_else(|| source.script_path());
        let timeout = args.timeout.or(source.timeout_secs).map(Duration::from_secs);
        let bridge = BridgeConfig::new(script)
            .with_program(pick(&args.node, &source.node))
            .with_timeout(timeout);

        Self {
            requests,
            feed,
            bridge,
            output: args.output.clone(),
        }
    }
}

/// Runs `ordo generate` against the bridge script.
pub async fn run(args: &GenerateArgs, config: &OrdoConfig) -> CliResult<()> {
    let plan = GeneratePlan::resolve(args, config);
    debug!(?plan, "Resolved generate options");

    let fetcher = FallbackFetcher::from_bridge(BridgeScript::new(plan.bridge.clone()));
    let count = generate(&fetcher, &plan).await?;

    println!("Wrote {} events to {}", count, plan.output.display());
    Ok(())
}

/// Fetches, aggregates and encodes the plan's years, then writes the feed.
///
/// Nothing is written unless every year was fetched and the feed encoded.
/// Returns the number of events in the feed.
pub async fn generate(fetcher: &FallbackFetcher, plan: &GeneratePlan) -> CliResult<usize> {
    let results = fetcher.fetch_all(&plan.requests).await?;
    let events = aggregate(results);
    let feed = encode_feed(&events, &plan.feed)?;

    write_atomically(&plan.output, &feed).map_err(|source| CliError::Write {
        path: plan.output.clone(),
        source,
    })?;

    info!(
        events = events.len(),
        path = %plan.output.display(),
        "Wrote feed"
    );
    Ok(events.len())
}

fn pick(flag: &Option<String>, file: &str) -> String {
    flag.clone().unwrap_or_else(|| file.to_string())
}

/// Writes to a hidden sibling file, then renames it over `path`.
fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "output path has no file name",
        )
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
    let result = std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}
