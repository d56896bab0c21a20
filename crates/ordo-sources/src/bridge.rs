//! Process bridge to the JavaScript calendar library.
//!
//! [`BridgeScript`] implements both [`CoreApi`] and [`LegacyApi`] by running
//! a bridge script under `node` (or another configured program) and reading
//! one JSON document from its stdout:
//!
//! ```text
//! <program> <script> core modules
//! <program> <script> core generate --year <Y> --options <JSON>
//! <program> <script> legacy --options <JSON>
//! ```
//!
//! A non-zero exit is a failure whose message is the script's stderr, or
//! stdout when stderr is empty. Empty stdout means no records.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::api::{BoxFuture, CoreApi, CoreOptions, LegacyApi, LegacyOptions, SourceApi};
use crate::error::{SourceError, SourceResult};

/// Program used to run the bridge script when none is configured.
pub const DEFAULT_PROGRAM: &str = "node";

/// How to launch the bridge script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Interpreter executable.
    pub program: String,
    /// Path to the bridge script.
    pub script: PathBuf,
    /// Per-call limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl BridgeConfig {
    /// Creates a configuration running `script` with [`DEFAULT_PROGRAM`].
    pub fn new(script: impl Into<PathBuf>) -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            script: script.into(),
            timeout: None,
        }
    }

    /// Sets the interpreter executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the per-call timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Core and legacy API served by an external bridge script.
#[derive(Debug, Clone)]
pub struct BridgeScript {
    config: BridgeConfig,
}

impl BridgeScript {
    /// Creates a bridge from its launch configuration.
    pub fn new(config: BridgeConfig) -> Self {
        Self { config }
    }

    /// Returns the launch configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Runs the script once and parses its stdout.
    ///
    /// Returns `Ok(None)` when the script succeeded without output.
    async fn run(&self, api: SourceApi, args: Vec<String>) -> SourceResult<Option<Value>> {
        let script = &self.config.script;
        if !script.exists() {
            return Err(SourceError::unavailable(format!(
                "bridge script not found at {}",
                script.display()
            ))
            .with_api(api.as_str()));
        }

        debug!(
            api = %api,
            program = %self.config.program,
            script = %script.display(),
            args = ?args,
            "Running bridge script"
        );

        let mut command = Command::new(&self.config.program);
        command
            .arg(script)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| {
                    SourceError::timeout(format!("bridge script did not finish within {:?}", limit))
                        .with_api(api.as_str())
                })?,
            None => command.output().await,
        }
        .map_err(|e| {
            SourceError::process(format!("failed to run {}: {}", self.config.program, e))
                .with_api(api.as_str())
                .with_source(e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            let message = [stderr.trim(), stdout.trim()]
                .into_iter()
                .find(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("bridge script exited with {}", output.status));
            return Err(SourceError::process(message).with_api(api.as_str()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        trace!(api = %api, bytes = stdout.len(), "Bridge script finished");
        if stdout.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(stdout).map(Some).map_err(|e| {
            SourceError::invalid_response("bridge script did not return valid JSON")
                .with_api(api.as_str())
                .with_source(e)
        })
    }
}

fn options_arg(api: SourceApi, options: &impl Serialize) -> SourceResult<String> {
    serde_json::to_string(options).map_err(|e| {
        SourceError::configuration("could not encode bridge options")
            .with_api(api.as_str())
            .with_source(e)
    })
}

impl CoreApi for BridgeScript {
    fn calendar_modules(&self) -> BoxFuture<'_, SourceResult<Vec<String>>> {
        Box::pin(async move {
            let args = vec!["core".to_string(), "modules".to_string()];
            let Some(value) = self.run(SourceApi::Core, args).await? else {
                return Ok(Vec::new());
            };
            serde_json::from_value(value).map_err(|e| {
                SourceError::invalid_response("expected a JSON array of module names")
                    .with_api(SourceApi::Core.as_str())
                    .with_source(e)
            })
        })
    }

    fn generate(&self, year: i32, options: CoreOptions) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
        Box::pin(async move {
            let args = vec![
                "core".to_string(),
                "generate".to_string(),
                "--year".to_string(),
                year.to_string(),
                "--options".to_string(),
                options_arg(SourceApi::Core, &options)?,
            ];
            match self.run(SourceApi::Core, args).await? {
                None => Ok(Vec::new()),
                Some(Value::Array(records)) => Ok(records),
                Some(_) => Err(SourceError::invalid_response(
                    "bridge script must output a JSON array of records",
                )
                .with_api(SourceApi::Core.as_str())),
            }
        })
    }
}

impl LegacyApi for BridgeScript {
    fn calendar_for(&self, options: LegacyOptions) -> BoxFuture<'_, SourceResult<Value>> {
        Box::pin(async move {
            let args = vec![
                "legacy".to_string(),
                "--options".to_string(),
                options_arg(SourceApi::Legacy, &options)?,
            ];
            Ok(self
                .run(SourceApi::Legacy, args)
                .await?
                .unwrap_or_else(|| Value::Array(Vec::new())))
        })
    }
}
