//! Error types for source operations.
//!
//! [`SourceError`] describes one failed call to a source API. [`FetchError`]
//! is what the fallback orchestrator reports for a whole request, and
//! [`MalformedRecord`] marks a single record the adapter could not use.

use std::fmt;
use thiserror::Error;

use ordo_core::RequestError;

/// The category of a source error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorCode {
    /// The API is not installed or not configured.
    Unavailable,
    /// The bridge process could not be started or exited with failure.
    Process,
    /// The API answered with output that is not the expected JSON shape.
    InvalidResponse,
    /// The call did not finish within the configured timeout.
    Timeout,
    /// No usable calendar module or similar selection problem.
    Configuration,
}

impl SourceErrorCode {
    /// Returns a machine-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Process => "process_failed",
            Self::InvalidResponse => "invalid_response",
            Self::Timeout => "timeout",
            Self::Configuration => "configuration_error",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error returned by a source API call.
#[derive(Debug, Error)]
pub struct SourceError {
    code: SourceErrorCode,
    message: String,
    /// The API that failed (`core` or `legacy`).
    api: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SourceError {
    /// Creates a new source error with the given code and message.
    pub fn new(code: SourceErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            api: None,
            source: None,
        }
    }

    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Unavailable, message)
    }

    /// Creates a process error.
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Process, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::InvalidResponse, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Timeout, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(SourceErrorCode::Configuration, message)
    }

    /// Sets the API name for this error.
    pub fn with_api(mut self, api: impl Into<String>) -> Self {
        self.api = Some(api.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> SourceErrorCode {
        self.code
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the API name, if set.
    pub fn api(&self) -> Option<&str> {
        self.api.as_deref()
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref api) = self.api {
            write!(f, "[{}] ", api)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for source API calls.
pub type SourceResult<T> = Result<T, SourceError>;

/// Failure to produce events for a request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request was rejected before any source was called.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// Both the core and the legacy API failed.
    #[error("no source could produce the {year} calendar; core API: {primary}; legacy API: {legacy}")]
    SourceUnavailable {
        year: i32,
        primary: String,
        legacy: String,
    },
}

/// A record the adapter could not turn into an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed record {label}: {reason}")]
pub struct MalformedRecord {
    /// Best available description of the record (its name or slug).
    pub label: String,
    /// Why the record was rejected.
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_names() {
        assert_eq!(SourceErrorCode::Process.as_str(), "process_failed");
        assert_eq!(SourceErrorCode::Timeout.to_string(), "timeout");
    }

    #[test]
    fn source_error_creation() {
        let err = SourceError::invalid_response("expected a JSON array");
        assert_eq!(err.code(), SourceErrorCode::InvalidResponse);
        assert_eq!(err.message(), "expected a JSON array");
        assert!(err.api().is_none());
    }

    #[test]
    fn source_error_display_includes_api() {
        let err = SourceError::process("romcal not installed").with_api("core");
        let display = err.to_string();
        assert!(display.starts_with("[core] "));
        assert!(display.contains("process_failed"));
        assert!(display.contains("romcal not installed"));
    }

    #[test]
    fn source_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("no such file");
        let err = SourceError::process("failed to spawn").with_source(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn source_unavailable_carries_both_messages() {
        let err = FetchError::SourceUnavailable {
            year: 2025,
            primary: "module missing".to_string(),
            legacy: "script crashed".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("2025"));
        assert!(display.contains("module missing"));
        assert!(display.contains("script crashed"));
    }

    #[test]
    fn invalid_request_from_request_error() {
        let err: FetchError = RequestError::EmptyLocale.into();
        assert!(matches!(err, FetchError::InvalidRequest(_)));
    }
}
