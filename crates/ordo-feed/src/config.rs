//! Feed-level metadata.

use crate::error::FeedError;

/// Default calendar display name.
pub const DEFAULT_NAME: &str = "General Roman Calendar";
/// Default UID domain.
pub const DEFAULT_DOMAIN: &str = "catholic.calendar";
/// Default `X-WR-TIMEZONE`.
pub const DEFAULT_TIMEZONE: &str = "UTC";
/// Default `METHOD`.
pub const DEFAULT_METHOD: &str = "PUBLISH";
/// Default refresh hint for subscribers, one day.
pub const DEFAULT_REFRESH_INTERVAL: &str = "P1D";
/// Default `X-PUBLISHED-TTL`, one day.
pub const DEFAULT_PUBLISHED_TTL: &str = "P1D";

/// Metadata written into the calendar header and used for UIDs.
///
/// The optional properties are omitted from the feed when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    /// `X-WR-CALNAME`.
    pub name: String,
    /// Domain appended to every UID.
    pub domain: String,
    /// `X-WR-TIMEZONE`.
    pub timezone: String,
    /// Explicit `PRODID`; derived from domain and name when `None`.
    pub prodid: Option<String>,
    /// `METHOD`.
    pub method: Option<String>,
    /// `REFRESH-INTERVAL`, as an ISO 8601 duration.
    pub refresh_interval: Option<String>,
    /// `X-PUBLISHED-TTL`, as an ISO 8601 duration.
    pub published_ttl: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_DOMAIN, DEFAULT_TIMEZONE)
    }
}

impl FeedConfig {
    /// Creates a configuration with the default optional properties.
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        timezone: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            timezone: timezone.into(),
            prodid: None,
            method: Some(DEFAULT_METHOD.to_string()),
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL.to_string()),
            published_ttl: Some(DEFAULT_PUBLISHED_TTL.to_string()),
        }
    }

    /// Builder method to set the product identifier.
    pub fn with_prodid(mut self, prodid: Option<String>) -> Self {
        self.prodid = prodid;
        self
    }

    /// Builder method to set the method.
    pub fn with_method(mut self, method: Option<String>) -> Self {
        self.method = method;
        self
    }

    /// Builder method to set the refresh interval.
    pub fn with_refresh_interval(mut self, interval: Option<String>) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Builder method to set the published TTL.
    pub fn with_published_ttl(mut self, ttl: Option<String>) -> Self {
        self.published_ttl = ttl;
        self
    }

    /// Returns the `PRODID`, deriving `-//{domain}//{name}//EN` if unset.
    pub fn prodid(&self) -> String {
        match self.prodid.as_deref().map(str::trim) {
            Some(prodid) if !prodid.is_empty() => prodid.to_string(),
            _ => format!("-//{}//{}//EN", self.domain.trim(), self.name.trim()),
        }
    }

    /// Checks that name, domain and timezone are all present, and that the
    /// unescaped properties hold no control characters.
    pub fn validate(&self) -> Result<(), FeedError> {
        for (field, value) in [
            ("name", &self.name),
            ("domain", &self.domain),
            ("timezone", &self.timezone),
        ] {
            if value.trim().is_empty() {
                return Err(FeedError::MissingMetadata { field });
            }
        }
        for (field, value) in [
            ("method", &self.method),
            ("refresh interval", &self.refresh_interval),
            ("published TTL", &self.published_ttl),
        ] {
            if let Some(value) = value
                && value.chars().any(char::is_control)
            {
                return Err(FeedError::ControlCharacter { field });
            }
        }
        Ok(())
    }
}
