//! Source API traits.
//!
//! The external calendar library is reachable through two incompatible API
//! shapes:
//!
//! - [`CoreApi`]: the modular API. Calendars are separate modules selected by
//!   export name, and a year is generated with per-call options.
//! - [`LegacyApi`]: the older API. One call takes the calendar name and year
//!   and returns events grouped in nested arrays or objects.
//!
//! Both return raw JSON; turning it into events is the adapter's job.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;

use crate::error::SourceResult;

/// A boxed future for async trait methods.
///
/// Boxed futures keep the traits object-safe so the orchestrator can hold
/// `Arc<dyn CoreApi>` and `Arc<dyn LegacyApi>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which API shape served a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceApi {
    /// The modular API.
    Core,
    /// The legacy API.
    Legacy,
}

impl SourceApi {
    /// Returns the API name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for SourceApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Localization settings shared by both APIs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Localization {
    /// Locale identifier (e.g. `en`, `fr`).
    pub locale: String,
}

/// Options for one [`CoreApi::generate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreOptions {
    /// Calendar module export names, most specific last.
    pub calendars: Vec<String>,
    /// Localization settings.
    pub localization: Localization,
    /// Whether optional memorials are generated.
    pub allow_optional_memorials: bool,
}

/// Options for one [`LegacyApi::calendar_for`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOptions {
    /// Calendar name (e.g. `general`, `unitedStates`).
    pub calendar: String,
    /// Localization settings.
    pub localization: Localization,
    /// Gregorian year.
    pub year: i32,
    /// Whether optional memorials are generated.
    pub allow_optional_memorials: bool,
}

/// The modular source API.
pub trait CoreApi: Send + Sync {
    /// Lists the calendar module export names this API provides.
    fn calendar_modules(&self) -> BoxFuture<'_, SourceResult<Vec<String>>>;

    /// Generates one year and returns its records as a flat list.
    fn generate(&self, year: i32, options: CoreOptions) -> BoxFuture<'_, SourceResult<Vec<Value>>>;
}

/// The legacy source API.
pub trait LegacyApi: Send + Sync {
    /// Returns the year's records, possibly nested by date or category.
    fn calendar_for(&self, options: LegacyOptions) -> BoxFuture<'_, SourceResult<Value>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn core_options_serialize_camel_case() {
        let options = CoreOptions {
            calendars: vec!["GeneralRoman".to_string()],
            localization: Localization {
                locale: "en".to_string(),
            },
            allow_optional_memorials: true,
        };

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "calendars": ["GeneralRoman"],
                "localization": {"locale": "en"},
                "allowOptionalMemorials": true,
            })
        );
    }

    #[test]
    fn legacy_options_serialize_camel_case() {
        let options = LegacyOptions {
            calendar: "general".to_string(),
            localization: Localization {
                locale: "fr".to_string(),
            },
            year: 2025,
            allow_optional_memorials: false,
        };

        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "calendar": "general",
                "localization": {"locale": "fr"},
                "year": 2025,
                "allowOptionalMemorials": false,
            })
        );
    }

    #[test]
    fn api_names() {
        assert_eq!(SourceApi::Core.to_string(), "core");
        assert_eq!(SourceApi::Legacy.as_str(), "legacy");
    }
}
