//! Generation requests.

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// Earliest supported year (first full Gregorian year).
pub const MIN_YEAR: i32 = 1583;

/// Latest supported year (iCalendar dates carry four-digit years).
pub const MAX_YEAR: i32 = 9999;

/// Name of the calendar used when none is requested.
pub const GENERAL_CALENDAR: &str = "general";

/// One year's worth of calendar data to generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    /// Gregorian year.
    pub year: i32,
    /// Locale identifier understood by the source (e.g. `en`, `es`).
    pub locale: String,
    /// Particular calendar to use (e.g. `unitedStates`). `None` means general.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<String>,
    /// Whether optional memorials are kept.
    pub include_optional: bool,
}

impl RequestSpec {
    /// Creates a request for the general calendar in English, optional
    /// memorials included.
    pub fn new(year: i32) -> Self {
        Self {
            year,
            locale: "en".to_string(),
            calendar: None,
            include_optional: true,
        }
    }

    /// Builder method to set the locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Builder method to set the calendar.
    pub fn with_calendar(mut self, calendar: impl Into<String>) -> Self {
        self.calendar = Some(calendar.into());
        self
    }

    /// Builder method to include or exclude optional memorials.
    pub fn with_include_optional(mut self, include: bool) -> Self {
        self.include_optional = include;
        self
    }

    /// Returns the requested calendar name, defaulting to `general`.
    pub fn calendar_name(&self) -> &str {
        self.calendar
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(GENERAL_CALENDAR)
    }

    /// Returns `true` when the general calendar is requested.
    pub fn is_general(&self) -> bool {
        self.calendar_name().eq_ignore_ascii_case(GENERAL_CALENDAR)
    }

    /// Checks that the request can be sent to a source.
    pub fn validate(&self) -> Result<(), RequestError> {
        check_year(i64::from(self.year))?;
        if self.locale.trim().is_empty() {
            return Err(RequestError::EmptyLocale);
        }
        Ok(())
    }

    /// Parses a user-supplied year.
    pub fn parse_year(text: &str) -> Result<i32, RequestError> {
        let trimmed = text.trim();
        let year: i64 = trimmed
            .parse()
            .map_err(|_| RequestError::NonNumericYear(trimmed.to_string()))?;
        check_year(year)?;
        // check_year bounds the value to the i32 range
        Ok(year as i32)
    }
}

fn check_year(year: i64) -> Result<(), RequestError> {
    if (i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        Ok(())
    } else {
        Err(RequestError::InvalidYear {
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        })
    }
}
