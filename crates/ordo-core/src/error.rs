//! Error types for core values.

use thiserror::Error;

/// An event date that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    /// No date text at all.
    #[error("event date is empty")]
    Empty,

    /// Text that is not an ISO-8601 date or date-time.
    #[error("unrecognized event date: {0:?}")]
    Unrecognized(String),
}

/// A [`RequestSpec`](crate::RequestSpec) rejected before any source call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The year is outside the supported range.
    #[error("invalid year {year}: expected a value between {min} and {max}")]
    InvalidYear { year: i64, min: i32, max: i32 },

    /// The year is not a number.
    #[error("invalid year {0:?}: not a number")]
    NonNumericYear(String),

    /// The locale is empty.
    #[error("locale must not be empty")]
    EmptyLocale,
}
