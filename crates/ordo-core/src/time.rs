//! Date types for liturgical events.
//!
//! This module provides [`EventTime`] for the parsed form of an event date
//! (either an all-day date or a specific instant), and [`EventDate`], which
//! pairs that parsed form with the ISO-8601 text the source supplied.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::DateError;

/// The parsed time of a liturgical event.
///
/// Sources emit either plain dates (`2025-12-25`) or date-times. A date-time
/// that falls exactly on midnight in its own offset is a day boundary, not a
/// meaningful time of day, and is treated as all-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTime {
    /// A date without a specific time.
    AllDay(NaiveDate),
    /// A specific instant, stored in UTC.
    DateTime(DateTime<Utc>),
}

impl EventTime {
    /// Returns `true` if this is an all-day event time.
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::AllDay(_))
    }

    /// Returns the calendar day (UTC for timed events).
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::AllDay(date) => *date,
            Self::DateTime(dt) => dt.date_naive(),
        }
    }

    /// Key used for chronological ordering.
    ///
    /// All-day entries sort before timed entries on the same day.
    pub fn sort_key(&self) -> (NaiveDate, Option<NaiveTime>) {
        match self {
            Self::AllDay(date) => (*date, None),
            Self::DateTime(dt) => (dt.date_naive(), Some(dt.time())),
        }
    }
}

impl PartialOrd for EventTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

/// An event date as ISO-8601 text plus its parsed [`EventTime`].
///
/// The text is kept verbatim (trimmed) so the canonical event reports the
/// same ISO form the source produced. Serializes as that plain string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventDate {
    iso: String,
    time: EventTime,
}

impl EventDate {
    /// Parses ISO-8601 text into an event date.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYYMMDD`, RFC 3339 date-times (with optional
    /// fractional seconds) and naive date-times, which are read as UTC.
    pub fn parse(text: &str) -> Result<Self, DateError> {
        let iso = text.trim();
        if iso.is_empty() {
            return Err(DateError::Empty);
        }

        let time = parse_event_time(iso)
            .ok_or_else(|| DateError::Unrecognized(iso.to_string()))?;
        Ok(Self {
            iso: iso.to_string(),
            time,
        })
    }

    /// Creates an all-day event date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            iso: date.format("%Y-%m-%d").to_string(),
            time: EventTime::AllDay(date),
        }
    }

    /// Creates a timed event date, rendered as RFC 3339 in UTC.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self {
            iso: dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            time: to_event_time(dt.naive_utc(), dt),
        }
    }

    /// Returns the ISO text as supplied by the source.
    pub fn as_str(&self) -> &str {
        &self.iso
    }

    /// Returns the parsed time.
    pub fn time(&self) -> EventTime {
        self.time
    }

    /// Returns the calendar day of this date.
    pub fn day(&self) -> NaiveDate {
        self.time.date()
    }

    /// Returns `true` if this date carries no time of day.
    pub fn is_all_day(&self) -> bool {
        self.time.is_all_day()
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iso)
    }
}

impl TryFrom<String> for EventDate {
    type Error = DateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EventDate> for String {
    fn from(value: EventDate) -> Self {
        value.iso
    }
}

fn parse_event_time(iso: &str) -> Option<EventTime> {
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return Some(EventTime::AllDay(date));
    }
    if iso.len() == 8
        && let Ok(date) = NaiveDate::parse_from_str(iso, "%Y%m%d")
    {
        return Some(EventTime::AllDay(date));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(iso) {
        return Some(to_event_time(dt.naive_local(), dt.with_timezone(&Utc)));
    }

    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(iso, format) {
            return Some(to_event_time(naive, naive.and_utc()));
        }
    }

    None
}

/// Midnight in the source's own offset marks a whole day.
fn to_event_time(local: NaiveDateTime, utc: DateTime<Utc>) -> EventTime {
    if local.time() == NaiveTime::MIN {
        EventTime::AllDay(local.date())
    } else {
        EventTime::DateTime(utc)
    }
}
