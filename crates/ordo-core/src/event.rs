//! Canonical event type.
//!
//! [`CanonicalEvent`] is the strict, source-agnostic representation of one
//! liturgical celebration on one date. Every source record is normalized into
//! this shape before aggregation and feed encoding.

use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::slug::slugify;
use crate::time::EventDate;

/// A liturgical color: sources use either a single value or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    /// A single color (e.g. `white`).
    One(String),
    /// Several colors, in source order (e.g. `["red", "white"]`).
    Many(Vec<String>),
}

impl ColorValue {
    /// Returns the colors as a list.
    pub fn colors(&self) -> Vec<&str> {
        match self {
            Self::One(color) => vec![color.as_str()],
            Self::Many(colors) => colors.iter().map(String::as_str).collect(),
        }
    }
}

/// A normalized liturgical celebration.
///
/// Only `date` and `name` are required. Absent optional fields are skipped
/// during serialization and never rendered as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    /// When the celebration takes place.
    pub date: EventDate,

    /// Display title of the celebration.
    pub name: String,

    /// Liturgical precedence (e.g. `SOLEMNITY`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,

    /// Localized precedence name (e.g. `Solemnity`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_name: Option<String>,

    /// Stable machine identifier of the celebration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    /// Liturgical color or colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liturgical_color: Option<ColorValue>,

    /// Whether the celebration is a holy day of obligation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_holy_day_of_obligation: Option<bool>,

    /// Whether the celebration is an optional memorial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_optional: Option<bool>,

    /// Liturgical season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,

    /// Kind of celebration (e.g. `Proper of Time`).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Week within the season.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<String>,

    /// Liturgical year cycle (e.g. `Year A`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<String>,

    /// Provenance or source citations, normalized but otherwise opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,

    /// Secondary celebrations on the same day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commemorations: Vec<String>,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CanonicalEvent {
    /// Creates an event with only the required fields.
    pub fn new(date: EventDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
            rank: None,
            rank_name: None,
            slug: None,
            liturgical_color: None,
            is_holy_day_of_obligation: None,
            is_optional: None,
            season: None,
            kind: None,
            week: None,
            cycle: None,
            metadata: None,
            commemorations: Vec::new(),
            note: None,
        }
    }

    /// Returns the slug when present, otherwise the slugified name.
    ///
    /// Deduplication and feed UIDs both key on this value.
    pub fn identity_slug(&self) -> Cow<'_, str> {
        match self.slug.as_deref() {
            Some(slug) => Cow::Borrowed(slug),
            None => Cow::Owned(slugify(&self.name)),
        }
    }

    /// Returns the `(day, identity slug)` pair that identifies the event.
    pub fn identity(&self) -> (NaiveDate, String) {
        (self.date.day(), self.identity_slug().into_owned())
    }

    /// Returns the Gregorian year of the event.
    pub fn year(&self) -> i32 {
        self.date.day().year()
    }

    /// Returns `true` if the source flagged this as an optional memorial.
    pub fn is_optional_memorial(&self) -> bool {
        self.is_optional == Some(true)
    }

    /// Builder method to set the rank.
    pub fn with_rank(mut self, rank: impl Into<String>) -> Self {
        self.rank = Some(rank.into());
        self
    }

    /// Builder method to set the rank name.
    pub fn with_rank_name(mut self, rank_name: impl Into<String>) -> Self {
        self.rank_name = Some(rank_name.into());
        self
    }

    /// Builder method to set the slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Builder method to set the liturgical color.
    pub fn with_color(mut self, color: ColorValue) -> Self {
        self.liturgical_color = Some(color);
        self
    }

    /// Builder method to set the holy day of obligation flag.
    pub fn with_obligation(mut self, obligation: bool) -> Self {
        self.is_holy_day_of_obligation = Some(obligation);
        self
    }

    /// Builder method to set the optional memorial flag.
    pub fn with_optional(mut self, optional: bool) -> Self {
        self.is_optional = Some(optional);
        self
    }

    /// Builder method to set the season.
    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = Some(season.into());
        self
    }

    /// Builder method to set the celebration kind.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Builder method to set the week.
    pub fn with_week(mut self, week: impl Into<String>) -> Self {
        self.week = Some(week.into());
        self
    }

    /// Builder method to set the cycle.
    pub fn with_cycle(mut self, cycle: impl Into<String>) -> Self {
        self.cycle = Some(cycle.into());
        self
    }

    /// Builder method to set the metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Builder method to add a commemoration.
    pub fn with_commemoration(mut self, commemoration: impl Into<String>) -> Self {
        self.commemorations.push(commemoration.into());
        self
    }

    /// Builder method to set the note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
