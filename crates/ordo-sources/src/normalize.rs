//! Raw record to [`CanonicalEvent`] conversion.
//!
//! Records from the core and the legacy API name the same things
//! differently (`date` vs `moment`, `isOptional` vs `optional`, flat fields vs
//! a nested `data` object). [`PROBES`] lists, for every canonical field, the
//! source keys to try in priority order; the first key holding a value that
//! survives [`normalize_value`] wins.
//!
//! Normalization is best effort. A record only fails when no usable date can
//! be found, and then the failure is returned as a [`MalformedRecord`] value.

use chrono::Datelike;
use serde_json::Value;
use tracing::{debug, warn};

use ordo_core::{CanonicalEvent, ColorValue, EventDate, MAX_YEAR, MIN_YEAR};

use crate::error::MalformedRecord;
use crate::value::{date_text, lookup, normalize_value, scalar_text, truthy};

/// Title used when a record carries neither a name nor a slug.
pub const UNNAMED_CELEBRATION: &str = "Unnamed Celebration";

/// Source keys probed for each canonical field, highest priority first.
///
/// Dotted keys reach into nested objects of the legacy layout.
#[derive(Debug)]
pub struct ProbeTable {
    pub date: &'static [&'static str],
    pub name: &'static [&'static str],
    pub rank: &'static [&'static str],
    pub rank_name: &'static [&'static str],
    pub slug: &'static [&'static str],
    pub liturgical_color: &'static [&'static str],
    pub is_holy_day_of_obligation: &'static [&'static str],
    pub legacy_obligation: &'static [&'static str],
    pub is_optional: &'static [&'static str],
    pub legacy_optional: &'static [&'static str],
    pub season: &'static [&'static str],
    pub kind: &'static [&'static str],
    pub week: &'static [&'static str],
    pub cycle: &'static [&'static str],
    pub metadata: &'static [&'static str],
    pub commemorations: &'static [&'static str],
    pub note: &'static [&'static str],
}

/// The probe table shared by both source APIs.
pub const PROBES: ProbeTable = ProbeTable {
    date: &["date", "moment", "startOfDay", "start"],
    name: &["name", "title", "celebration", "label"],
    rank: &["rank"],
    rank_name: &["rankName"],
    slug: &["slug", "id", "identifier", "key"],
    liturgical_color: &[
        "liturgicalColor",
        "liturgicalColors",
        "colors",
        "color",
        "data.meta.liturgicalColor",
    ],
    is_holy_day_of_obligation: &["isHolyDayOfObligation"],
    legacy_obligation: &["obligation"],
    is_optional: &["isOptional"],
    legacy_optional: &["optional"],
    season: &["season", "seasons", "liturgicalSeason", "data.season"],
    kind: &["type", "liturgicalType"],
    week: &["week", "liturgicalWeek", "weekOfSeason", "data.calendar.week"],
    cycle: &["cycle", "liturgicalCycle", "cycles.sundayCycle", "cycles"],
    metadata: &["metadata", "meta", "data.meta"],
    commemorations: &["commemorations", "secondaryCelebrations"],
    note: &["note", "notes"],
};

/// Result of normalizing a batch of records.
#[derive(Debug, Default)]
pub struct Normalized {
    /// Events in source order.
    pub events: Vec<CanonicalEvent>,
    /// Records that had no usable date.
    pub skipped: Vec<MalformedRecord>,
}

/// Converts one raw record into a [`CanonicalEvent`].
///
/// # Errors
///
/// Returns [`MalformedRecord`] when the record is not an object or none of
/// the date keys holds a parseable ISO date.
pub fn normalize_record(record: &Value) -> Result<CanonicalEvent, MalformedRecord> {
    if !record.is_object() {
        return Err(MalformedRecord {
            label: record.to_string(),
            reason: "record is not an object".to_string(),
        });
    }

    let slug = probe_text(record, PROBES.slug);
    let name = probe_text(record, PROBES.name)
        .or_else(|| slug.clone())
        .unwrap_or_else(|| UNNAMED_CELEBRATION.to_string());

    let date = probe_date(record).map_err(|reason| MalformedRecord {
        label: name.clone(),
        reason,
    })?;

    let mut event = CanonicalEvent::new(date, name);
    event.rank = probe_text(record, PROBES.rank);
    event.rank_name = probe_text(record, PROBES.rank_name);
    event.slug = slug;
    event.liturgical_color = probe(record, PROBES.liturgical_color).and_then(color_value);
    event.is_holy_day_of_obligation = probe_flag(
        record,
        PROBES.is_holy_day_of_obligation,
        PROBES.legacy_obligation,
    );
    event.is_optional = probe_flag(record, PROBES.is_optional, PROBES.legacy_optional);
    event.season = probe_text(record, PROBES.season);
    event.kind = probe_text(record, PROBES.kind);
    event.week = probe_text(record, PROBES.week);
    event.cycle = probe_text(record, PROBES.cycle);
    event.metadata = probe(record, PROBES.metadata);
    event.commemorations = probe(record, PROBES.commemorations)
        .map(text_list)
        .unwrap_or_default();
    event.note = probe_text(record, PROBES.note);

    Ok(event)
}

/// Normalizes a batch of records, dropping the malformed ones.
///
/// Each dropped record is logged; the batch itself never fails.
pub fn normalize_records(records: &[Value]) -> Normalized {
    let mut normalized = Normalized::default();

    for record in records {
        match normalize_record(record) {
            Ok(event) => normalized.events.push(event),
            Err(malformed) => {
                warn!(label = %malformed.label, reason = %malformed.reason, "Skipping record");
                normalized.skipped.push(malformed);
            }
        }
    }

    debug!(
        events = normalized.events.len(),
        skipped = normalized.skipped.len(),
        "Normalized records"
    );
    normalized
}

/// Returns the first probed value that normalizes to something.
fn probe(record: &Value, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .find_map(|key| lookup(record, key).and_then(normalize_value))
}

fn probe_text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        let value = lookup(record, key).and_then(normalize_value)?;
        scalar_text(&value)
    })
}

/// Canonical flag first; the legacy name is consulted only when it is absent.
fn probe_flag(record: &Value, canonical: &[&str], legacy: &[&str]) -> Option<bool> {
    probe(record, canonical)
        .or_else(|| probe(record, legacy))
        .map(|value| truthy(&value))
}

fn probe_date(record: &Value) -> Result<EventDate, String> {
    let mut unparsed = None;

    for key in PROBES.date {
        let Some(text) = lookup(record, key).and_then(date_text) else {
            continue;
        };
        match EventDate::parse(&text) {
            Ok(date) if (MIN_YEAR..=MAX_YEAR).contains(&date.day().year()) => return Ok(date),
            Ok(date) => {
                unparsed.get_or_insert_with(|| {
                    format!("year {} under {:?} is out of range", date.day().year(), key)
                });
            }
            Err(err) => {
                unparsed.get_or_insert_with(|| format!("{} under {:?}", err, key));
            }
        }
    }

    Err(match unparsed {
        Some(reason) => reason,
        None => format!("no date under any of {}", PROBES.date.join(", ")),
    })
}

fn color_value(value: Value) -> Option<ColorValue> {
    match value {
        Value::Array(items) => {
            let colors: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!colors.is_empty()).then_some(ColorValue::Many(colors))
        }
        other => scalar_text(&other).map(ColorValue::One),
    }
}

fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        other => scalar_text(&other).into_iter().collect(),
    }
}
