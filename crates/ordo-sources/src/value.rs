//! Recursive normalization of loosely-structured JSON values.
//!
//! Source records arrive as arbitrary JSON. Before a value is mapped onto a
//! canonical field it goes through [`normalize_value`], which:
//!
//! - drops `null`, blank strings, and arrays/objects left empty;
//! - flattens date-like objects to their ISO string;
//! - collapses single-key `{"name": ...}` wrappers to the wrapped value;
//! - normalizes arrays element-wise and objects member-wise.
//!
//! Every function here is total: bad input yields `None`, never a panic.

use chrono::{DateTime, Datelike, NaiveDate};
use serde_json::{Map, Value};

use ordo_core::{EventDate, MAX_YEAR, MIN_YEAR};

/// Members that make an object a serialized date.
const DATE_LIKE_KEYS: &[&str] = &["$date", "iso", "isoString", "toISOString"];

/// Members probed when an object has to be read as a single scalar.
const SCALAR_KEYS: &[&str] = &["name", "value", "key", "label", "title"];

/// Epoch numbers above this magnitude are milliseconds, not seconds.
const MILLIS_THRESHOLD: f64 = 1e11;

/// Normalizes a value, returning `None` when nothing meaningful remains.
pub fn normalize_value(value: &Value) -> Option<Value> {
    match value {
        Value::Null => None,
        Value::Bool(_) | Value::Number(_) => Some(value.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Value::String(trimmed.to_string()))
        }
        Value::Array(items) => {
            let items: Vec<Value> = items.iter().filter_map(normalize_value).collect();
            (!items.is_empty()).then_some(Value::Array(items))
        }
        Value::Object(map) => {
            if let Some(iso) = date_like_object(map) {
                return Some(Value::String(iso));
            }
            if map.len() == 1
                && let Some(name) = map.get("name")
            {
                return normalize_value(name);
            }
            let members: Map<String, Value> = map
                .iter()
                .filter_map(|(key, member)| {
                    normalize_value(member).map(|value| (key.clone(), value))
                })
                .collect();
            (!members.is_empty()).then_some(Value::Object(members))
        }
    }
}

/// Reads a date field as ISO text.
///
/// Strings and date-like objects give their ISO text; numbers are epoch
/// seconds, or milliseconds when larger than 10^11. Epochs outside the
/// supported years give `None`.
pub fn date_text(value: &Value) -> Option<String> {
    match normalize_value(value)? {
        Value::String(text) => Some(text),
        Value::Number(number) => epoch_to_iso(number.as_f64()?),
        _ => None,
    }
}

/// Reads a normalized value as one line of text.
///
/// Arrays are joined with `", "`; objects are read through their `name`,
/// `value`, `key`, `label` or `title` member.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => SCALAR_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(scalar_text)),
        Value::Null => None,
    }
}

/// JavaScript-style truthiness, with `"false"` and `"0"` read as false.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => {
            let trimmed = text.trim();
            !trimmed.is_empty()
                && !trimmed.eq_ignore_ascii_case("false")
                && trimmed != "0"
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Looks up a dotted path (`data.meta.liturgicalColor`) in a record.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn date_like_object(map: &Map<String, Value>) -> Option<String> {
    for key in DATE_LIKE_KEYS {
        if let Some(Value::String(text)) = map.get(*key) {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    let keys = ["year", "month", "day"];
    let is_triple = map.len() == 3 && keys.iter().all(|key| map.contains_key(*key));
    if !is_triple {
        return None;
    }
    let year = i32::try_from(map.get("year")?.as_i64()?).ok()?;
    let month = u32::try_from(map.get("month")?.as_u64()?).ok()?;
    let day = u32::try_from(map.get("day")?.as_u64()?).ok()?;
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}

fn epoch_to_iso(raw: f64) -> Option<String> {
    if !raw.is_finite() {
        return None;
    }
    let millis = if raw.abs() > MILLIS_THRESHOLD {
        raw
    } else {
        raw * 1000.0
    };
    // Out-of-range values saturate and are rejected below
    let dt = DateTime::from_timestamp_millis(millis.round() as i64)?;
    (MIN_YEAR..=MAX_YEAR)
        .contains(&dt.year())
        .then(|| EventDate::from_utc(dt).to_string())
}
