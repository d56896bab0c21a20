//! Human-readable DESCRIPTION and CATEGORIES text for an event.

use serde_json::Value;

use ordo_core::CanonicalEvent;

/// Category used when an event has no rank or type.
pub const DEFAULT_CATEGORY: &str = "Celebration";

/// Renders a JSON value as one line of readable text.
///
/// Booleans read `Yes`/`No`, arrays are joined with `", "` and objects are
/// rendered as `key: value` pairs joined with `"; "`. Nulls are skipped.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => yes_no(*flag).to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(stringify)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(map) => map
            .iter()
            .filter(|(_, member)| !member.is_null())
            .map(|(key, member)| format!("{}: {}", key, stringify(member)))
            .collect::<Vec<_>>()
            .join("; "),
    }
}

/// Builds the description, one `Label: value` line per present field.
///
/// Returns `None` when the event carries nothing beyond its name.
pub fn description(event: &CanonicalEvent) -> Option<String> {
    let colors = event
        .liturgical_color
        .as_ref()
        .map(|color| color.colors().join(", "));
    let commemorations =
        (!event.commemorations.is_empty()).then(|| event.commemorations.join(", "));

    let labelled = [
        ("Rank", event.rank_name.clone().or_else(|| event.rank.clone())),
        ("Liturgical color", colors),
        ("Season", event.season.clone()),
        ("Type", event.kind.clone()),
        (
            "Holy day of obligation",
            event
                .is_holy_day_of_obligation
                .map(|flag| yes_no(flag).to_string()),
        ),
        (
            "Optional memorial",
            event.is_optional.map(|flag| yes_no(flag).to_string()),
        ),
        ("Week", event.week.clone()),
        ("Cycle", event.cycle.clone()),
        ("Notes", event.note.clone()),
        ("Commemorations", commemorations),
    ];

    let mut lines: Vec<String> = labelled
        .into_iter()
        .filter_map(|(label, text)| {
            text.filter(|text| !text.is_empty())
                .map(|text| format!("{label}: {text}"))
        })
        .collect();

    if let Some(metadata) = event.metadata.as_ref().map(stringify)
        && !metadata.is_empty()
    {
        lines.push(metadata);
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Returns the event's category: rank name, rank, type, or the default.
pub fn category(event: &CanonicalEvent) -> &str {
    event
        .rank_name
        .as_deref()
        .or(event.rank.as_deref())
        .or(event.kind.as_deref())
        .unwrap_or(DEFAULT_CATEGORY)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
