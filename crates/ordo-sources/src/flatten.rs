//! Flattening of the legacy API's nested output.
//!
//! The legacy API groups records by month, date or category, in arrays,
//! objects or a mix of both. A record is recognized as any object with a
//! non-null `date` or `moment` member; everything else is a container.

use serde_json::Value;

/// Members whose presence marks an object as a record.
const LEAF_KEYS: &[&str] = &["date", "moment"];

/// Collects every record in `value`, depth-first, in source order.
///
/// Scalars outside records are ignored. A record is never searched for
/// nested records.
pub fn flatten_records(value: &Value) -> Vec<Value> {
    let mut records = Vec::new();
    collect(value, &mut records);
    records
}

fn collect(value: &Value, records: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, records);
            }
        }
        Value::Object(map) => {
            if is_record(map) {
                records.push(value.clone());
                return;
            }
            for member in map.values() {
                collect(member, records);
            }
        }
        _ => {}
    }
}

fn is_record(map: &serde_json::Map<String, Value>) -> bool {
    LEAF_KEYS
        .iter()
        .any(|key| map.get(*key).is_some_and(|v| !v.is_null()))
}
