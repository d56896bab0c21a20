//! Merging per-year results into one ordered event sequence.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::event::CanonicalEvent;
use crate::request::RequestSpec;

/// The events produced for one request.
#[derive(Debug, Clone)]
pub struct YearEvents {
    /// The request these events answer.
    pub request: RequestSpec,
    /// Normalized events, in source order.
    pub events: Vec<CanonicalEvent>,
}

impl YearEvents {
    /// Creates a new per-year result.
    pub fn new(request: RequestSpec, events: Vec<CanonicalEvent>) -> Self {
        Self { request, events }
    }
}

/// Merges per-year results into one sequence ready for encoding.
///
/// - Results are concatenated in request order.
/// - Optional memorials are dropped from requests that excluded them.
/// - Later events whose [`CanonicalEvent::identity`] was already seen are
///   dropped; the same celebration in another year has another day and stays.
/// - The result is stably sorted by date, so same-day celebrations keep the
///   order the source gave them.
pub fn aggregate(results: Vec<YearEvents>) -> Vec<CanonicalEvent> {
    let mut seen: HashSet<(NaiveDate, String)> = HashSet::new();
    let mut merged = Vec::new();

    for YearEvents { request, events } in results {
        let total = events.len();
        let mut optional_dropped = 0usize;
        let mut duplicates = 0usize;

        for event in events {
            if !request.include_optional && event.is_optional_memorial() {
                optional_dropped += 1;
                continue;
            }
            if !seen.insert(event.identity()) {
                duplicates += 1;
                continue;
            }
            merged.push(event);
        }

        debug!(
            year = request.year,
            total,
            optional_dropped,
            duplicates,
            "Merged year"
        );
    }

    merged.sort_by_key(|event| event.date.time());
    merged
}
