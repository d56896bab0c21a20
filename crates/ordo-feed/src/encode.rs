//! iCalendar document rendering.

use chrono::{Days, NaiveDate};
use tracing::debug;

use ordo_core::{CanonicalEvent, EventTime};

use crate::config::FeedConfig;
use crate::describe::{category, description};
use crate::error::FeedError;
use crate::escape::{CRLF, escape_text, fold_line};
use crate::uid::stable_uid;

/// Renders `events` as a complete iCalendar document.
///
/// Events are written in date order; events on the same date keep their
/// input order. The output depends only on the events and `config`, so
/// rendering the same input twice gives byte-identical feeds.
///
/// # Errors
///
/// Returns [`FeedError::MissingMetadata`] when the feed name, domain or
/// timezone is empty, and [`FeedError::ControlCharacter`] when a property
/// written without escaping holds a control character.
pub fn encode_feed(events: &[CanonicalEvent], config: &FeedConfig) -> Result<String, FeedError> {
    config.validate()?;

    let mut ordered: Vec<&CanonicalEvent> = events.iter().collect();
    ordered.sort_by_key(|event| event.date.time());

    let mut writer = FeedWriter::default();
    writer.property("BEGIN", "VCALENDAR");
    writer.property("VERSION", "2.0");
    writer.text("PRODID", &config.prodid());
    writer.property("CALSCALE", "GREGORIAN");
    if let Some(method) = &config.method {
        writer.property("METHOD", method);
    }
    writer.text("X-WR-CALNAME", &config.name);
    writer.text("X-WR-TIMEZONE", &config.timezone);
    if let Some(interval) = &config.refresh_interval {
        writer.property("REFRESH-INTERVAL;VALUE=DURATION", interval);
    }
    if let Some(ttl) = &config.published_ttl {
        writer.property("X-PUBLISHED-TTL", ttl);
    }

    for event in &ordered {
        writer.event(event, &config.domain);
    }

    writer.property("END", "VCALENDAR");
    debug!(
        events = ordered.len(),
        bytes = writer.out.len(),
        "Encoded feed"
    );
    Ok(writer.out)
}

#[derive(Default)]
struct FeedWriter {
    out: String,
}

impl FeedWriter {
    fn property(&mut self, name: &str, value: &str) {
        self.out.push_str(&fold_line(&format!("{name}:{value}")));
        self.out.push_str(CRLF);
    }

    fn text(&mut self, name: &str, value: &str) {
        self.property(name, &escape_text(value));
    }

    fn event(&mut self, event: &CanonicalEvent, domain: &str) {
        self.property("BEGIN", "VEVENT");
        self.property("UID", &stable_uid(event, domain));
        let stamp = format!("{}T000000Z", compact_date(event.date.day()));
        self.property("DTSTAMP", &stamp);

        match event.date.time() {
            EventTime::AllDay(day) => {
                self.property("DTSTART;VALUE=DATE", &compact_date(day));
                // Exclusive end; the last representable day has none
                if let Some(next) = day.checked_add_days(Days::new(1)) {
                    self.property("DTEND;VALUE=DATE", &compact_date(next));
                }
            }
            EventTime::DateTime(at) => {
                self.property("DTSTART", &at.format("%Y%m%dT%H%M%SZ").to_string());
            }
        }

        self.text("SUMMARY", &event.name);
        if let Some(description) = description(event) {
            self.text("DESCRIPTION", &description);
        }
        self.text("CATEGORIES", category(event));
        self.property("TRANSP", "TRANSPARENT");
        self.property("END", "VEVENT");
    }
}

fn compact_date(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordo_core::{ColorValue, EventDate, RequestSpec, YearEvents, aggregate};
    use std::collections::HashSet;

    fn event(date: &str, name: &str) -> CanonicalEvent {
        CanonicalEvent::new(EventDate::parse(date).unwrap(), name)
    }

    fn config() -> FeedConfig {
        FeedConfig::new("Test Calendar", "example.org", "UTC")
    }

    fn lines(feed: &str) -> Vec<&str> {
        feed.split(CRLF).filter(|line| !line.is_empty()).collect()
    }

    mod header {
        use super::*;

        #[test]
        fn empty_feed() {
            let feed = encode_feed(&[], &config()).unwrap();
            assert_eq!(
                lines(&feed),
                vec![
                    "BEGIN:VCALENDAR",
                    "VERSION:2.0",
                    "PRODID:-//example.org//Test Calendar//EN",
                    "CALSCALE:GREGORIAN",
                    "METHOD:PUBLISH",
                    "X-WR-CALNAME:Test Calendar",
                    "X-WR-TIMEZONE:UTC",
                    "REFRESH-INTERVAL;VALUE=DURATION:P1D",
                    "X-PUBLISHED-TTL:P1D",
                    "END:VCALENDAR",
                ]
            );
            assert!(feed.ends_with("END:VCALENDAR\r\n"));
        }

        #[test]
        fn optional_properties_omitted() {
            let config = config()
                .with_method(None)
                .with_refresh_interval(None)
                .with_published_ttl(None);
            let feed = encode_feed(&[], &config).unwrap();
            assert!(!feed.contains("METHOD"));
            assert!(!feed.contains("REFRESH-INTERVAL"));
            assert!(!feed.contains("X-PUBLISHED-TTL"));
        }

        #[test]
        fn calendar_name_is_escaped() {
            let config = FeedConfig::new("Ordo; Parish, Rome", "example.org", "Europe/Rome")
                .with_prodid(Some("-//Parish//Ordo//EN".to_string()));
            let feed = encode_feed(&[], &config).unwrap();
            assert!(feed.contains("X-WR-CALNAME:Ordo\\; Parish\\, Rome\r\n"));
            assert!(feed.contains("X-WR-TIMEZONE:Europe/Rome\r\n"));
            assert!(feed.contains("PRODID:-//Parish//Ordo//EN\r\n"));
        }

        #[test]
        fn derived_prodid_is_escaped() {
            let config = FeedConfig::new("Ordo; Parish, Rome", "example.org", "UTC");
            let feed = encode_feed(&[], &config).unwrap();
            assert!(
                feed.contains("PRODID:-//example.org//Ordo\\; Parish\\, Rome//EN\r\n")
            );

            let config = FeedConfig::new("Ordo\nBEGIN:VEVENT", "example.org", "UTC");
            let feed = encode_feed(&[], &config).unwrap();
            assert!(
                feed.contains("PRODID:-//example.org//Ordo\\nBEGIN:VEVENT//EN\r\n")
            );
            assert!(!lines(&feed).contains(&"BEGIN:VEVENT"));
            assert!(!feed.replace("\r\n", "").contains('\n'));
        }

        #[test]
        fn control_character_in_method_is_fatal() {
            let config = config().with_method(Some("PUBLISH\nBEGIN:VEVENT".to_string()));
            let err = encode_feed(&[], &config).unwrap_err();
            assert_eq!(err, FeedError::ControlCharacter { field: "method" });
        }

        #[test]
        fn missing_metadata_is_fatal() {
            let err = encode_feed(&[], &FeedConfig::new("Ordo", "", "UTC")).unwrap_err();
            assert_eq!(err, FeedError::MissingMetadata { field: "domain" });
        }
    }

    mod events {
        use super::*;

        #[test]
        fn all_day_event_has_exclusive_end() {
            let feed = encode_feed(&[event("2025-12-31", "New Year's Eve")], &config()).unwrap();
            let lines = lines(&feed);
            assert!(lines.contains(&"DTSTART;VALUE=DATE:20251231"));
            assert!(lines.contains(&"DTEND;VALUE=DATE:20260101"));
            assert!(lines.contains(&"DTSTAMP:20251231T000000Z"));
            assert!(lines.contains(&"CATEGORIES:Celebration"));
            assert!(lines.contains(&"TRANSP:TRANSPARENT"));
            assert!(!feed.contains("DESCRIPTION"));
        }

        #[test]
        fn timed_event_uses_utc() {
            let vigil = event("2025-04-19T21:00:00-02:00", "Easter Vigil");
            let feed = encode_feed(&[vigil], &config()).unwrap();
            let lines = lines(&feed);
            assert!(lines.contains(&"DTSTART:20250419T230000Z"));
            assert!(lines.contains(&"DTSTAMP:20250419T000000Z"));
            assert!(!feed.contains("DTEND"));
        }

        #[test]
        fn summary_and_description_are_escaped() {
            let christmas = event("2025-12-25", "Nativity of the Lord; Mass at Night")
                .with_rank_name("Solemnity")
                .with_color(ColorValue::One("white".into()));
            let feed = encode_feed(&[christmas], &config()).unwrap();

            assert!(
                feed.contains("SUMMARY:Nativity of the Lord\\; Mass at Night\r\n")
            );
            assert!(
                feed.contains("DESCRIPTION:Rank: Solemnity\\nLiturgical color: white\r\n")
            );
            assert!(feed.contains("CATEGORIES:Solemnity\r\n"));
        }

        #[test]
        fn long_lines_are_folded() {
            let note = "Readings ".repeat(20);
            let christmas = event("2025-12-25", "Christmas").with_note(note);
            let feed = encode_feed(&[christmas], &config()).unwrap();
            for line in feed.split(CRLF) {
                assert!(line.len() <= 75, "line too long: {line}");
            }
            assert!(feed.contains("\r\n "));
        }

        #[test]
        fn sorted_by_date_with_stable_ties() {
            let events = vec![
                event("2025-12-26", "St. Stephen"),
                event("2025-12-25", "Mass at Night"),
                event("2025-12-25T10:00:00Z", "Mass during the Day"),
                event("2025-12-25", "Mass at Dawn"),
            ];
            let feed = encode_feed(&events, &config()).unwrap();

            let summaries: Vec<&str> = lines(&feed)
                .into_iter()
                .filter_map(|line| line.strip_prefix("SUMMARY:"))
                .collect();
            assert_eq!(
                summaries,
                vec![
                    "Mass at Night",
                    "Mass at Dawn",
                    "Mass during the Day",
                    "St. Stephen"
                ]
            );
        }

        #[test]
        fn aggregated_events_have_unique_uids() {
            let day = |name: &str| event("2025-12-25", name);
            let merged = aggregate(vec![YearEvents::new(
                RequestSpec::new(2025),
                vec![
                    day("Nativity of the Lord").with_slug("christmas"),
                    day("Christmas"),
                    day("Mass, at Night"),
                    day("Mass at Night"),
                    day("Mass at Dawn"),
                ],
            )]);
            let feed = encode_feed(&merged, &config()).unwrap();

            let uids: Vec<&str> = lines(&feed)
                .into_iter()
                .filter_map(|line| line.strip_prefix("UID:"))
                .collect();
            let unique: HashSet<&str> = uids.iter().copied().collect();
            assert_eq!(uids.len(), 3);
            assert_eq!(unique.len(), uids.len());
        }

        #[test]
        fn encoding_is_deterministic() {
            let events = vec![
                event("2025-12-25", "Nativity of the Lord").with_slug("christmas"),
                event("2026-01-01", "Mary, Mother of God"),
            ];
            let first = encode_feed(&events, &config()).unwrap();
            let second = encode_feed(&events, &config()).unwrap();
            assert_eq!(first, second);
            assert!(
                first.contains("UID:7cec29cf-342b-5837-92db-1e41ac92ba15@example.org\r\n")
            );
            assert!(
                first.contains("UID:45f092a3-d949-5ca0-95d7-ee4722da421a@example.org\r\n")
            );
        }
    }
}
