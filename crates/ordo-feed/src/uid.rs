//! Stable event identifiers.
//!
//! A UID depends only on the event's [identity](CanonicalEvent::identity)
//! and the feed domain, so regenerating a feed keeps every UID and
//! subscribers see updates instead of duplicates.

use uuid::Uuid;

use ordo_core::CanonicalEvent;

pub use ordo_core::slugify;

/// Returns `UUIDv5(URL, "{domain}/{YYYY-MM-DD}/{slug}")@{domain}`.
pub fn stable_uid(event: &CanonicalEvent, domain: &str) -> String {
    let domain = domain.trim();
    let (day, slug) = event.identity();
    let seed = format!("{}/{}/{}", domain, day.format("%Y-%m-%d"), slug);
    let uuid = Uuid::new_v5(&Uuid::NAMESPACE_URL, seed.as_bytes());
    format!("{}@{}", uuid, domain)
}
