//! iCalendar feed encoding.
//!
//! [`encode_feed`] turns aggregated [`CanonicalEvent`](ordo_core::CanonicalEvent)s
//! into an RFC 5545 document with deterministic UIDs, all-day or timed
//! dates, escaped text and folded lines.

pub mod config;
pub mod describe;
pub mod encode;
pub mod error;
pub mod escape;
pub mod uid;

pub use config::FeedConfig;
pub use encode::encode_feed;
pub use error::FeedError;
pub use uid::{slugify, stable_uid};
