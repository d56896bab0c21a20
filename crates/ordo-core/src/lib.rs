//! Core types: canonical events, dates, requests, aggregation, tracing

pub mod aggregate;
pub mod error;
pub mod event;
pub mod request;
pub mod slug;
pub mod time;
pub mod tracing;

pub use aggregate::{YearEvents, aggregate};
pub use error::{DateError, RequestError};
pub use event::{CanonicalEvent, ColorValue};
pub use request::{GENERAL_CALENDAR, MAX_YEAR, MIN_YEAR, RequestSpec};
pub use slug::slugify;
pub use self::tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
pub use time::{EventDate, EventTime};
