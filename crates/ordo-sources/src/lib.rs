//! Source APIs, record normalization and core/legacy fallback.
//!
//! This crate turns the output of the external liturgical calendar library
//! into [`CanonicalEvent`](ordo_core::CanonicalEvent)s:
//!
//! - [`CoreApi`] / [`LegacyApi`] - The two API shapes the library exposes
//! - [`BridgeScript`] - Both APIs served by a bridge script run under `node`
//! - [`normalize_record`] - Probe-table adapter from raw record to event
//! - [`flatten_records`] - Recursive descent over the legacy API's nesting
//! - [`FallbackFetcher`] - Core first, legacy on failure, one outcome per year
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐
//! │    Core API     │    │   Legacy API    │
//! └────────┬────────┘    └────────┬────────┘
//!          │ Vec<Value>           │ nested Value
//!          │                      ▼ flatten_records()
//!          │             ┌─────────────────┐
//!          │             │   Vec<Value>    │
//!          │             └────────┬────────┘
//!          └──────────┬───────────┘
//!                     ▼ normalize_records()
//!            ┌──────────────────┐
//!            │  CanonicalEvent  │
//!            └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ordo_core::RequestSpec;
//! use ordo_sources::{BridgeConfig, BridgeScript, FallbackFetcher};
//!
//! let fetcher = FallbackFetcher::from_bridge(BridgeScript::new(BridgeConfig::new("bridge.mjs")));
//! let outcome = fetcher.fetch_year(&RequestSpec::new(2025)).await?;
//! println!("{} events from the {} API", outcome.events.len(), outcome.api);
//! ```

pub mod api;
pub mod bridge;
pub mod error;
pub mod fallback;
pub mod flatten;
pub mod normalize;
pub mod value;

pub use api::{BoxFuture, CoreApi, CoreOptions, LegacyApi, LegacyOptions, Localization, SourceApi};
pub use bridge::{BridgeConfig, BridgeScript, DEFAULT_PROGRAM};
pub use error::{FetchError, MalformedRecord, SourceError, SourceErrorCode, SourceResult};
pub use fallback::{DEFAULT_GENERAL_MODULES, FallbackFetcher, SourceOutcome, select_calendar_module};
pub use flatten::flatten_records;
pub use normalize::{
    Normalized, PROBES, ProbeTable, UNNAMED_CELEBRATION, normalize_record, normalize_records,
};
