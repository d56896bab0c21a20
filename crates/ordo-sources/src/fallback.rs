//! Core-first retrieval with legacy fallback.
//!
//! [`FallbackFetcher`] holds up to two source APIs. For each request it tries
//! the core API, and on any failure (including a missing core API) retries
//! the same request against the legacy API. Only when both fail is the
//! request reported as [`FetchError::SourceUnavailable`], carrying both
//! messages.

use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, info, warn};

use ordo_core::{RequestSpec, YearEvents};

use crate::api::{CoreApi, CoreOptions, LegacyApi, LegacyOptions, Localization, SourceApi};
use crate::bridge::BridgeScript;
use crate::error::{FetchError, SourceError, SourceResult};
use crate::flatten::flatten_records;
use crate::normalize::{Normalized, normalize_records};

/// Core modules tried, in order, for the general calendar.
pub const DEFAULT_GENERAL_MODULES: &[&str] = &[
    "GeneralRoman",
    "GeneralRomanCalendar",
    "General",
    "generalCalendar",
];

/// One year's events and where they came from.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    /// Normalized events in source order.
    pub events: Vec<ordo_core::CanonicalEvent>,
    /// The API that served the request.
    pub api: SourceApi,
    /// Number of records dropped as malformed.
    pub skipped: usize,
}

impl SourceOutcome {
    fn new(normalized: Normalized, api: SourceApi) -> Self {
        Self {
            events: normalized.events,
            api,
            skipped: normalized.skipped.len(),
        }
    }
}

/// Picks the core calendar module for a request.
///
/// A named calendar matches `{name}Calendar` first, then `{name}`, ignoring
/// case. The general calendar, or a name nothing matches, resolves to the
/// first of [`DEFAULT_GENERAL_MODULES`] that is available.
pub fn select_calendar_module(modules: &[String], request: &RequestSpec) -> Option<String> {
    let find = |wanted: &str| {
        modules
            .iter()
            .find(|module| module.eq_ignore_ascii_case(wanted))
            .cloned()
    };

    if !request.is_general() {
        let name = request.calendar_name();
        let named = find(format!("{name}Calendar").as_str()).or_else(|| find(name));
        if named.is_some() {
            return named;
        }
        warn!(
            calendar = name,
            "No core module for calendar, using the general calendar"
        );
    }

    DEFAULT_GENERAL_MODULES
        .iter()
        .find_map(|module| find(*module))
}

/// Fetches years from the core API, falling back to the legacy API.
#[derive(Clone, Default)]
pub struct FallbackFetcher {
    core: Option<Arc<dyn CoreApi>>,
    legacy: Option<Arc<dyn LegacyApi>>,
}

impl fmt::Debug for FallbackFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackFetcher")
            .field("core", &self.core.is_some())
            .field("legacy", &self.legacy.is_some())
            .finish()
    }
}

impl FallbackFetcher {
    /// Creates a fetcher with no source APIs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses one bridge script for both APIs.
    pub fn from_bridge(bridge: BridgeScript) -> Self {
        let bridge = Arc::new(bridge);
        let core: Arc<dyn CoreApi> = bridge.clone();
        let legacy: Arc<dyn LegacyApi> = bridge;
        Self::new().with_core(core).with_legacy(legacy)
    }

    /// Sets the core API.
    pub fn with_core(mut self, core: Arc<dyn CoreApi>) -> Self {
        self.core = Some(core);
        self
    }

    /// Sets the legacy API.
    pub fn with_legacy(mut self, legacy: Arc<dyn LegacyApi>) -> Self {
        self.legacy = Some(legacy);
        self
    }

    /// Retrieves and normalizes one year.
    ///
    /// # Errors
    ///
    /// [`FetchError::InvalidRequest`] if the request fails validation (no
    /// API is called), [`FetchError::SourceUnavailable`] if both APIs fail.
    pub async fn fetch_year(&self, request: &RequestSpec) -> Result<SourceOutcome, FetchError> {
        request.validate()?;

        let core_err = match self.fetch_core(request).await {
            Ok(normalized) => return Ok(self.served(request, normalized, SourceApi::Core)),
            Err(err) => err,
        };
        warn!(
            year = request.year,
            error = %core_err,
            "Core API failed, falling back to the legacy API"
        );

        match self.fetch_legacy(request).await {
            Ok(normalized) => Ok(self.served(request, normalized, SourceApi::Legacy)),
            Err(legacy_err) => Err(FetchError::SourceUnavailable {
                year: request.year,
                primary: core_err.to_string(),
                legacy: legacy_err.to_string(),
            }),
        }
    }

    /// Retrieves all requests concurrently, in request order.
    ///
    /// The first failing request fails the whole batch.
    pub async fn fetch_all(&self, requests: &[RequestSpec]) -> Result<Vec<YearEvents>, FetchError> {
        try_join_all(requests.iter().map(|request| async move {
            let outcome = self.fetch_year(request).await?;
            Ok::<_, FetchError>(YearEvents::new(request.clone(), outcome.events))
        }))
        .await
    }

    async fn fetch_core(&self, request: &RequestSpec) -> SourceResult<Normalized> {
        let core = self.core.as_ref().ok_or_else(|| {
            SourceError::unavailable("core API is not configured")
                .with_api(SourceApi::Core.as_str())
        })?;

        let modules = core.calendar_modules().await?;
        let module = select_calendar_module(&modules, request).ok_or_else(|| {
            SourceError::configuration(format!(
                "no calendar module for {:?} among {} available",
                request.calendar_name(),
                modules.len()
            ))
            .with_api(SourceApi::Core.as_str())
        })?;
        debug!(year = request.year, module = %module, "Selected core calendar module");

        let options = CoreOptions {
            calendars: vec![module],
            localization: Localization {
                locale: request.locale.clone(),
            },
            allow_optional_memorials: request.include_optional,
        };
        let records = core.generate(request.year, options).await?;
        Ok(normalize_records(&records))
    }

    async fn fetch_legacy(&self, request: &RequestSpec) -> SourceResult<Normalized> {
        let legacy = self.legacy.as_ref().ok_or_else(|| {
            SourceError::unavailable("legacy API is not configured")
                .with_api(SourceApi::Legacy.as_str())
        })?;

        let options = LegacyOptions {
            calendar: request.calendar_name().to_string(),
            localization: Localization {
                locale: request.locale.clone(),
            },
            year: request.year,
            allow_optional_memorials: request.include_optional,
        };
        let nested = legacy.calendar_for(options).await?;
        Ok(normalize_records(&flatten_records(&nested)))
    }

    fn served(
        &self,
        request: &RequestSpec,
        normalized: Normalized,
        api: SourceApi,
    ) -> SourceOutcome {
        let outcome = SourceOutcome::new(normalized, api);
        info!(
            year = request.year,
            api = %api,
            events = outcome.events.len(),
            skipped = outcome.skipped,
            "Fetched calendar year"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::BoxFuture;
    use serde_json::{Value, json};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeCore {
        modules: Vec<String>,
        records: Vec<Value>,
        fail: Option<String>,
        calls: Mutex<Vec<(i32, CoreOptions)>>,
    }

    impl FakeCore {
        fn serving(records: Vec<Value>) -> Self {
            Self {
                modules: vec!["GeneralRoman".to_string(), "FranceCalendar".to_string()],
                records,
                ..Self::default()
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                fail: Some(message.to_string()),
                ..Self::default()
            }
        }
    }

    impl CoreApi for FakeCore {
        fn calendar_modules(&self) -> BoxFuture<'_, SourceResult<Vec<String>>> {
            let result = match &self.fail {
                Some(message) => Err(SourceError::process(message.clone()).with_api("core")),
                None => Ok(self.modules.clone()),
            };
            Box::pin(async move { result })
        }

        fn generate(
            &self,
            year: i32,
            options: CoreOptions,
        ) -> BoxFuture<'_, SourceResult<Vec<Value>>> {
            self.calls.lock().unwrap().push((year, options));
            let records = self.records.clone();
            Box::pin(async move { Ok(records) })
        }
    }

    #[derive(Default)]
    struct FakeLegacy {
        payload: Value,
        fail: Option<String>,
        calls: Mutex<Vec<LegacyOptions>>,
    }

    impl LegacyApi for FakeLegacy {
        fn calendar_for(&self, options: LegacyOptions) -> BoxFuture<'_, SourceResult<Value>> {
            let year = options.year;
            self.calls.lock().unwrap().push(options);
            let result = match &self.fail {
                Some(message) => Err(SourceError::process(message.clone()).with_api("legacy")),
                None => Ok(self.payload.clone()),
            };
            Box::pin(async move {
                let mut payload = result?;
                if let Some(items) = payload.as_array_mut() {
                    for item in items {
                        item["date"] = json!(format!("{year}-12-25"));
                    }
                }
                Ok(payload)
            })
        }
    }

    fn request(year: i32) -> RequestSpec {
        RequestSpec::new(year)
    }

    mod module_selection {
        use super::*;

        fn modules(names: &[&str]) -> Vec<String> {
            names.iter().map(|name| name.to_string()).collect()
        }

        #[test]
        fn general_uses_default_order() {
            let available = modules(&["General", "GeneralRomanCalendar", "FranceCalendar"]);
            assert_eq!(
                select_calendar_module(&available, &request(2025)).as_deref(),
                Some("GeneralRomanCalendar")
            );
        }

        #[test]
        fn named_calendar_prefers_calendar_suffix() {
            let available = modules(&["France", "FranceCalendar", "GeneralRoman"]);
            let req = request(2025).with_calendar("france");
            assert_eq!(
                select_calendar_module(&available, &req).as_deref(),
                Some("FranceCalendar")
            );
        }

        #[test]
        fn named_calendar_bare_match() {
            let available = modules(&["UnitedStates", "GeneralRoman"]);
            let req = request(2025).with_calendar("unitedStates");
            assert_eq!(
                select_calendar_module(&available, &req).as_deref(),
                Some("UnitedStates")
            );
        }

        #[test]
        fn unmatched_name_falls_back_to_general() {
            let available = modules(&["GeneralRoman"]);
            let req = request(2025).with_calendar("atlantis");
            assert_eq!(
                select_calendar_module(&available, &req).as_deref(),
                Some("GeneralRoman")
            );
        }

        #[test]
        fn nothing_usable() {
            let available = modules(&["Other"]);
            assert_eq!(select_calendar_module(&available, &request(2025)), None);
        }
    }

    mod fetch_year {
        use super::*;

        #[tokio::test]
        async fn core_success() {
            let core = Arc::new(FakeCore::serving(vec![
                json!({"date": "2025-12-25", "name": "Christmas"}),
                json!({"name": "no date"}),
            ]));
            let legacy = Arc::new(FakeLegacy::default());
            let fetcher = FallbackFetcher::new()
                .with_core(core.clone())
                .with_legacy(legacy.clone());

            let outcome = fetcher
                .fetch_year(&request(2025).with_include_optional(false))
                .await
                .unwrap();

            assert_eq!(outcome.api, SourceApi::Core);
            assert_eq!(outcome.events.len(), 1);
            assert_eq!(outcome.skipped, 1);
            assert!(legacy.calls.lock().unwrap().is_empty());

            let calls = core.calls.lock().unwrap();
            let (year, options) = &calls[0];
            assert_eq!(*year, 2025);
            assert_eq!(options.calendars, vec!["GeneralRoman"]);
            assert_eq!(options.localization.locale, "en");
            assert!(!options.allow_optional_memorials);
        }

        #[tokio::test]
        async fn core_failure_calls_legacy_with_same_inputs() {
            let legacy = Arc::new(FakeLegacy {
                payload: json!([{"name": "Nativity of the Lord"}]),
                ..FakeLegacy::default()
            });
            let fetcher = FallbackFetcher::new()
                .with_core(Arc::new(FakeCore::failing("romcal missing")))
                .with_legacy(legacy.clone());

            let req = request(2025).with_locale("en").with_calendar("general");
            let outcome = fetcher.fetch_year(&req).await.unwrap();

            assert_eq!(outcome.api, SourceApi::Legacy);
            assert_eq!(outcome.events[0].date.as_str(), "2025-12-25");

            let calls = legacy.calls.lock().unwrap();
            assert_eq!(
                calls[0],
                LegacyOptions {
                    calendar: "general".to_string(),
                    localization: Localization {
                        locale: "en".to_string()
                    },
                    year: 2025,
                    allow_optional_memorials: true,
                }
            );
        }

        #[tokio::test]
        async fn legacy_output_is_flattened() {
            let legacy = Arc::new(FakeLegacy {
                payload: json!({
                    "Dec": {"25": {"date": "2025-12-25", "title": "Nativity of the Lord"}},
                }),
                ..FakeLegacy::default()
            });
            let fetcher = FallbackFetcher::new().with_legacy(legacy);

            let outcome = fetcher.fetch_year(&request(2025)).await.unwrap();

            assert_eq!(outcome.api, SourceApi::Legacy);
            assert_eq!(outcome.events.len(), 1);
            assert_eq!(outcome.events[0].name, "Nativity of the Lord");
        }

        #[tokio::test]
        async fn missing_module_falls_back() {
            let core = Arc::new(FakeCore {
                modules: vec!["Other".to_string()],
                ..FakeCore::default()
            });
            let legacy = Arc::new(FakeLegacy {
                payload: json!([]),
                ..FakeLegacy::default()
            });
            let fetcher = FallbackFetcher::new()
                .with_core(core.clone())
                .with_legacy(legacy);

            let outcome = fetcher.fetch_year(&request(2025)).await.unwrap();

            assert_eq!(outcome.api, SourceApi::Legacy);
            assert!(core.calls.lock().unwrap().is_empty());
        }

        #[tokio::test]
        async fn both_failing_reports_both_messages() {
            let fetcher = FallbackFetcher::new()
                .with_core(Arc::new(FakeCore::failing("romcal missing")))
                .with_legacy(Arc::new(FakeLegacy {
                    fail: Some("legacy script crashed".to_string()),
                    ..FakeLegacy::default()
                }));

            let err = fetcher.fetch_year(&request(2025)).await.unwrap_err();

            match err {
                FetchError::SourceUnavailable {
                    year,
                    primary,
                    legacy,
                } => {
                    assert_eq!(year, 2025);
                    assert!(primary.contains("romcal missing"));
                    assert!(legacy.contains("legacy script crashed"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[tokio::test]
        async fn no_apis_configured() {
            let err = FallbackFetcher::new()
                .fetch_year(&request(2025))
                .await
                .unwrap_err();
            assert!(matches!(err, FetchError::SourceUnavailable { .. }));
        }

        #[tokio::test]
        async fn invalid_request_calls_nothing() {
            let core = Arc::new(FakeCore::serving(Vec::new()));
            let legacy = Arc::new(FakeLegacy::default());
            let fetcher = FallbackFetcher::new()
                .with_core(core.clone())
                .with_legacy(legacy.clone());

            let err = fetcher.fetch_year(&request(1200)).await.unwrap_err();

            assert!(matches!(err, FetchError::InvalidRequest(_)));
            assert!(core.calls.lock().unwrap().is_empty());
            assert!(legacy.calls.lock().unwrap().is_empty());
        }
    }

    mod fetch_all {
        use super::*;

        #[tokio::test]
        async fn keeps_request_order() {
            let legacy = Arc::new(FakeLegacy {
                payload: json!([{"name": "Christmas"}]),
                ..FakeLegacy::default()
            });
            let fetcher = FallbackFetcher::new().with_legacy(legacy);

            let results = fetcher
                .fetch_all(&[request(2026), request(2025)])
                .await
                .unwrap();

            assert_eq!(results.len(), 2);
            assert_eq!(results[0].request.year, 2026);
            assert_eq!(results[0].events[0].date.as_str(), "2026-12-25");
            assert_eq!(results[1].events[0].date.as_str(), "2025-12-25");
        }

        #[tokio::test]
        async fn one_failure_fails_the_batch() {
            let fetcher = FallbackFetcher::new().with_legacy(Arc::new(FakeLegacy {
                payload: json!([]),
                ..FakeLegacy::default()
            }));

            let result = fetcher.fetch_all(&[request(2025), request(0)]).await;
            assert!(matches!(result, Err(FetchError::InvalidRequest(_))));
        }
    }
}
