//! Route lookup and the fallback dispatch policy.

use crate::error::FetchError;
use crate::recorder::CallLog;
use crate::types::request::{MockRequest, RequestOptions};
use crate::types::response::ResponseSpec;
use crate::types::route::Route;
use log::warn;

/// What to do with a request no route matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackMode {
    /// Unmatched requests fail with a configuration error
    #[default]
    None,
    /// Unmatched requests go to the real network
    OnUnmatched,
    /// Every request goes to the real network; the router is bypassed
    Always,
}

/// Dispatch-policy configuration.
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub fallback: FallbackMode,
    /// Response used for unmatched requests before network fallback applies
    pub fallback_response: Option<ResponseSpec>,
    /// Emit a warning for unmatched requests
    pub warn_on_unmatched: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackMode::None,
            fallback_response: None,
            warn_on_unmatched: true,
        }
    }
}

/// Outcome of the dispatch policy.
#[derive(Debug, Clone)]
pub struct RouterOutcome {
    /// The specification to resolve
    pub response: ResponseSpec,
    /// Whether the response is the real network fetch
    pub is_passthrough: bool,
    /// Identifier of the matched route, when one matched
    pub route_id: Option<String>,
}

/// Scan routes in registration order and return the first match.
///
/// The match is recorded here, not in the caller, so every successful
/// routing attempt is observable exactly once even when a policy above
/// overrides the result.
pub fn route<'a>(
    routes: &'a [Route],
    url: &str,
    options: &RequestOptions,
    request: Option<&MockRequest>,
    log: &CallLog,
) -> Option<&'a Route> {
    let found = routes
        .iter()
        .find(|route| route.matcher.matches(url, options, request));
    if let Some(route) = found {
        log.record(url, options, request, Some(&route.identifier), false);
    }
    found
}

/// Decide how a request is answered. Synchronous; never suspends.
///
/// Ordered policy: always-fallback bypasses the router entirely (the attempt
/// is still recorded, marked unmatched, to keep the call log consistent);
/// otherwise the first matching route wins; unmatched requests use the
/// configured fallback response, fail, or go to the network depending on
/// [`FallbackMode`].
pub fn decide(
    routes: &[Route],
    config: &MockConfig,
    url: &str,
    options: &RequestOptions,
    request: Option<&MockRequest>,
    log: &CallLog,
) -> Result<RouterOutcome, FetchError> {
    if config.fallback == FallbackMode::Always {
        log.record(url, options, request, None, true);
        return Ok(RouterOutcome {
            response: ResponseSpec::Passthrough,
            is_passthrough: true,
            route_id: None,
        });
    }

    if let Some(route) = route(routes, url, options, request, log) {
        return Ok(RouterOutcome {
            response: route.response.clone(),
            is_passthrough: false,
            route_id: Some(route.identifier.clone()),
        });
    }

    if config.warn_on_unmatched {
        warn!(
            "unmatched {} to {}, falling back to {:?}",
            options.effective_method(),
            url,
            config.fallback
        );
    }
    log.record(url, options, request, None, true);

    if let Some(fallback) = &config.fallback_response {
        return Ok(RouterOutcome {
            response: fallback.clone(),
            is_passthrough: false,
            route_id: None,
        });
    }

    if config.fallback == FallbackMode::None {
        return Err(FetchError::NoFallback {
            method: options.effective_method().to_string(),
            url: url.to_string(),
        });
    }

    Ok(RouterOutcome {
        response: ResponseSpec::Passthrough,
        is_passthrough: true,
        route_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::HttpMethod;
    use crate::types::route::{MatchSpec, Matcher};
    use rstest::rstest;

    fn options() -> RequestOptions {
        RequestOptions::default()
    }

    #[rstest]
    fn test_first_match_wins() {
        let routes = vec![
            Route::new("broad", Matcher::func(|url, _, _| url.starts_with("/api")), 200),
            Route::new("specific", "/api/users", 404),
        ];
        let log = CallLog::new();

        let found = route(&routes, "/api/users", &options(), None, &log);
        // Registration order is authoritative, not specificity
        assert_eq!(found.unwrap().identifier, "broad");
        assert_eq!(log.len(), 1);
        assert_eq!(log.calls()[0].identifier.as_deref(), Some("broad"));
    }

    #[rstest]
    fn test_no_match_records_nothing_in_router() {
        let routes = vec![Route::new("users", "/api/users", 200)];
        let log = CallLog::new();
        assert!(route(&routes, "/api/posts", &options(), None, &log).is_none());
        assert!(log.is_empty());
    }

    #[rstest]
    fn test_decide_matched() {
        let routes = vec![Route::new("users", "/api/users", 200)];
        let log = CallLog::new();
        let outcome =
            decide(&routes, &MockConfig::default(), "/api/users", &options(), None, &log)
                .expect("should match");
        assert!(!outcome.is_passthrough);
        assert_eq!(outcome.route_id.as_deref(), Some("users"));
        assert_eq!(log.matched_calls().len(), 1);
    }

    #[rstest]
    fn test_decide_unmatched_without_fallback_fails() {
        let routes: Vec<Route> = vec![];
        let log = CallLog::new();
        let options = RequestOptions {
            method: Some(HttpMethod::Post),
            ..Default::default()
        };
        let err = decide(&routes, &MockConfig::default(), "/data", &options, None, &log)
            .expect_err("no fallback configured");
        assert_eq!(
            err,
            FetchError::NoFallback {
                method: "POST".to_string(),
                url: "/data".to_string(),
            }
        );
        assert_eq!(log.unmatched_calls().len(), 1);
    }

    #[rstest]
    fn test_decide_unmatched_uses_fallback_response() {
        let routes: Vec<Route> = vec![];
        let config = MockConfig {
            fallback_response: Some(ResponseSpec::status(418)),
            ..Default::default()
        };
        let log = CallLog::new();
        let outcome = decide(&routes, &config, "/anything", &options(), None, &log)
            .expect("fallback response configured");
        assert!(!outcome.is_passthrough);
        assert!(outcome.route_id.is_none());
        assert_eq!(log.unmatched_calls().len(), 1);
    }

    #[rstest]
    fn test_decide_unmatched_network_fallback() {
        let routes: Vec<Route> = vec![];
        let config = MockConfig {
            fallback: FallbackMode::OnUnmatched,
            ..Default::default()
        };
        let log = CallLog::new();
        let outcome = decide(&routes, &config, "/anything", &options(), None, &log)
            .expect("network fallback enabled");
        assert!(outcome.is_passthrough);
        assert!(matches!(outcome.response, ResponseSpec::Passthrough));
    }

    #[rstest]
    fn test_decide_always_bypasses_router() {
        // A route that would match is never consulted
        let routes = vec![Route::new("users", "/api/users", 200)];
        let config = MockConfig {
            fallback: FallbackMode::Always,
            ..Default::default()
        };
        let log = CallLog::new();
        let outcome = decide(&routes, &config, "/api/users", &options(), None, &log)
            .expect("always falls back");
        assert!(outcome.is_passthrough);
        assert!(outcome.route_id.is_none());
        // The attempt is still logged, marked unmatched
        assert_eq!(log.unmatched_calls().len(), 1);
        assert_eq!(log.matched_calls().len(), 0);
    }

    #[rstest]
    fn test_decide_is_idempotent() {
        let routes = vec![Route::new(
            "users",
            MatchSpec::url("/api/users").method(HttpMethod::Get),
            200,
        )];
        let config = MockConfig::default();
        let log = CallLog::new();

        let first = decide(&routes, &config, "/api/users", &options(), None, &log).unwrap();
        let second = decide(&routes, &config, "/api/users", &options(), None, &log).unwrap();
        assert_eq!(first.route_id, second.route_id);
        assert_eq!(first.is_passthrough, second.is_passthrough);
        // Each attempt recorded once
        assert_eq!(log.len(), 2);
    }
}
