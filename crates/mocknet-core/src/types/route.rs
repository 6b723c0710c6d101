//! Core route types: matchers and registered routes.

use crate::matching::{headers_match, payload_matches, query_matches, query_of_url, UrlPattern};
use crate::types::request::{HttpMethod, MockRequest, RequestOptions};
use crate::types::response::ResponseSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a custom matcher predicate.
pub type MatcherFn =
    Arc<dyn Fn(&str, &RequestOptions, Option<&MockRequest>) -> bool + Send + Sync>;

/// Structured request matcher.
///
/// Every set field constrains the request; unset fields match anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSpec {
    /// URL pattern (supports `{param}` placeholders)
    pub url: String,
    /// Required HTTP method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Required URL path parameter values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<HashMap<String, String>>,
    /// Required headers (names case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Required query parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<HashMap<String, String>>,
    /// Required body content (partial JSON match)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl MatchSpec {
    pub fn url(pattern: impl Into<String>) -> Self {
        Self {
            url: pattern.into(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// A declarative matcher with its URL pattern compiled once.
///
/// Built when a [`MatchSpec`] is turned into a [`Matcher`], so the pattern
/// regex is not recompiled on every evaluation.
#[derive(Debug, Clone)]
pub struct CompiledSpec {
    spec: MatchSpec,
    pattern: UrlPattern,
}

impl CompiledSpec {
    pub fn new(spec: MatchSpec) -> Self {
        let pattern = UrlPattern::compile(&spec.url);
        Self { spec, pattern }
    }

    pub fn spec(&self) -> &MatchSpec {
        &self.spec
    }

    /// Evaluate the spec against a normalized call.
    ///
    /// Checks run in order: URL, path params, method, headers, query, payload.
    pub fn matches(
        &self,
        url: &str,
        options: &RequestOptions,
        request: Option<&MockRequest>,
    ) -> bool {
        let spec = &self.spec;
        let url_result = self.pattern.match_url(url);
        if !url_result.matched {
            return false;
        }

        if let Some(expected_params) = &spec.params {
            let all_present = expected_params
                .iter()
                .all(|(k, v)| url_result.params.get(k) == Some(v));
            if !all_present {
                return false;
            }
        }

        if let Some(method) = spec.method {
            if options.effective_method() != method {
                return false;
            }
        }

        let empty = HashMap::new();
        let actual_headers = options.headers.as_ref().unwrap_or(&empty);
        if !headers_match(spec.headers.as_ref(), actual_headers) {
            return false;
        }

        if !query_matches(spec.query.as_ref(), &query_of_url(url)) {
            return false;
        }

        match effective_body(options, request) {
            Some(body) => payload_matches(spec.payload.as_ref(), body),
            // A payload is expected but the request has none
            None => spec.payload.is_none(),
        }
    }
}

/// The body the payload check runs against: the structured request's
/// materialized body when present, the options body otherwise.
fn effective_body<'a>(
    options: &'a RequestOptions,
    request: Option<&'a MockRequest>,
) -> Option<&'a Value> {
    request
        .and_then(|r| r.body.as_json())
        .or(options.body.as_ref())
}

/// Predicate deciding whether a route applies to a request.
#[derive(Clone)]
pub enum Matcher {
    /// Declarative matching on URL, method, headers, query, and payload
    Spec(CompiledSpec),
    /// Arbitrary predicate over the normalized call
    Fn(MatcherFn),
}

impl Matcher {
    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&str, &RequestOptions, Option<&MockRequest>) -> bool + Send + Sync + 'static,
    {
        Matcher::Fn(Arc::new(f))
    }

    pub fn matches(
        &self,
        url: &str,
        options: &RequestOptions,
        request: Option<&MockRequest>,
    ) -> bool {
        match self {
            Matcher::Spec(compiled) => compiled.matches(url, options, request),
            Matcher::Fn(f) => f(url, options, request),
        }
    }

    /// Whether this matcher inspects the request body.
    ///
    /// Closure matchers cannot be introspected; routes built from them
    /// declare body usage explicitly via [`Route::with_body_matching`].
    fn inspects_body(&self) -> bool {
        matches!(self, Matcher::Spec(compiled) if compiled.spec.payload.is_some())
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Spec(compiled) => f.debug_tuple("Spec").field(&compiled.spec).finish(),
            Matcher::Fn(_) => f.write_str("Fn(..)"),
        }
    }
}

impl From<MatchSpec> for Matcher {
    fn from(spec: MatchSpec) -> Self {
        Matcher::Spec(CompiledSpec::new(spec))
    }
}

impl From<&str> for Matcher {
    fn from(pattern: &str) -> Self {
        MatchSpec::url(pattern).into()
    }
}

/// A registered route: matcher, response specification, and bookkeeping.
#[derive(Debug, Clone)]
pub struct Route {
    /// Identifier recorded in the call log on a match
    pub identifier: String,
    /// Predicate deciding whether this route applies
    pub matcher: Matcher,
    /// What to respond with
    pub response: ResponseSpec,
    /// Whether matching needs the request body materialized first
    pub uses_body: bool,
}

impl Route {
    pub fn new(
        identifier: impl Into<String>,
        matcher: impl Into<Matcher>,
        response: impl Into<ResponseSpec>,
    ) -> Self {
        let matcher = matcher.into();
        let uses_body = matcher.inspects_body();
        Self {
            identifier: identifier.into(),
            matcher,
            response: response.into(),
            uses_body,
        }
    }

    /// Override the body-usage flag, needed for closure matchers that read
    /// the request body.
    pub fn with_body_matching(mut self, uses_body: bool) -> Self {
        self.uses_body = uses_body;
        self
    }
}
