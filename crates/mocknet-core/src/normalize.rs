//! Normalization of heterogeneous call shapes into a canonical request.

use crate::types::request::{MockRequest, RequestOptions};
use tokio_util::sync::CancellationToken;

/// The two supported call shapes: `(url, options)` or a structured request.
#[derive(Debug, Clone)]
pub enum FetchArgs {
    UrlOptions(String, RequestOptions),
    Request(MockRequest),
}

impl From<&str> for FetchArgs {
    fn from(url: &str) -> Self {
        FetchArgs::UrlOptions(url.to_string(), RequestOptions::default())
    }
}

impl From<String> for FetchArgs {
    fn from(url: String) -> Self {
        FetchArgs::UrlOptions(url, RequestOptions::default())
    }
}

impl From<(&str, RequestOptions)> for FetchArgs {
    fn from((url, options): (&str, RequestOptions)) -> Self {
        FetchArgs::UrlOptions(url.to_string(), options)
    }
}

impl From<(String, RequestOptions)> for FetchArgs {
    fn from((url, options): (String, RequestOptions)) -> Self {
        FetchArgs::UrlOptions(url, options)
    }
}

impl From<MockRequest> for FetchArgs {
    fn from(request: MockRequest) -> Self {
        FetchArgs::Request(request)
    }
}

/// Canonical `(url, options, request, signal)` view of a call.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub url: String,
    pub options: RequestOptions,
    pub request: Option<MockRequest>,
    pub signal: Option<CancellationToken>,
}

/// Normalize either call shape.
///
/// For the structured shape the options view mirrors the request's method,
/// headers, and (ready) body so matchers can treat both shapes uniformly.
/// The signal on options wins over the one on the request.
pub fn normalize(args: FetchArgs) -> NormalizedRequest {
    match args {
        FetchArgs::UrlOptions(url, options) => {
            let signal = options.signal.clone();
            NormalizedRequest {
                url,
                options,
                request: None,
                signal,
            }
        }
        FetchArgs::Request(request) => {
            let options = RequestOptions {
                method: Some(request.method),
                headers: Some(request.headers.clone()),
                body: request.body.as_json().cloned(),
                signal: request.signal.clone(),
            };
            let signal = options.signal.clone();
            NormalizedRequest {
                url: request.url.clone(),
                options,
                request: Some(request),
                signal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::request::HttpMethod;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_normalize_url_only() {
        let normalized = normalize("/api/users".into());
        assert_eq!(normalized.url, "/api/users");
        assert!(normalized.request.is_none());
        assert!(normalized.signal.is_none());
        assert_eq!(normalized.options.effective_method(), HttpMethod::Get);
    }

    #[rstest]
    fn test_normalize_url_with_options() {
        let options = RequestOptions {
            method: Some(HttpMethod::Delete),
            signal: Some(CancellationToken::new()),
            ..Default::default()
        };
        let normalized = normalize(("/api/users/1", options).into());
        assert_eq!(normalized.options.effective_method(), HttpMethod::Delete);
        assert!(normalized.signal.is_some());
    }

    #[rstest]
    fn test_normalize_structured_request() {
        let request = MockRequest::new(HttpMethod::Post, "/api/users")
            .header("x-tag", "a")
            .body(json!({"name": "John"}))
            .signal(CancellationToken::new());
        let normalized = normalize(request.into());

        assert_eq!(normalized.url, "/api/users");
        assert_eq!(normalized.options.method, Some(HttpMethod::Post));
        assert_eq!(
            normalized.options.headers.as_ref().unwrap().get("x-tag"),
            Some(&"a".to_string())
        );
        assert_eq!(normalized.options.body, Some(json!({"name": "John"})));
        assert!(normalized.request.is_some());
        assert!(normalized.signal.is_some());
    }

    #[rstest]
    fn test_normalize_deferred_body_not_in_options() {
        let request = MockRequest::new(HttpMethod::Post, "/api/users")
            .body(crate::types::request::RequestBody::deferred(async {
                json!({"later": true})
            }));
        let normalized = normalize(request.into());
        // Deferred bodies stay on the structured request until materialized
        assert!(normalized.options.body.is_none());
        assert!(normalized.request.unwrap().body.is_deferred());
    }
}
