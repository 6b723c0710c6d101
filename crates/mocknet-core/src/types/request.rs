//! Request-side types: methods, call options, and the structured request.

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// HTTP method for request matching
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        };
        f.write_str(s)
    }
}

/// Options accompanying a `(url, options)` call shape.
///
/// After normalization these also mirror the fields of a structured
/// [`MockRequest`] when one was provided instead.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method (`GET` when unset)
    pub method: Option<HttpMethod>,
    /// Request headers
    pub headers: Option<HashMap<String, String>>,
    /// Request body as JSON
    pub body: Option<Value>,
    /// Abort signal for this call
    pub signal: Option<CancellationToken>,
}

impl RequestOptions {
    /// Effective method for matching and error messages.
    pub fn effective_method(&self) -> HttpMethod {
        self.method.unwrap_or(HttpMethod::Get)
    }
}

/// A request body that may not be available yet.
///
/// Streamed or lazily produced bodies are modelled as a shared future;
/// [`RequestBody::materialize`] replaces the deferred form with the settled
/// JSON value so body matchers never race an unavailable body.
#[derive(Clone)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Deferred(Shared<BoxFuture<'static, Value>>),
}

impl RequestBody {
    /// Wrap a future producing the body once it becomes available.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: std::future::Future<Output = Value> + Send + 'static,
    {
        RequestBody::Deferred(fut.boxed().shared())
    }

    /// Await a deferred body in place. No-op for the other forms.
    pub async fn materialize(&mut self) {
        if let RequestBody::Deferred(fut) = self {
            let value = fut.clone().await;
            *self = RequestBody::Json(value);
        }
    }

    /// The body as JSON, when already available.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, RequestBody::Deferred(_))
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestBody::Empty => f.write_str("Empty"),
            RequestBody::Json(value) => f.debug_tuple("Json").field(value).finish(),
            RequestBody::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Structured request object, the alternative call shape to `(url, options)`.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: RequestBody,
    pub signal: Option<CancellationToken>,
}

impl MockRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            headers: HashMap::new(),
            body: RequestBody::Empty,
            signal: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = body.into();
        self
    }

    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(HttpMethod::Get, "GET")]
    #[case(HttpMethod::Post, "POST")]
    #[case(HttpMethod::Delete, "DELETE")]
    #[case(HttpMethod::Options, "OPTIONS")]
    fn test_method_display(#[case] method: HttpMethod, #[case] expected: &str) {
        assert_eq!(method.to_string(), expected);
    }

    #[rstest]
    fn test_effective_method_defaults_to_get() {
        assert_eq!(RequestOptions::default().effective_method(), HttpMethod::Get);
        let options = RequestOptions {
            method: Some(HttpMethod::Put),
            ..Default::default()
        };
        assert_eq!(options.effective_method(), HttpMethod::Put);
    }

    #[tokio::test]
    async fn test_deferred_body_materializes_once() {
        let mut body = RequestBody::deferred(async { json!({"name": "John"}) });
        assert!(body.is_deferred());
        assert!(body.as_json().is_none());

        body.materialize().await;
        assert_eq!(body.as_json(), Some(&json!({"name": "John"})));

        // Second call is a no-op
        body.materialize().await;
        assert_eq!(body.as_json(), Some(&json!({"name": "John"})));
    }

    #[tokio::test]
    async fn test_materialize_keeps_ready_body() {
        let mut body = RequestBody::Json(json!([1, 2, 3]));
        body.materialize().await;
        assert_eq!(body.as_json(), Some(&json!([1, 2, 3])));

        let mut empty = RequestBody::Empty;
        empty.materialize().await;
        assert!(empty.as_json().is_none());
    }

    #[rstest]
    fn test_request_builder() {
        let request = MockRequest::new(HttpMethod::Post, "/api/users")
            .header("Content-Type", "application/json")
            .body(json!({"name": "John"}));
        assert_eq!(request.url, "/api/users");
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(
            request.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        assert_eq!(request.body.as_json(), Some(&json!({"name": "John"})));
        assert!(request.signal.is_none());
    }

    #[rstest]
    fn test_method_serde_roundtrip() {
        let json = serde_json::to_string(&HttpMethod::Patch).expect("Should serialize");
        assert_eq!(json, "\"PATCH\"");
        let back: HttpMethod = serde_json::from_str(&json).expect("Should deserialize");
        assert_eq!(back, HttpMethod::Patch);
    }
}
