//! Response-side types: the response specification and its terminal forms.

use crate::types::request::{MockRequest, RequestOptions};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of a computed response: invoked with the current call context,
/// its return value is resolved again.
pub type SpecFn =
    Arc<dyn Fn(&str, &RequestOptions, Option<&MockRequest>) -> ResponseSpec + Send + Sync>;

/// A shared, reusable deferred specification. Settles once; later awaits
/// observe the settled value.
pub type DeferredSpec = Shared<BoxFuture<'static, Arc<ResponseSpec>>>;

/// What a route (or the fallback slot) responds with.
///
/// Resolution reduces this repeatedly until a terminal form is reached:
/// `Fn` is invoked and its result re-inspected, `Deferred` is awaited and its
/// value re-inspected. `Config` and `Response` are terminal. `Passthrough`
/// stops resolution immediately and hands the call to the real network
/// backend; the backend's result is never re-interpreted as another spec.
///
/// A spec cannot be simultaneously callable and awaitable here. A callable
/// that wants to defer returns a `Deferred`, which keeps the
/// callable-takes-precedence reading of the original engine.
#[derive(Clone)]
pub enum ResponseSpec {
    /// Declarative response, handed to [`ResponseConfig::build`]
    Config(ResponseConfig),
    /// Fully formed response, returned as-is
    Response(MockResponse),
    /// Computed response
    Fn(SpecFn),
    /// Deferred response
    Deferred(DeferredSpec),
    /// Delegate to the real network
    Passthrough,
}

impl ResponseSpec {
    /// Wrap a closure computing the next specification from the call context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&str, &RequestOptions, Option<&MockRequest>) -> ResponseSpec + Send + Sync + 'static,
    {
        ResponseSpec::Fn(Arc::new(f))
    }

    /// Wrap a future producing the next specification.
    pub fn deferred<F>(fut: F) -> Self
    where
        F: std::future::Future<Output = ResponseSpec> + Send + 'static,
    {
        ResponseSpec::Deferred(fut.map(Arc::new).boxed().shared())
    }

    /// A plain status-code response.
    pub fn status(status: u16) -> Self {
        ResponseSpec::Config(ResponseConfig {
            status: Some(status),
            ..Default::default()
        })
    }

    /// A JSON body response with status 200.
    pub fn json(body: Value) -> Self {
        ResponseSpec::Config(ResponseConfig {
            body: Some(body),
            ..Default::default()
        })
    }
}

impl fmt::Debug for ResponseSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseSpec::Config(config) => f.debug_tuple("Config").field(config).finish(),
            ResponseSpec::Response(response) => {
                f.debug_tuple("Response").field(response).finish()
            }
            ResponseSpec::Fn(_) => f.write_str("Fn(..)"),
            ResponseSpec::Deferred(_) => f.write_str("Deferred(..)"),
            ResponseSpec::Passthrough => f.write_str("Passthrough"),
        }
    }
}

impl From<ResponseConfig> for ResponseSpec {
    fn from(config: ResponseConfig) -> Self {
        ResponseSpec::Config(config)
    }
}

impl From<MockResponse> for ResponseSpec {
    fn from(response: MockResponse) -> Self {
        ResponseSpec::Response(response)
    }
}

impl From<u16> for ResponseSpec {
    fn from(status: u16) -> Self {
        ResponseSpec::status(status)
    }
}

impl From<Value> for ResponseSpec {
    fn from(body: Value) -> Self {
        ResponseSpec::json(body)
    }
}

/// Declarative response configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseConfig {
    /// Response status (200 when unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Response headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Response body as JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Error message to raise instead of producing a response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throws: Option<String>,
}

impl ResponseConfig {
    /// Build the concrete response for `url`.
    ///
    /// A JSON body implies a `content-type: application/json` header unless
    /// the config sets its own.
    pub fn build(&self, url: &str) -> MockResponse {
        let mut headers = self.headers.clone().unwrap_or_default();
        if self.body.is_some()
            && !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type"))
        {
            headers.insert("content-type".to_string(), "application/json".to_string());
        }
        MockResponse {
            url: url.to_string(),
            status: self.status.unwrap_or(200),
            headers,
            body: self.body.clone(),
        }
    }
}

/// The response-like value a dispatch settles with.
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    /// URL the response was produced for
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body as JSON
    pub body: Option<Value>,
}

impl MockResponse {
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Whether the status code is in the 2xx range.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
