//! Reduction of response specifications to terminal values.

use crate::error::FetchError;
use crate::types::request::{MockRequest, RequestOptions};
use crate::types::response::{MockResponse, ResponseConfig, ResponseSpec};
use futures::future::BoxFuture;
use std::sync::Arc;

/// The real, unmocked network fetch.
///
/// Only reachable through passthrough routes or network fallback. The
/// structured request is handed over when one exists so implementations can
/// preserve its body and streaming semantics exactly.
pub trait NetworkBackend: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        options: &RequestOptions,
        request: Option<&MockRequest>,
    ) -> BoxFuture<'static, Result<MockResponse, FetchError>>;
}

impl std::fmt::Debug for dyn NetworkBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NetworkBackend")
    }
}

/// A fully reduced specification.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// Declarative config still to be built into a response
    Config(ResponseConfig),
    /// Finished response, returned as-is
    Response(MockResponse),
}

/// Reduces a [`ResponseSpec`] until a terminal form is reached.
#[derive(Clone, Default)]
pub struct Resolver {
    backend: Option<Arc<dyn NetworkBackend>>,
}

impl Resolver {
    pub fn new(backend: Option<Arc<dyn NetworkBackend>>) -> Self {
        Self { backend }
    }

    /// Reduce `spec` to a terminal value.
    ///
    /// Callables are invoked with the current call context and their result
    /// re-inspected; deferred specs are awaited and re-inspected. The loop
    /// runs as long as the caller keeps chaining; a non-terminating chain is
    /// the caller's error. Passthrough stops immediately: the backend's
    /// response is never treated as another spec.
    pub async fn resolve(
        &self,
        spec: ResponseSpec,
        url: &str,
        options: &RequestOptions,
        request: Option<&MockRequest>,
    ) -> Result<Resolved, FetchError> {
        let mut spec = spec;
        loop {
            match spec {
                ResponseSpec::Passthrough => {
                    let backend = self.backend.as_ref().ok_or(FetchError::MissingBackend)?;
                    let response = backend.fetch(url, options, request).await?;
                    return Ok(Resolved::Response(response));
                }
                ResponseSpec::Fn(f) => {
                    spec = f(url, options, request);
                }
                ResponseSpec::Deferred(fut) => {
                    spec = (*fut.await).clone();
                }
                ResponseSpec::Config(config) => return Ok(Resolved::Config(config)),
                ResponseSpec::Response(response) => return Ok(Resolved::Response(response)),
            }
        }
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("backend", &self.backend.is_some())
            .finish()
    }
}
