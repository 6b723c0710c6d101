//! Dispatch orchestration: normalization, abort wiring, routing, resolution,
//! and pending-operation tracking.

use crate::error::FetchError;
use crate::normalize::{normalize, FetchArgs, NormalizedRequest};
use crate::pending::PendingSet;
use crate::recorder::{CallLog, CallRecord};
use crate::resolver::{NetworkBackend, Resolved, Resolver};
use crate::router::{decide, FallbackMode, MockConfig};
use crate::types::response::{MockResponse, ResponseSpec};
use crate::types::route::{Matcher, Route};
use futures::future::{self, BoxFuture, Either};
use futures::FutureExt;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Programmable stand-in for a network-fetching function.
///
/// Routes are registered up front; [`FetchMock::dispatch`] then answers each
/// call from the first matching route, the configured fallback, or the real
/// network backend. Every attempt is recorded for later inspection and every
/// in-flight dispatch is tracked so [`FetchMock::flush`] can wait for all of
/// them.
///
/// Cloning is cheap and clones share all state.
#[derive(Debug, Clone, Default)]
pub struct FetchMock {
    inner: Arc<MockInner>,
}

#[derive(Debug, Default)]
struct MockInner {
    routes: RwLock<Vec<Route>>,
    config: RwLock<MockConfig>,
    backend: RwLock<Option<Arc<dyn NetworkBackend>>>,
    log: CallLog,
    pending: PendingSet,
    next_route_id: AtomicU64,
}

impl FetchMock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MockConfig) -> Self {
        let mock = Self::new();
        *mock.inner.config.write().expect("config poisoned") = config;
        mock
    }

    /// Register a route. Registration order is matching order.
    pub fn add_route(&self, route: Route) -> &Self {
        debug!("registering route {}", route.identifier);
        self.inner
            .routes
            .write()
            .expect("routes poisoned")
            .push(route);
        self
    }

    /// Register a route with a generated identifier.
    pub fn mock(&self, matcher: impl Into<Matcher>, response: impl Into<ResponseSpec>) -> &Self {
        let id = self.inner.next_route_id.fetch_add(1, Ordering::Relaxed);
        self.add_route(Route::new(format!("route-{id}"), matcher, response))
    }

    /// Install the real network fetch used for passthrough and fallback.
    pub fn set_network_backend(&self, backend: Arc<dyn NetworkBackend>) -> &Self {
        *self.inner.backend.write().expect("backend poisoned") = Some(backend);
        self
    }

    pub fn set_fallback_mode(&self, mode: FallbackMode) -> &Self {
        self.inner.config.write().expect("config poisoned").fallback = mode;
        self
    }

    /// Set the global response for unmatched requests.
    pub fn set_fallback_response(&self, response: impl Into<ResponseSpec>) -> &Self {
        self.inner
            .config
            .write()
            .expect("config poisoned")
            .fallback_response = Some(response.into());
        self
    }

    pub fn set_warn_on_unmatched(&self, warn: bool) -> &Self {
        self.inner
            .config
            .write()
            .expect("config poisoned")
            .warn_on_unmatched = warn;
        self
    }

    /// Dispatch one request through the mock.
    ///
    /// Accepts a URL, a `(url, options)` pair, or a structured
    /// [`MockRequest`](crate::types::request::MockRequest). The call is
    /// normalized and its pending-operation handle registered before this
    /// function returns; the returned future performs routing, resolution,
    /// and response construction.
    pub fn dispatch(
        &self,
        args: impl Into<FetchArgs>,
    ) -> BoxFuture<'static, Result<MockResponse, FetchError>> {
        let inner = Arc::clone(&self.inner);
        let normalized = normalize(args.into());
        let ticket = inner.pending.register();

        async move {
            let result = inner.run(normalized).await;
            // Settled on every path, success or failure
            ticket.settle();
            result
        }
        .boxed()
    }

    /// All recorded dispatch attempts, in attempt order.
    pub fn calls(&self) -> Vec<CallRecord> {
        self.inner.log.calls()
    }

    /// Recorded attempts that matched a route.
    pub fn matched_calls(&self) -> Vec<CallRecord> {
        self.inner.log.matched_calls()
    }

    /// Recorded attempts that matched no route.
    pub fn unmatched_calls(&self) -> Vec<CallRecord> {
        self.inner.log.unmatched_calls()
    }

    /// Number of dispatches currently in flight.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    /// Wait until every dispatch in flight at call time has settled.
    ///
    /// Dispatches started after the wait begins are not included.
    pub async fn flush(&self) {
        self.inner.pending.wait_all().await;
    }

    /// Clear the call log, keeping routes and configuration.
    pub fn reset_history(&self) -> &Self {
        self.inner.log.clear();
        self
    }

    /// Remove all routes, clear the call log, and restore the default
    /// configuration. Generated route identifiers start over from `route-0`.
    pub fn reset(&self) -> &Self {
        self.inner.routes.write().expect("routes poisoned").clear();
        *self.inner.config.write().expect("config poisoned") = MockConfig::default();
        self.inner.log.clear();
        self.inner.next_route_id.store(0, Ordering::Relaxed);
        self
    }
}

impl MockInner {
    async fn run(self: Arc<Self>, normalized: NormalizedRequest) -> Result<MockResponse, FetchError> {
        let Some(token) = normalized.signal.clone() else {
            return self.perform(normalized).await;
        };
        // An already-fired signal rejects before any routing or
        // resolution work happens.
        if token.is_cancelled() {
            return Err(FetchError::Aborted);
        }
        // An abort short-circuits only what the caller observes. The work
        // runs detached, so routing, resolution, and call recording still
        // complete in the background.
        let work = tokio::spawn(async move { self.perform(normalized).await });
        let cancelled = token.cancelled();
        futures::pin_mut!(cancelled);
        match future::select(cancelled, work).await {
            Either::Left((_, _)) => Err(FetchError::Aborted),
            Either::Right((joined, _)) => joined.unwrap_or_else(|err| {
                Err(FetchError::Network(format!("dispatch task failed: {err}")))
            }),
        }
    }

    async fn perform(&self, mut normalized: NormalizedRequest) -> Result<MockResponse, FetchError> {
        // Matchers that inspect the body must not race a body that is not
        // available yet; requests without body-dependent routes skip the
        // await entirely.
        if normalized.request.is_some() && self.any_route_uses_body() {
            if let Some(request) = normalized.request.as_mut() {
                request.body.materialize().await;
                if normalized.options.body.is_none() {
                    normalized.options.body = request.body.as_json().cloned();
                }
            }
        }

        let outcome = {
            let routes = self.routes.read().expect("routes poisoned");
            let config = self.config.read().expect("config poisoned");
            decide(
                &routes,
                &config,
                &normalized.url,
                &normalized.options,
                normalized.request.as_ref(),
                &self.log,
            )?
        };
        debug!(
            "dispatch {} {} -> route={:?} passthrough={}",
            normalized.options.effective_method(),
            normalized.url,
            outcome.route_id,
            outcome.is_passthrough,
        );

        let backend = self.backend.read().expect("backend poisoned").clone();
        let resolver = Resolver::new(backend);
        let resolved = resolver
            .resolve(
                outcome.response,
                &normalized.url,
                &normalized.options,
                normalized.request.as_ref(),
            )
            .await?;

        match resolved {
            // Passthrough and pre-made responses are final; response
            // construction does not run for them.
            Resolved::Response(response) => Ok(response),
            Resolved::Config(config) => {
                if let Some(message) = config.throws {
                    return Err(FetchError::ResponseThrows(message));
                }
                Ok(config.build(&normalized.url))
            }
        }
    }

    fn any_route_uses_body(&self) -> bool {
        self.routes
            .read()
            .expect("routes poisoned")
            .iter()
            .any(|route| route.uses_body)
    }
}
