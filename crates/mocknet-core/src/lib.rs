//! Core library for Mocknet: a programmable stand-in for a network-fetching
//! function.
//!
//! Callers register [`Route`]s pairing a [`Matcher`] with a
//! [`ResponseSpec`]; [`FetchMock::dispatch`] answers each request from the
//! first matching route (registration order wins), a configured fallback, or
//! a real [`NetworkBackend`]. Response specifications may be literal values,
//! closures, or deferred futures and are reduced recursively until a
//! terminal response is reached. Every attempt is recorded in an ordered
//! call log, in-flight dispatches can be awaited in bulk with
//! [`FetchMock::flush`], and individual dispatches honour an abort signal.
//!
//! ```
//! use mocknet_core::{FetchMock, Route};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mock = FetchMock::new();
//! mock.add_route(Route::new("data", "/data", 404));
//!
//! let response = mock.dispatch("/data").await.unwrap();
//! assert_eq!(response.status, 404);
//! assert_eq!(mock.calls().len(), 1);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod matching;
pub mod normalize;
mod pending;
pub mod recorder;
pub mod resolver;
pub mod router;
pub mod types;

pub use error::FetchError;
pub use handler::FetchMock;
pub use normalize::{normalize, FetchArgs, NormalizedRequest};
pub use recorder::{CallLog, CallRecord};
pub use resolver::{NetworkBackend, Resolved, Resolver};
pub use router::{FallbackMode, MockConfig, RouterOutcome};
pub use types::request::{HttpMethod, MockRequest, RequestBody, RequestOptions};
pub use types::response::{MockResponse, ResponseConfig, ResponseSpec};
pub use types::route::{CompiledSpec, MatchSpec, Matcher, Route};
