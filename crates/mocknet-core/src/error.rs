//! Error types for dispatching mocked requests.

use thiserror::Error;

/// Errors surfaced by a dispatch through the mock engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No route matched and no fallback response or network fallback is configured.
    #[error("no fallback response defined for {method} to {url}")]
    NoFallback { method: String, url: String },

    /// Network fallback was requested but no network backend is installed.
    #[error("network fallback requested but no network backend is configured")]
    MissingBackend,

    /// The dispatch was cancelled through its abort signal.
    ///
    /// The message is fixed so callers can match on it the same way they
    /// would match on a DOM `AbortError`.
    #[error("The operation was aborted.")]
    Aborted,

    /// The resolved response configuration declared an error to raise.
    #[error("{0}")]
    ResponseThrows(String),

    /// The real network backend failed during passthrough.
    #[error("network error: {0}")]
    Network(String),
}

impl FetchError {
    /// Taxonomy name for this error.
    pub fn name(&self) -> &'static str {
        match self {
            FetchError::NoFallback { .. } | FetchError::MissingBackend => "ConfigurationError",
            FetchError::Aborted => "AbortError",
            FetchError::ResponseThrows(_) => "ResponseThrowsError",
            FetchError::Network(_) => "NetworkError",
        }
    }

    /// Whether this error was produced by a fired abort signal.
    pub fn is_abort(&self) -> bool {
        matches!(self, FetchError::Aborted)
    }

    /// Whether this error is a configuration problem rather than a runtime one.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FetchError::NoFallback { .. } | FetchError::MissingBackend
        )
    }
}
