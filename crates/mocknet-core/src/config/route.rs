//! Declarative route definitions and their conversion to registered routes.

use crate::config::error::ConfigError;
use crate::config::parser::parse_config;
use crate::types::request::HttpMethod;
use crate::types::response::ResponseConfig;
use crate::types::route::{MatchSpec, Route};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// One route as written in a route file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDef {
    /// Unique identifier for this route
    pub id: String,
    /// URL pattern (supports {param} placeholders)
    pub url: String,
    /// Required HTTP method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Required headers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,
    /// Required query parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<HashMap<String, String>>,
    /// Required body content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    /// Response configuration
    pub response: ResponseConfig,
}

impl RouteDef {
    /// Convert the definition into a registrable route.
    pub fn into_route(self) -> Route {
        let spec = MatchSpec {
            url: self.url,
            method: self.method,
            params: None,
            headers: self.headers,
            query: self.query,
            payload: self.payload,
        };
        Route::new(self.id, spec, self.response)
    }
}

/// Parse route definitions from in-memory content.
///
/// `path` only determines the format (YAML, JSON, or JSONC).
pub fn parse_routes(content: &str, path: &str) -> Result<Vec<Route>, ConfigError> {
    let defs: Vec<RouteDef> = parse_config(content, path)?;
    Ok(defs.into_iter().map(RouteDef::into_route).collect())
}

/// Load route definitions from a file.
pub async fn load_routes(path: impl AsRef<Path>) -> Result<Vec<Route>, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
    parse_routes(&content, &display)
}
