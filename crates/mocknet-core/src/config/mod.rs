//! Declarative route files: parsing and conversion into routes.

pub mod error;
pub mod parser;
pub mod route;

pub use error::ConfigError;
pub use route::{load_routes, parse_routes, RouteDef};
