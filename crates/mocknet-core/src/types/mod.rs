//! Core domain types for requests, routes, and responses.

pub mod request;
pub mod response;
pub mod route;
