//! Request matching utilities.

mod headers;
mod payload;
mod query;
mod url;

pub use headers::headers_match;
pub use payload::payload_matches;
pub use query::{parse_query_string, query_matches, query_of_url};
pub use url::{UrlMatch, UrlPattern};
