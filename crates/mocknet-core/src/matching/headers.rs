//! Case-insensitive header subset matching.

use std::collections::HashMap;

fn lowercase_keys(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.clone()))
        .collect()
}

/// Check that every expected header is present with the same value.
///
/// Header names compare case-insensitively; values compare exactly.
/// `None` expected means any headers match.
pub fn headers_match(
    expected: Option<&HashMap<String, String>>,
    actual: &HashMap<String, String>,
) -> bool {
    let expected = match expected {
        None => return true,
        Some(e) if e.is_empty() => return true,
        Some(e) => e,
    };

    let actual = lowercase_keys(actual);
    expected
        .iter()
        .all(|(k, v)| actual.get(&k.to_lowercase()) == Some(v))
}
