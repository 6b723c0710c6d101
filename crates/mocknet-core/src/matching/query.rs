//! Query-string parsing and subset matching.

use std::collections::HashMap;

/// Parse a query string into a map with URL decoding.
///
/// Repeated keys are comma-joined so `page=1&page=2` becomes `page -> "1,2"`.
pub fn parse_query_string(query_str: &str) -> HashMap<String, String> {
    let mut result: HashMap<String, String> = HashMap::new();

    for pair in query_str.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        let key = urlencoding::decode(raw_key)
            .unwrap_or_else(|_| raw_key.into())
            .into_owned();
        let value = urlencoding::decode(raw_value)
            .unwrap_or_else(|_| raw_value.into())
            .into_owned();

        result
            .entry(key)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    result
}

/// Extract and parse the query string of a URL.
pub fn query_of_url(url: &str) -> HashMap<String, String> {
    url.split_once('?')
        .map(|(_, qs)| parse_query_string(qs))
        .unwrap_or_default()
}

/// Check that every expected query parameter is present with the same value.
///
/// `None` expected means any query matches.
pub fn query_matches(
    expected: Option<&HashMap<String, String>>,
    actual: &HashMap<String, String>,
) -> bool {
    match expected {
        None => true,
        Some(expected) => expected.iter().all(|(k, v)| actual.get(k) == Some(v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn h(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case("", &[])]
    #[case("page=1", &[("page", "1")])]
    #[case("page=1&limit=10", &[("page", "1"), ("limit", "10")])]
    #[case("key=value%20with%20spaces", &[("key", "value with spaces")])]
    #[case("key%20name=value", &[("key name", "value")])]
    #[case("page=1&page=2", &[("page", "1,2")])]
    #[case("page=1&&limit=10", &[("page", "1"), ("limit", "10")])]
    #[case("&page=1&limit=10&", &[("page", "1"), ("limit", "10")])]
    #[case("page=&limit=10", &[("page", ""), ("limit", "10")])]
    #[case("page&limit=10", &[("page", ""), ("limit", "10")])]
    fn test_parse_query_string(#[case] query_str: &str, #[case] expected: &[(&str, &str)]) {
        assert_eq!(parse_query_string(query_str), h(expected));
    }

    #[rstest]
    #[case("/api/users", &[])]
    #[case("/api/users?page=1", &[("page", "1")])]
    #[case("/api/users?page=1&sort=name", &[("page", "1"), ("sort", "name")])]
    fn test_query_of_url(#[case] url: &str, #[case] expected: &[(&str, &str)]) {
        assert_eq!(query_of_url(url), h(expected));
    }

    #[rstest]
    fn test_query_matches_subset() {
        let actual = h(&[("page", "1"), ("limit", "10")]);
        assert!(query_matches(Some(&h(&[("page", "1")])), &actual));
        assert!(query_matches(Some(&h(&[])), &actual));
        assert!(query_matches(None, &actual));
        assert!(!query_matches(Some(&h(&[("page", "2")])), &actual));
        assert!(!query_matches(Some(&h(&[("sort", "name")])), &actual));
    }
}
