//! URL pattern matching with `{param}` placeholders.

use regex::Regex;
use std::collections::HashMap;

/// A compiled URL pattern.
///
/// Placeholders like `/api/users/{id}` capture one path segment each.
/// Matching ignores the query string and a single trailing slash.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    regex: Regex,
    params: Vec<String>,
}

/// Outcome of matching a URL against a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UrlMatch {
    pub matched: bool,
    pub params: HashMap<String, String>,
}

impl UrlPattern {
    pub fn compile(pattern: &str) -> Self {
        let mut params = Vec::new();
        let mut source = String::from("^");

        let normalized = normalize_path(pattern);
        let mut chars = normalized.chars();
        while let Some(c) = chars.next() {
            if c == '{' {
                let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
                params.push(name);
                source.push_str("([^/]+)");
            } else if regex_metachar(c) {
                source.push('\\');
                source.push(c);
            } else {
                source.push(c);
            }
        }
        source.push_str("/?$");

        // The source only contains escaped literals and fixed segment groups,
        // so compilation cannot fail.
        let regex = Regex::new(&source).expect("valid pattern regex");
        Self { regex, params }
    }

    /// Match `url` against this pattern, extracting path parameters.
    pub fn match_url(&self, url: &str) -> UrlMatch {
        let path = normalize_path(url);

        let Some(caps) = self.regex.captures(&path) else {
            return UrlMatch::default();
        };

        let params = self
            .params
            .iter()
            .zip(caps.iter().skip(1))
            .filter_map(|(name, m)| m.map(|m| (name.clone(), m.as_str().to_owned())))
            .collect();

        UrlMatch {
            matched: true,
            params,
        }
    }
}

fn normalize_path(url: &str) -> String {
    let path = url
        .split('?')
        .next()
        .unwrap_or("")
        .trim_end_matches('/');
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

fn regex_metachar(c: char) -> bool {
    matches!(
        c,
        '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '|' | '\\'
    )
}
