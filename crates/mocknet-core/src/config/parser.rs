//! Route-file parsing (YAML/JSON/JSONC).

use crate::config::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Route file type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFileType {
    Yaml,
    Json,
    Jsonc,
    Unknown,
}

/// Get route file type from path extension
pub fn get_file_type(path: &str) -> ConfigFileType {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "yaml" | "yml" => ConfigFileType::Yaml,
        "json" => ConfigFileType::Json,
        "jsonc" => ConfigFileType::Jsonc,
        _ => ConfigFileType::Unknown,
    }
}

/// Strip `//` and `/* */` comments from JSONC content.
///
/// String literals are left untouched, including ones containing comment
/// markers.
pub fn strip_json_comments(content: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Code,
        Str { escaped: bool },
        LineComment,
        BlockComment,
    }

    let mut out = String::with_capacity(content.len());
    let mut state = State::Code;
    let mut chars = content.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '"' => {
                    state = State::Str { escaped: false };
                    out.push(c);
                }
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                _ => out.push(c),
            },
            State::Str { escaped } => {
                out.push(c);
                state = if escaped {
                    State::Str { escaped: false }
                } else {
                    match c {
                        '\\' => State::Str { escaped: true },
                        '"' => State::Code,
                        _ => State::Str { escaped: false },
                    }
                };
            }
            State::LineComment => {
                if c == '\n' || c == '\r' {
                    out.push(c);
                    state = State::Code;
                }
            }
            State::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    state = State::Code;
                }
            }
        }
    }

    out
}

/// Parse JSON content
pub fn parse_json<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_json::from_str(content).map_err(ConfigError::from)
}

/// Parse JSONC content (JSON with comments)
pub fn parse_jsonc<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let stripped = strip_json_comments(content);
    serde_json::from_str(&stripped).map_err(ConfigError::from)
}

/// Parse YAML content
pub fn parse_yaml<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    serde_yaml::from_str(content).map_err(ConfigError::from)
}

/// Parse route-file content based on file type
pub fn parse_config<T: DeserializeOwned>(content: &str, path: &str) -> Result<T, ConfigError> {
    match get_file_type(path) {
        ConfigFileType::Yaml => parse_yaml(content),
        ConfigFileType::Json => parse_json(content),
        ConfigFileType::Jsonc => parse_jsonc(content),
        ConfigFileType::Unknown => Err(ConfigError::UnknownFileType(path.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{json, Value};

    #[rstest]
    #[case("routes.yaml", ConfigFileType::Yaml)]
    #[case("routes.yml", ConfigFileType::Yaml)]
    #[case("ROUTES.YML", ConfigFileType::Yaml)]
    #[case("routes.json", ConfigFileType::Json)]
    #[case("routes.jsonc", ConfigFileType::Jsonc)]
    #[case("routes.txt", ConfigFileType::Unknown)]
    #[case("routes", ConfigFileType::Unknown)]
    fn test_get_file_type(#[case] path: &str, #[case] expected: ConfigFileType) {
        assert_eq!(get_file_type(path), expected);
    }

    #[rstest]
    #[case("{\"a\": 1} // trailing", "{\"a\": 1} ")]
    #[case("// leading\n{\"a\": 1}", "\n{\"a\": 1}")]
    #[case("{\"a\": /* inline */ 1}", "{\"a\":  1}")]
    #[case("{\"url\": \"http://x\"}", "{\"url\": \"http://x\"}")]
    #[case("{\"s\": \"a /* not a comment */ b\"}", "{\"s\": \"a /* not a comment */ b\"}")]
    #[case("{\"s\": \"esc \\\" // quote\"}", "{\"s\": \"esc \\\" // quote\"}")]
    fn test_strip_json_comments(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_json_comments(input), expected);
    }

    #[rstest]
    fn test_parse_json() {
        let value: Value = parse_json("{\"a\": 1}").unwrap();
        assert_eq!(value, json!({"a": 1}));
        assert!(parse_json::<Value>("nope").is_err());
    }

    #[rstest]
    fn test_parse_jsonc() {
        let value: Value = parse_jsonc("{\n  // comment\n  \"a\": 1\n}").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[rstest]
    fn test_parse_yaml() {
        let value: Value = parse_yaml("a: 1").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[rstest]
    fn test_parse_config_dispatches_on_extension() {
        assert_eq!(
            parse_config::<Value>("a: 1", "routes.yaml").unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            parse_config::<Value>("{\"a\": 1}", "routes.json").unwrap(),
            json!({"a": 1})
        );
        assert!(matches!(
            parse_config::<Value>("a: 1", "routes.txt"),
            Err(ConfigError::UnknownFileType(_))
        ));
    }
}
