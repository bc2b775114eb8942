//! Filters for embedding generated config in larger documents

use minijinja::{Error, ErrorKind, Value};

fn to_json_value(value: &Value) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// Convert a value to YAML format
///
/// Usage: {{ settings | toyaml }}
pub fn toyaml(value: Value) -> Result<String, Error> {
    let yaml = serde_yaml::to_string(&to_json_value(&value)?)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;

    Ok(yaml.trim_start_matches("---\n").trim_end().to_string())
}

/// Convert a value to JSON format
///
/// Usage: {{ settings | tojson }}
pub fn tojson(value: Value) -> Result<String, Error> {
    serde_json::to_string(&to_json_value(&value)?)
        .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))
}

/// Indent every line after a leading newline
///
/// Usage: {{ parseToConfigYaml(crd) | nindent(4) }}
#[must_use]
pub fn nindent(value: String, spaces: usize) -> String {
    let mut result = String::with_capacity(1 + value.len() + spaces * value.lines().count());
    result.push('\n');
    result.push_str(&indent(value, spaces));
    result
}

/// Indent every non-empty line
///
/// Usage: {{ include_text | indent(2) }}
#[must_use]
pub fn indent(value: String, spaces: usize) -> String {
    let prefix = " ".repeat(spaces);

    value
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
