//! Typed parsing of `default` and `example` schema annotations
//!
//! Annotations arrive as raw JSON. Only scalars and flat lists of scalars
//! are supported in values; objects are accepted in examples and rendered
//! verbatim as YAML. Anything else is a malformed CRD and fails loudly.

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSON;
use serde_json::{Map, Value};

use crate::document::Scalar;
use crate::error::{ConfgenError, Result};
use crate::render;

/// A JSON leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum JsonScalar {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
}

/// Any JSON value, with scalars separated from containers
#[derive(Debug, Clone, PartialEq)]
pub enum JsonValue {
    Scalar(JsonScalar),
    Array(Vec<Value>),
    Object(Map<String, Value>),
}

impl JsonScalar {
    /// Text form of the scalar as it appears in the generated document
    pub fn to_text(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::UInt(u) => u.to_string(),
            Self::Float(f) => float_text(*f),
            Self::Str(s) => s.clone(),
        }
    }

    /// Whether the scalar renders to an empty string
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

/// Shortest text that reads back as the same `f64`
///
/// Plain decimal notation is used for decimal exponents in `-4..21`, anything
/// outside switches to exponent form with a signed, two-digit minimum
/// exponent (`1.5e+300`, `1e-07`).
fn float_text(f: f64) -> String {
    if f.is_nan() {
        return ".nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { ".inf" } else { "-.inf" }.to_string();
    }

    let scientific = format!("{f:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return f.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();
    if (-4..21).contains(&exponent) {
        return f.to_string();
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs())
}

impl From<&Value> for JsonValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Scalar(JsonScalar::Null),
            Value::Bool(b) => Self::Scalar(JsonScalar::Bool(*b)),
            Value::Number(n) => Self::Scalar(if let Some(i) = n.as_i64() {
                JsonScalar::Int(i)
            } else if let Some(u) = n.as_u64() {
                JsonScalar::UInt(u)
            } else {
                JsonScalar::Float(n.as_f64().unwrap_or(f64::NAN))
            }),
            Value::String(s) => Self::Scalar(JsonScalar::Str(s.clone())),
            Value::Array(items) => Self::Array(items.clone()),
            Value::Object(map) => Self::Object(map.clone()),
        }
    }
}

/// Parse an annotation expected to hold a scalar
///
/// An object is rendered to its YAML text, an array yields no scalar.
pub fn parse_scalar(raw: Option<&JSON>) -> Result<Option<JsonScalar>> {
    let Some(JSON(value)) = raw else {
        return Ok(None);
    };

    match JsonValue::from(value) {
        JsonValue::Scalar(scalar) => Ok(Some(scalar)),
        JsonValue::Array(_) => Ok(None),
        JsonValue::Object(map) => Ok(Some(JsonScalar::Str(object_to_yaml(value, &map)?))),
    }
}

/// Parse an annotation expected to hold a flat array of scalars
pub fn parse_array(raw: Option<&JSON>) -> Result<Vec<JsonScalar>> {
    let Some(JSON(value)) = raw else {
        return Ok(Vec::new());
    };

    let JsonValue::Array(items) = JsonValue::from(value) else {
        return Err(ConfgenError::invalid_value(value, "array", "not a JSON array"));
    };

    items
        .iter()
        .map(|item| match JsonValue::from(item) {
            JsonValue::Scalar(scalar) => Ok(scalar),
            // Nested structures are not supported in defaults and examples
            _ => Err(ConfgenError::invalid_value(
                value,
                "array",
                format!("element {item} is not a scalar"),
            )),
        })
        .collect()
}

/// Parse an annotation expected to hold an object, returning its YAML text
pub fn parse_map(raw: Option<&JSON>) -> Result<Option<String>> {
    let Some(JSON(value)) = raw else {
        return Ok(None);
    };

    let JsonValue::Object(map) = JsonValue::from(value) else {
        return Err(ConfgenError::invalid_value(value, "object", "not a JSON object"));
    };

    if map.is_empty() {
        return Ok(None);
    }
    object_to_yaml(value, &map).map(Some)
}

fn object_to_yaml(raw: &Value, map: &Map<String, Value>) -> Result<String> {
    serde_yaml::to_string(map)
        .map_err(|e| ConfgenError::invalid_value(raw, "object", e.to_string()))
}

/// Example text for a scalar-typed field
///
/// An object example is shown as its YAML block rather than as a quoted
/// string.
pub fn scalar_example(raw: Option<&JSON>) -> Result<Option<String>> {
    if let Some(JSON(Value::Object(_))) = raw {
        return parse_map(raw);
    }

    Ok(parse_scalar(raw)?
        .filter(|scalar| !scalar.is_empty())
        .map(|scalar| render::scalar_text(&Scalar::from(&scalar))))
}

/// Example text for an array-typed field, one `- item` line per element
pub fn array_example(raw: Option<&JSON>) -> Result<Option<String>> {
    let items = parse_array(raw)?;
    if items.is_empty() {
        return Ok(None);
    }

    let lines: Vec<String> = items
        .iter()
        .map(|item| {
            let text = render::scalar_text(&Scalar::from(item));
            if text.is_empty() {
                "-".to_string()
            } else {
                format!("- {text}")
            }
        })
        .collect();
    Ok(Some(lines.join("\n")))
}

/// Example text for an object-typed field
pub fn map_example(raw: Option<&JSON>) -> Result<Option<String>> {
    parse_map(raw)
}

/// Format example text as the `example:` block appended to a head comment
pub fn example_block(text: &str) -> String {
    let mut block = String::from("example:");
    for line in text.trim_end().lines() {
        block.push('\n');
        if !line.is_empty() {
            block.push_str("  ");
            block.push_str(line);
        }
    }
    block
}
