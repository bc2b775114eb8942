//! Comment-carrying YAML document tree

use crate::value::JsonScalar;

/// A node of the generated document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Key/value pairs in render order
    Mapping(Vec<Entry>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

/// A mapping key with its value and optional head comment
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: String,
    /// Comment rendered on the lines directly above the key, without `#`
    pub head_comment: Option<String>,
    pub value: Node,
}

/// How a scalar's text is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    /// Emitted verbatim (numbers, booleans, null, or nothing at all)
    Plain,
    /// A string; quoted whenever the plain form would read as something else
    Str,
}

/// A leaf value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub value: String,
    pub style: ScalarStyle,
}

impl Scalar {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::Plain,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            style: ScalarStyle::Str,
        }
    }

    /// A scalar with no value, rendered as an empty YAML node
    pub fn empty() -> Self {
        Self::plain("")
    }
}

impl From<&JsonScalar> for Scalar {
    fn from(scalar: &JsonScalar) -> Self {
        match scalar {
            JsonScalar::Str(s) => Self::string(s.clone()),
            other => Self::plain(other.to_text()),
        }
    }
}

impl Node {
    /// Whether the node is a container without children
    pub fn is_empty_container(&self) -> bool {
        match self {
            Self::Mapping(entries) => entries.is_empty(),
            Self::Sequence(items) => items.is_empty(),
            Self::Scalar(_) => false,
        }
    }

    /// Look up a mapping entry by key
    pub fn get(&self, key: &str) -> Option<&Entry> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|entry| entry.key == key),
            _ => None,
        }
    }

    /// Keys of a mapping node, in render order
    pub fn keys(&self) -> Vec<&str> {
        match self {
            Self::Mapping(entries) => entries.iter().map(|entry| entry.key.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
