//! Confgen Core - reference configuration generation from CRD schemas
//!
//! This crate turns the `config` subtree of a CustomResourceDefinition's
//! OpenAPI v3 schema into a commented, deterministically ordered YAML
//! document:
//! - `crd`: CRD deserialization and `config` subtree extraction
//! - `value`: typed parsing of `default` / `example` JSON annotations
//! - `order`: stable key ordering for unordered schema maps
//! - `document`: the comment-carrying YAML document tree
//! - `walker`: schema to document conversion
//! - `render`: document to YAML text

pub mod crd;
pub mod document;
pub mod error;
pub mod order;
pub mod render;
pub mod value;
pub mod walker;

pub use crd::{extract_config_schema, extract_openapi_json, parse_crd};
pub use document::{Entry, Node, Scalar, ScalarStyle};
pub use error::{ConfgenError, Result};
pub use order::ordered_keys;
pub use render::render;
pub use value::{JsonScalar, JsonValue};
pub use walker::{RenderOptions, SchemaWalker, generate_config_yaml, to_document};
