//! Confgen Engine - templates around the generated configuration
//!
//! This crate provides a MiniJinja-based template engine with:
//! - The generator pipeline exposed as template functions
//!   (`parseToConfigYaml`, `parseToConfigYamlOpts`, `parseToOpenApiJson`)
//! - Built-in blocks that user templates can `include`
//! - Embedding filters (indent, nindent, toyaml, tojson)
//! - Human-readable error messages with suggestions

pub mod blocks;
pub mod engine;
pub mod error;
pub mod filters;
pub mod functions;
pub mod suggestions;

pub use blocks::{BUILTIN_BLOCKS, DEFAULT_TEMPLATE};
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, TemplateError, TemplateErrorKind};
pub use functions::FunctionTable;
pub use suggestions::AVAILABLE_FILTERS;
