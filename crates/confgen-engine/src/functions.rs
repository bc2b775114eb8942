//! Template functions (global functions available in templates)
//!
//! Functions are collected in a [`FunctionTable`] that is handed to the
//! engine builder, so two engines in one process can expose different sets.

use std::collections::BTreeMap;

use confgen_core::{ConfgenError, RenderOptions, extract_openapi_json, generate_config_yaml};
use minijinja::{Environment, Error, ErrorKind, Value};
use tracing::debug;

/// Named functions registered as template globals
#[derive(Debug, Clone)]
pub struct FunctionTable {
    functions: BTreeMap<&'static str, Value>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self::new()
            .with("parseToConfigYaml", Value::from_function(parse_to_config_yaml))
            .with(
                "parseToConfigYamlOpts",
                Value::from_function(parse_to_config_yaml_opts),
            )
            .with("parseToOpenApiJson", Value::from_function(parse_to_openapi_json))
            .with("deleteCurrent", Value::from_function(delete_current))
    }
}

impl FunctionTable {
    /// An empty table
    pub fn new() -> Self {
        Self {
            functions: BTreeMap::new(),
        }
    }

    /// Add or replace a function
    pub fn insert(&mut self, name: &'static str, function: Value) {
        self.functions.insert(name, function);
    }

    /// Builder form of [`FunctionTable::insert`]
    pub fn with(mut self, name: &'static str, function: Value) -> Self {
        self.insert(name, function);
        self
    }

    /// Registered names in ascending order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.functions.keys().copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Register every function as a global of `env`
    pub(crate) fn register(&self, env: &mut Environment<'_>) {
        for (name, function) in &self.functions {
            env.add_global(*name, function.clone());
        }
    }
}

fn pipeline_error(err: ConfgenError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

/// Render the config document with descriptions and defaults
///
/// Usage: {{ parseToConfigYaml(crd) }}
pub fn parse_to_config_yaml(crd: String) -> Result<String, Error> {
    parse_to_config_yaml_opts(crd, false, false)
}

/// Render the config document with explicit options
///
/// Usage: {{ parseToConfigYamlOpts(crd, true, false) }}
pub fn parse_to_config_yaml_opts(
    crd: String,
    omit_comments: bool,
    omit_defaults: bool,
) -> Result<String, Error> {
    debug!(omit_comments, omit_defaults, "generating config document");
    generate_config_yaml(
        crd.as_bytes(),
        RenderOptions::new(omit_comments, omit_defaults),
    )
    .map_err(pipeline_error)
}

/// The `config` schema as pretty-printed JSON
///
/// Usage: {{ parseToOpenApiJson(crd) }}
pub fn parse_to_openapi_json(crd: String) -> Result<String, Error> {
    extract_openapi_json(crd.as_bytes()).map_err(pipeline_error)
}

/// Marks a block for removal; never true
///
/// Usage: {% if deleteCurrent() %}...{% endif %}
#[must_use]
pub fn delete_current() -> bool {
    false
}
