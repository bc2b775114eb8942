//! Schema to document conversion

use std::collections::BTreeMap;

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    JSONSchemaProps, JSONSchemaPropsOrArray,
};
use tracing::trace;

use crate::crd::extract_config_schema;
use crate::document::{Entry, Node, Scalar};
use crate::error::{ConfgenError, Result};
use crate::order::ordered_keys;
use crate::render::render;
use crate::value;

const TYPE_STRING: &str = "string";
const TYPE_NUMBER: &str = "number";
const TYPE_INTEGER: &str = "integer";
const TYPE_OBJECT: &str = "object";
const TYPE_ARRAY: &str = "array";

/// What the generated document includes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Drop descriptions and examples
    pub omit_comments: bool,
    /// Use zero values instead of schema defaults
    pub omit_defaults: bool,
}

impl RenderOptions {
    pub fn new(omit_comments: bool, omit_defaults: bool) -> Self {
        Self {
            omit_comments,
            omit_defaults,
        }
    }
}

/// Walks an OpenAPI schema and builds the document tree
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaWalker {
    options: RenderOptions,
}

impl SchemaWalker {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Convert a schema into a document
    ///
    /// The root is always a mapping of the schema's properties.
    pub fn to_document(&self, schema: &JSONSchemaProps) -> Result<Node> {
        self.object_node(schema.properties.as_ref())
    }

    fn object_node(&self, properties: Option<&BTreeMap<String, JSONSchemaProps>>) -> Result<Node> {
        let Some(properties) = properties else {
            return Ok(Node::Mapping(Vec::new()));
        };

        let mut entries = Vec::with_capacity(properties.len());

        for name in ordered_keys(properties) {
            let field = properties.get(&name).ok_or_else(|| {
                ConfgenError::Internal(format!(
                    "property `{name}` was ordered but is missing from the schema map"
                ))
            })?;

            trace!(property = %name, kind = field.type_.as_deref().unwrap_or(""), "walking");

            let (value, example) = match field.type_.as_deref() {
                Some(TYPE_ARRAY) => {
                    let mut node = self.array_node(field.items.as_ref())?;
                    let defaults = value::parse_array(field.default.as_ref())?;
                    if !defaults.is_empty() && !self.options.omit_defaults {
                        node = Node::Sequence(
                            defaults
                                .iter()
                                .map(|item| Node::Scalar(Scalar::from(item)))
                                .collect(),
                        );
                    }
                    (node, value::array_example(field.example.as_ref())?)
                }
                Some(TYPE_OBJECT) => (
                    self.object_node(field.properties.as_ref())?,
                    value::map_example(field.example.as_ref())?,
                ),
                _ => (
                    self.value_node(field)?,
                    value::scalar_example(field.example.as_ref())?,
                ),
            };

            let head_comment = if self.options.omit_comments {
                None
            } else {
                head_comment(field.description.as_deref(), example.as_deref())
            };

            entries.push(Entry {
                key: name,
                head_comment,
                value,
            });
        }

        Ok(Node::Mapping(entries))
    }

    fn array_node(&self, items: Option<&JSONSchemaPropsOrArray>) -> Result<Node> {
        let children = match items {
            None => Vec::new(),
            Some(JSONSchemaPropsOrArray::Schema(item)) => match item.type_.as_deref() {
                Some(TYPE_OBJECT) => vec![self.object_node(item.properties.as_ref())?],
                Some(TYPE_ARRAY) => vec![self.array_node(item.items.as_ref())?],
                // A leaf placeholder would render as [""], leave the list empty
                _ => Vec::new(),
            },
            Some(JSONSchemaPropsOrArray::Schemas(items)) => items
                .iter()
                .map(|item| match item.type_.as_deref() {
                    Some(TYPE_OBJECT) => self.object_node(item.properties.as_ref()),
                    Some(TYPE_ARRAY) => self.array_node(item.items.as_ref()),
                    _ => self.value_node(item),
                })
                .collect::<Result<_>>()?,
        };

        Ok(Node::Sequence(children))
    }

    fn value_node(&self, field: &JSONSchemaProps) -> Result<Node> {
        // Parsed even when unused so a malformed default always fails
        let default = value::parse_scalar(field.default.as_ref())?;

        if !self.options.omit_defaults
            && let Some(scalar) = default.filter(|scalar| !scalar.is_empty())
        {
            return Ok(Node::Scalar(Scalar::from(&scalar)));
        }

        Ok(Node::Scalar(zero_value(field.type_.as_deref())))
    }
}

/// Placeholder for a leaf without a default
fn zero_value(type_: Option<&str>) -> Scalar {
    match type_ {
        Some(TYPE_STRING) => Scalar::string(""),
        Some(TYPE_INTEGER) => Scalar::plain("0"),
        Some(TYPE_NUMBER) => Scalar::plain("0.0"),
        _ => Scalar::empty(),
    }
}

/// Description followed by the `example:` block, if either is present
fn head_comment(description: Option<&str>, example: Option<&str>) -> Option<String> {
    let description = description.unwrap_or_default().replace("\n\n\n", "\n#\n");

    match example {
        Some(example) if description.is_empty() => Some(value::example_block(example)),
        Some(example) => Some(format!("{description}\n{}", value::example_block(example))),
        None if description.is_empty() => None,
        None => Some(description),
    }
}

/// Convert a schema into a document with the given options
pub fn to_document(schema: &JSONSchemaProps, options: RenderOptions) -> Result<Node> {
    SchemaWalker::new(options).to_document(schema)
}

/// Full pipeline: extract the `config` schema from CRD bytes, walk it and
/// render the YAML text
pub fn generate_config_yaml(data: &[u8], options: RenderOptions) -> Result<String> {
    let schema = extract_config_schema(data)?;
    let document = to_document(&schema, options)?;
    Ok(render(&document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::JSON;
    use serde_json::{Value, json};

    fn schema(value: serde_json::Value) -> JSONSchemaProps {
        serde_json::from_value(value).unwrap()
    }

    fn render_with(value: serde_json::Value, options: RenderOptions) -> String {
        render(&to_document(&schema(value), options).unwrap())
    }

    fn render_default(value: serde_json::Value) -> String {
        render_with(value, RenderOptions::default())
    }

    #[test]
    fn test_scalar_defaults_and_zero_values() {
        let yaml = render_default(json!({
            "type": "object",
            "properties": {
                "port": {"type": "integer", "default": 8080},
                "name": {"type": "string"}
            }
        }));

        assert_eq!(yaml, "name: \"\"\nport: 8080\n");
    }

    #[test]
    fn test_keys_are_sorted() {
        let yaml = render_default(json!({
            "type": "object",
            "properties": {
                "zebra": {"type": "string"},
                "apple": {"type": "string"},
                "mango": {"type": "string"}
            }
        }));

        let keys: Vec<&str> = yaml.lines().map(|l| l.split(':').next().unwrap()).collect();
        assert_eq!(keys, vec!["apple", "mango", "zebra"]);
    }

    #[test]
    fn test_document_tree_shape() {
        let root = schema(json!({
            "properties": {
                "etcd": {
                    "type": "object",
                    "description": "Etcd tuning.",
                    "properties": {
                        "memoryLimitMB": {"type": "integer", "default": 0},
                        "quota": {"type": "object"}
                    }
                },
                "names": {"type": "array", "items": {"type": "string"}}
            }
        }));
        let doc = to_document(&root, RenderOptions::default()).unwrap();

        assert_eq!(doc.keys(), vec!["etcd", "names"]);
        assert!(doc.get("names").unwrap().value.is_empty_container());

        let etcd = doc.get("etcd").unwrap();
        assert_eq!(etcd.head_comment.as_deref(), Some("Etcd tuning."));
        assert_eq!(etcd.value.keys(), vec!["memoryLimitMB", "quota"]);
        assert!(etcd.value.get("quota").unwrap().value.is_empty_container());
        assert_eq!(
            etcd.value.get("memoryLimitMB").unwrap().value,
            Node::Scalar(Scalar::plain("0"))
        );
        assert!(doc.get("missing").is_none());
    }

    #[test]
    fn test_zero_value_by_type() {
        let yaml = render_default(json!({
            "properties": {
                "count": {"type": "integer"},
                "enabled": {"type": "boolean"},
                "ratio": {"type": "number"},
                "text": {"type": "string"}
            }
        }));

        assert_eq!(yaml, "count: 0\nenabled:\nratio: 0.0\ntext: \"\"\n");
    }

    #[test]
    fn test_omit_defaults_uses_zero_values() {
        let value = json!({
            "properties": {
                "level": {"type": "string", "default": "Normal"},
                "port": {"type": "integer", "default": 6443},
                "ratio": {"type": "number", "default": 0.75}
            }
        });

        let yaml = render_with(value, RenderOptions::new(false, true));
        assert_eq!(yaml, "level: \"\"\nport: 0\nratio: 0.0\n");
        assert!(!yaml.contains("Normal"));
        assert!(!yaml.contains("6443"));
    }

    #[test]
    fn test_description_becomes_head_comment() {
        let yaml = render_default(json!({
            "properties": {
                "level": {
                    "type": "string",
                    "description": "line1\n\n\nline2",
                    "default": "Normal"
                }
            }
        }));

        assert_eq!(yaml, "# line1\n#\n# line2\nlevel: Normal\n");
    }

    #[test]
    fn test_omit_comments_has_no_comment_lines() {
        let yaml = render_with(
            json!({
                "properties": {
                    "dns": {
                        "type": "object",
                        "description": "DNS settings",
                        "example": {"baseDomain": "example.com"},
                        "properties": {
                            "baseDomain": {"type": "string", "description": "base domain", "example": "cluster.local"}
                        }
                    }
                }
            }),
            RenderOptions::new(true, false),
        );

        assert!(!yaml.lines().any(|line| line.trim_start().starts_with('#')));
        assert_eq!(yaml, "dns:\n    baseDomain: \"\"\n");
    }

    #[test]
    fn test_scalar_example_in_comment_not_value() {
        let yaml = render_default(json!({
            "properties": {
                "baseDomain": {
                    "type": "string",
                    "description": "Base domain of the cluster.",
                    "example": "microshift.example.com"
                }
            }
        }));

        assert_eq!(
            yaml,
            "# Base domain of the cluster.\n# example:\n#   microshift.example.com\nbaseDomain: \"\"\n"
        );
    }

    #[test]
    fn test_example_without_description() {
        let yaml = render_default(json!({
            "properties": {
                "port": {"type": "integer", "example": 8443}
            }
        }));

        assert_eq!(yaml, "# example:\n#   8443\nport: 0\n");
    }

    #[test]
    fn test_array_example_block() {
        let yaml = render_default(json!({
            "properties": {
                "subjectAltNames": {
                    "type": "array",
                    "description": "Extra SANs.",
                    "items": {"type": "string"},
                    "example": ["api.example.com", "10.0.0.1"]
                }
            }
        }));

        assert_eq!(
            yaml,
            "# Extra SANs.\n# example:\n#   - api.example.com\n#   - 10.0.0.1\nsubjectAltNames: []\n"
        );
    }

    #[test]
    fn test_object_example_is_raw_yaml() {
        let yaml = render_default(json!({
            "properties": {
                "audit": {
                    "type": "object",
                    "example": {"profile": "Default"},
                    "properties": {
                        "profile": {"type": "string", "default": "Default"}
                    }
                }
            }
        }));

        assert_eq!(
            yaml,
            "# example:\n#   profile: Default\naudit:\n    profile: Default\n"
        );
    }

    #[test]
    fn test_array_of_leaf_items_is_empty() {
        let yaml = render_default(json!({
            "properties": {
                "flags": {"type": "array", "items": {"type": "boolean"}},
                "names": {"type": "array", "items": {"type": "string"}},
                "untyped": {"type": "array"}
            }
        }));

        assert_eq!(yaml, "flags: []\nnames: []\nuntyped: []\n");
    }

    #[test]
    fn test_array_of_objects_has_one_representative() {
        let yaml = render_default(json!({
            "properties": {
                "routes": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "port": {"type": "integer"},
                            "host": {"type": "string", "description": "target host"}
                        }
                    }
                }
            }
        }));

        assert_eq!(
            yaml,
            "routes:\n    - # target host\n      host: \"\"\n      port: 0\n"
        );
    }

    #[test]
    fn test_array_of_arrays_recurses() {
        let yaml = render_default(json!({
            "properties": {
                "groups": {
                    "type": "array",
                    "items": {
                        "type": "array",
                        "items": {"type": "object", "properties": {"id": {"type": "integer"}}}
                    }
                }
            }
        }));

        assert_eq!(yaml, "groups:\n    - - id: 0\n");
    }

    #[test]
    fn test_tuple_items_use_their_own_values() {
        let yaml = render_default(json!({
            "properties": {
                "pair": {
                    "type": "array",
                    "items": [
                        {"type": "string", "default": "left"},
                        {"type": "integer"},
                        {"type": "object", "properties": {"x": {"type": "number"}}}
                    ]
                }
            }
        }));

        assert_eq!(yaml, "pair:\n    - left\n    - 0\n    - x: 0.0\n");
    }

    #[test]
    fn test_array_default_replaces_content() {
        let value = json!({
            "properties": {
                "servers": {
                    "type": "array",
                    "items": {"type": "string"},
                    "default": ["10.43.0.10", "8080"]
                }
            }
        });

        assert_eq!(
            render_default(value.clone()),
            "servers:\n    - 10.43.0.10\n    - \"8080\"\n"
        );
        assert_eq!(
            render_with(value, RenderOptions::new(false, true)),
            "servers: []\n"
        );
    }

    #[test]
    fn test_string_default_that_looks_numeric_stays_string() {
        let yaml = render_default(json!({
            "properties": {"version": {"type": "string", "default": "1.0"}}
        }));

        assert_eq!(yaml, "version: \"1.0\"\n");
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["version"].as_str(), Some("1.0"));
    }

    #[test]
    fn test_malformed_default_fails_even_when_omitted() {
        let value = json!({
            "properties": {
                "list": {"type": "array", "items": {"type": "string"}, "default": {"not": "a list"}}
            }
        });

        let err = to_document(&schema(value), RenderOptions::new(true, true)).unwrap_err();
        assert!(matches!(err, ConfgenError::InvalidValue { .. }));
    }

    #[test]
    fn test_malformed_object_example_fails() {
        let mut props = schema(json!({"type": "object"}));
        props.example = Some(JSON(json!("not an object")));

        let root = JSONSchemaProps {
            properties: Some(BTreeMap::from([("settings".to_string(), props)])),
            ..Default::default()
        };

        assert!(to_document(&root, RenderOptions::default()).is_err());
    }

    #[test]
    fn test_empty_schema_renders_empty_mapping() {
        assert_eq!(render_default(json!({})), "{}\n");
    }

    #[test]
    fn test_nested_objects_with_comments() {
        let yaml = render_default(json!({
            "properties": {
                "network": {
                    "type": "object",
                    "description": "Network settings.",
                    "properties": {
                        "serviceNetwork": {
                            "type": "array",
                            "description": "Service CIDRs.",
                            "items": {"type": "string"},
                            "default": ["10.43.0.0/16"]
                        },
                        "clusterNetwork": {
                            "type": "array",
                            "items": {"type": "string"},
                            "default": ["10.42.0.0/16"]
                        }
                    }
                }
            }
        }));

        assert_eq!(
            yaml,
            "# Network settings.\nnetwork:\n    clusterNetwork:\n        - 10.42.0.0/16\n    # Service CIDRs.\n    serviceNetwork:\n        - 10.43.0.0/16\n"
        );
    }

    const FIXTURE: &str = include_str!("../../../fixtures/config-crd.yaml");

    /// Every mapping key the schema declares below `props`, `[]` marking
    /// list items
    fn declared_key_paths(props: &JSONSchemaProps, path: &str, out: &mut BTreeSet<String>) {
        for (name, child) in props.properties.iter().flatten() {
            let child_path = format!("{path}.{name}");
            out.insert(child_path.clone());
            nested_key_paths(child, &child_path, out);
        }
    }

    fn nested_key_paths(props: &JSONSchemaProps, path: &str, out: &mut BTreeSet<String>) {
        match props.type_.as_deref() {
            Some(TYPE_OBJECT) => declared_key_paths(props, path, out),
            // A non-empty default list replaces the item structure
            Some(TYPE_ARRAY) if value::parse_array(props.default.as_ref()).unwrap().is_empty() => {
                let item_path = format!("{path}[]");
                match &props.items {
                    Some(JSONSchemaPropsOrArray::Schema(item)) => {
                        nested_key_paths(item, &item_path, out)
                    }
                    Some(JSONSchemaPropsOrArray::Schemas(items)) => {
                        for item in items {
                            nested_key_paths(item, &item_path, out);
                        }
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    /// Every mapping key present in a parsed document
    fn parsed_key_paths(node: &serde_yaml::Value, path: &str, out: &mut BTreeSet<String>) {
        match node {
            serde_yaml::Value::Mapping(map) => {
                for (key, value) in map {
                    let key_path = format!("{path}.{}", key.as_str().unwrap());
                    out.insert(key_path.clone());
                    parsed_key_paths(value, &key_path, out);
                }
            }
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    parsed_key_paths(item, &format!("{path}[]"), out);
                }
            }
            _ => {}
        }
    }

    /// Non-empty defaults declared on fields outside of lists
    fn declared_defaults(props: &JSONSchemaProps, path: &str, out: &mut Vec<(String, Value)>) {
        for (name, child) in props.properties.iter().flatten() {
            let child_path = format!("{path}.{name}");
            match (child.type_.as_deref(), &child.default) {
                (Some(TYPE_OBJECT), _) => declared_defaults(child, &child_path, out),
                (_, Some(JSON(default))) if !default.is_object() && default != &json!("") => {
                    out.push((child_path, default.clone()));
                }
                _ => {}
            }
        }
    }

    #[test]
    fn test_pipeline_is_deterministic() {
        let first = generate_config_yaml(FIXTURE.as_bytes(), RenderOptions::default()).unwrap();
        let second = generate_config_yaml(FIXTURE.as_bytes(), RenderOptions::default()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_pipeline_renders_fixture() {
        let yaml = generate_config_yaml(FIXTURE.as_bytes(), RenderOptions::default()).unwrap();

        assert!(yaml.starts_with("apiServer:\n"));
        assert!(yaml.contains("    baseDomain: example.com\n"));
        assert!(yaml.contains(
            "    # The port range allowed for Services of type NodePort.\n    #\n    # If not specified, the default of 30000-32767 will be used.\n    serviceNodePortRange: 30000-32767\n"
        ));
        assert!(yaml.contains("    kustomizePaths:\n        - /usr/lib/microshift/manifests\n        - /etc/microshift/manifests\n"));
        assert!(yaml.contains("    # example:\n    #   profile: WriteRequestBodies\n    auditLog:\n"));
        assert!(yaml.contains("    listenAddress: []\n"));
    }

    #[test]
    fn test_pipeline_round_trips_through_yaml_parser() {
        let schema = extract_config_schema(FIXTURE.as_bytes()).unwrap();
        let yaml = generate_config_yaml(FIXTURE.as_bytes(), RenderOptions::default()).unwrap();
        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

        let mut declared = BTreeSet::new();
        declared_key_paths(&schema, "", &mut declared);
        let mut rendered = BTreeSet::new();
        parsed_key_paths(&parsed, "", &mut rendered);

        assert!(declared.contains(".ingress.routeAdmissionPolicy.namespaceOwnership"));
        assert_eq!(rendered, declared);

        let mut defaults = Vec::new();
        declared_defaults(&schema, "", &mut defaults);
        assert!(!defaults.is_empty());
        for (path, default) in defaults {
            let node = path.split('.').skip(1).fold(&parsed, |node, key| &node[key]);
            assert_eq!(serde_json::to_value(node).unwrap(), default, "default of {path}");
        }
    }

    #[test]
    fn test_large_numbers_render_exactly() {
        let yaml = render_default(json!({
            "properties": {
                "limit": {"type": "integer", "default": 18446744073709551615u64},
                "scale": {"type": "number", "default": 1.5e300},
                "epsilon": {"type": "number", "default": 1e-7}
            }
        }));

        assert_eq!(
            yaml,
            "epsilon: 1e-07\nlimit: 18446744073709551615\nscale: 1.5e+300\n"
        );

        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["limit"].as_u64(), Some(u64::MAX));
        assert_eq!(parsed["scale"].as_f64(), Some(1.5e300));
        assert_eq!(parsed["epsilon"].as_f64(), Some(1e-7));
    }

    #[test]
    fn test_object_example_on_scalar_field_is_raw_yaml() {
        let yaml = render_default(json!({
            "properties": {
                "selector": {
                    "type": "string",
                    "example": {"z": [1, 2]}
                }
            }
        }));

        assert_eq!(
            yaml,
            "# example:\n#   z:\n#   - 1\n#   - 2\nselector: \"\"\n"
        );
        assert!(!yaml.contains("\"z:"));
    }

    #[test]
    fn test_pipeline_without_comments_or_defaults() {
        let yaml = generate_config_yaml(FIXTURE.as_bytes(), RenderOptions::new(true, true)).unwrap();

        assert!(!yaml.contains('#'));
        assert!(!yaml.contains("example.com"));
        assert!(yaml.contains("    clusterNetwork: []\n"));
        assert!(yaml.contains("    maxFiles: 0\n"));
    }
}
