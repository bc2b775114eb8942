//! Built-in template blocks
//!
//! These are registered before the user template so it can pull them in
//! with `{% include "config" %}` and friends.

/// Template used when no `--template` is given
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/config-file.template.yaml");

/// Name under which the default template is registered
pub const DEFAULT_TEMPLATE_NAME: &str = "config-file.template.yaml";

/// Named snippets available to every template
pub const BUILTIN_BLOCKS: &[(&str, &str)] = &[
    ("config", "{{ parseToConfigYaml(crd) }}"),
    (
        "config_no_comments",
        "{{ parseToConfigYamlOpts(crd, true, false) }}",
    ),
    (
        "config_no_defaults",
        "{{ parseToConfigYamlOpts(crd, false, true) }}",
    ),
    ("config_bare", "{{ parseToConfigYamlOpts(crd, true, true) }}"),
    ("openapi", "{{ parseToOpenApiJson(crd) }}"),
    (
        "header",
        "# This file is generated from the config CustomResourceDefinition.\n\
         # Edit the CRD and regenerate instead of changing it by hand.\n",
    ),
];

/// Source of a built-in block, if `name` is one
pub fn builtin_source(name: &str) -> Option<&'static str> {
    BUILTIN_BLOCKS
        .iter()
        .find(|(block, _)| *block == name)
        .map(|(_, source)| *source)
}
