//! CRD deserialization and `config` subtree extraction

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, JSONSchemaProps,
};
use tracing::debug;

use crate::error::{ConfgenError, Result};

/// Name of the root schema property holding the configuration
pub const CONFIG_PROPERTY: &str = "config";

/// Deserialize a CustomResourceDefinition from YAML or JSON bytes
pub fn parse_crd(data: &[u8]) -> Result<CustomResourceDefinition> {
    // JSON is valid YAML, one parser covers both formats
    Ok(serde_yaml::from_slice(data)?)
}

/// Extract `spec.versions[0].schema.openAPIV3Schema.properties.config`
///
/// The CRD must declare exactly one version. A missing schema or a missing
/// `config` property yields an empty schema rather than an error.
pub fn extract_config_schema(data: &[u8]) -> Result<JSONSchemaProps> {
    let crd = parse_crd(data)?;
    let versions = &crd.spec.versions;

    if versions.len() != 1 {
        return Err(ConfgenError::VersionCount {
            found: versions.len(),
        });
    }

    let config = versions[0]
        .schema
        .as_ref()
        .and_then(|validation| validation.open_api_v3_schema.as_ref())
        .and_then(|schema| schema.properties.as_ref())
        .and_then(|properties| properties.get(CONFIG_PROPERTY))
        .cloned()
        .unwrap_or_default();

    debug!(
        crd = crd.metadata.name.as_deref().unwrap_or("<unnamed>"),
        version = %versions[0].name,
        properties = config.properties.as_ref().map_or(0, |p| p.len()),
        "extracted config schema"
    );

    Ok(config)
}

/// Extract the `config` subtree as pretty-printed (two-space) JSON
pub fn extract_openapi_json(data: &[u8]) -> Result<String> {
    let config = extract_config_schema(data)?;
    Ok(serde_json::to_string_pretty(&config)?)
}
