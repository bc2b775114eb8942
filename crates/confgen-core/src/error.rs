//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfgenError {
    #[error("failed to unmarshal custom resource definition: {0}")]
    Deserialize(#[from] serde_yaml::Error),

    #[error("expected length of crd.spec.versions to be 1 but got {found}")]
    VersionCount { found: usize },

    /// A `default` or `example` annotation does not have the shape its
    /// schema type requires. The CRD source is wrong, generation must stop.
    #[error("failed to parse {raw} into {expected}: {reason}")]
    InvalidValue {
        raw: String,
        expected: &'static str,
        reason: String,
    },

    #[error("failed to marshal openapi into json: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal consistency check. Never caused by user input.
    #[error("internal consistency check failed: {0}")]
    Internal(String),
}

impl ConfgenError {
    pub(crate) fn invalid_value(
        raw: &serde_json::Value,
        expected: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            raw: raw.to_string(),
            expected,
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the schema shape rather than from the
    /// input bytes failing to parse
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Self::VersionCount { .. } | Self::InvalidValue { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConfgenError>;
