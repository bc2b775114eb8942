//! CLI error types with exit code handling
//!
//! Every failure of a run is funneled into [`CliError`], which knows the
//! exit code it maps to.

use std::path::Path;

use confgen_core::ConfgenError;
use confgen_engine::{EngineError, TemplateError, TemplateErrorKind};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// The input could not be read as text
    #[error("Invalid input: {message}")]
    #[diagnostic(code(confgen::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The config pipeline rejected the CRD
    #[error("Generation failed: {source}")]
    #[diagnostic(code(confgen::cli::generate))]
    Generate {
        source: ConfgenError,
        #[help]
        help: Option<String>,
    },

    /// Template parsing or rendering failed
    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(TemplateError),

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(confgen::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::Generate { source, .. } => {
                if matches!(source, ConfgenError::Deserialize(_)) || source.is_shape_error() {
                    exit_codes::INPUT_ERROR
                } else {
                    exit_codes::ERROR
                }
            }
            CliError::Template(err) if err.kind() == TemplateErrorKind::Generation => {
                exit_codes::INPUT_ERROR
            }
            CliError::Template(_) => exit_codes::TEMPLATE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an IO error that names the file involved
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{}: {}", path.display(), err),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<ConfgenError> for CliError {
    fn from(source: ConfgenError) -> Self {
        let help = match &source {
            ConfgenError::VersionCount { .. } => {
                Some("The CRD must declare exactly one entry under spec.versions.".to_string())
            }
            ConfgenError::Deserialize(_) => {
                Some("The input must be a CustomResourceDefinition in YAML or JSON.".to_string())
            }
            _ => None,
        };
        CliError::Generate { source, help }
    }
}

impl From<EngineError> for CliError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Template(err) => CliError::Template(err),
            EngineError::Generate(err) => err.into(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
