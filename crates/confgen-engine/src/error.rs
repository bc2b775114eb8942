//! Engine error types with source-mapped diagnostics

use std::error::Error as _;

use confgen_core::ConfgenError;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::blocks::builtin_source;
use crate::suggestions::{
    AVAILABLE_FILTERS, suggest_iteration_fix, suggest_undefined_variable, suggest_unknown_filter,
    suggest_unknown_function,
};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Generate(#[from] ConfgenError),
}

/// Error kind for categorizing template errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    TypeError,
    InvalidOperation,
    /// The config pipeline failed inside a template function
    Generation,
    Other,
}

impl TemplateErrorKind {
    /// Convert to a code string for diagnostics
    pub fn to_code_string(&self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::UnknownFilter => "unknown_filter",
            Self::UnknownFunction => "unknown_function",
            Self::SyntaxError => "syntax",
            Self::TypeError => "type",
            Self::InvalidOperation => "invalid_operation",
            Self::Generation => "generation",
            Self::Other => "render",
        }
    }
}

/// Template-specific error with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(confgen::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// Template source code
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in source
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Create a template error from a MiniJinja error
    ///
    /// The span points into the template the error was raised in, which is
    /// either the user template or one of the built-in blocks.
    pub fn from_minijinja(err: minijinja::Error, template_name: &str, template_source: &str) -> Self {
        let generation = find_generation_error(&err);
        let (kind, message) = match generation {
            Some(cause) => (TemplateErrorKind::Generation, cause.to_string()),
            None => categorize_minijinja_error(&err),
        };

        let (name, source) = match err.name() {
            Some(name) if name != template_name => match builtin_source(name) {
                Some(source) => (name.to_string(), source.to_string()),
                None => (template_name.to_string(), template_source.to_string()),
            },
            _ => (template_name.to_string(), template_source.to_string()),
        };

        let span = err.line().and_then(|line_num| calculate_span(&source, line_num));
        let suggestion = match generation {
            Some(cause) => generation_suggestion(cause),
            None => generate_suggestion(&err, &kind),
        };

        Self {
            message,
            kind,
            src: NamedSource::new(name, source),
            span,
            suggestion,
        }
    }

    /// Create a simple error without source mapping
    pub fn simple(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: TemplateErrorKind::Other,
            src: NamedSource::new("<unknown>", String::new()),
            span: None,
            suggestion: None,
        }
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

/// Walk the source chain for a pipeline error raised by a template function
fn find_generation_error(err: &minijinja::Error) -> Option<&ConfgenError> {
    let mut current = err.source();
    while let Some(cause) = current {
        if let Some(found) = cause.downcast_ref::<ConfgenError>() {
            return Some(found);
        }
        current = cause.source();
    }
    None
}

fn generation_suggestion(err: &ConfgenError) -> Option<String> {
    match err {
        ConfgenError::VersionCount { .. } => Some(
            "The CRD must declare exactly one entry under spec.versions.".to_string(),
        ),
        ConfgenError::InvalidValue { .. } => Some(
            "Fix the `default` or `example` annotation so it matches the property type."
                .to_string(),
        ),
        ConfgenError::Deserialize(_) => {
            Some("The input must be a CustomResourceDefinition in YAML or JSON.".to_string())
        }
        ConfgenError::Json(_) | ConfgenError::Internal(_) => None,
    }
}

/// Categorize a MiniJinja error into our error kinds
fn categorize_minijinja_error(err: &minijinja::Error) -> (TemplateErrorKind, String) {
    let msg = err.to_string();
    let msg_lower = msg.to_lowercase();

    let kind = match err.kind() {
        minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        minijinja::ErrorKind::UnknownFilter => TemplateErrorKind::UnknownFilter,
        minijinja::ErrorKind::UnknownFunction => TemplateErrorKind::UnknownFunction,
        minijinja::ErrorKind::SyntaxError => TemplateErrorKind::SyntaxError,
        minijinja::ErrorKind::InvalidOperation => TemplateErrorKind::InvalidOperation,
        minijinja::ErrorKind::NonPrimitive | minijinja::ErrorKind::NonKey => {
            TemplateErrorKind::TypeError
        }
        _ => {
            if msg_lower.contains("undefined") {
                TemplateErrorKind::UndefinedVariable
            } else if msg_lower.contains("not iterable") || msg_lower.contains("cannot") {
                TemplateErrorKind::TypeError
            } else {
                TemplateErrorKind::Other
            }
        }
    };

    let message = msg
        .replace("invalid operation: ", "")
        .replace("syntax error: ", "")
        .replace("undefined value", "undefined variable");

    (kind, message)
}

/// Calculate the source span for a given line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        if index + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Generate suggestions based on error kind
fn generate_suggestion(err: &minijinja::Error, kind: &TemplateErrorKind) -> Option<String> {
    let msg = format!("{err:#}");

    match kind {
        TemplateErrorKind::UndefinedVariable => suggest_undefined_variable(&msg).or_else(|| {
            Some("The only variable in scope is `crd`, the raw CRD text.".to_string())
        }),
        TemplateErrorKind::UnknownFilter => suggest_unknown_filter(&msg).or_else(|| {
            Some(format!(
                "Unknown filter. Available: {}",
                AVAILABLE_FILTERS.join(", ")
            ))
        }),
        TemplateErrorKind::UnknownFunction => suggest_unknown_function(&msg),
        TemplateErrorKind::SyntaxError => Some(
            "Check bracket matching: `{{ }}` for expressions, `{% %}` for statements, `{# #}` for comments"
                .to_string(),
        ),
        TemplateErrorKind::TypeError if msg.to_lowercase().contains("not iterable") => {
            Some(suggest_iteration_fix())
        }
        _ => None,
    }
}
