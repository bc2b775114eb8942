//! Template engine based on MiniJinja

use confgen_core::extract_openapi_json;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use tracing::debug;

use crate::blocks::{BUILTIN_BLOCKS, DEFAULT_TEMPLATE, DEFAULT_TEMPLATE_NAME};
use crate::error::{EngineError, TemplateError};
use crate::filters;
use crate::functions::FunctionTable;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Name the user template is registered under
pub const USER_TEMPLATE_NAME: &str = "yamlTemplate";

/// Template engine builder
pub struct EngineBuilder {
    strict_mode: bool,
    functions: FunctionTable,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            strict_mode: true,
            functions: FunctionTable::default(),
        }
    }

    /// Set strict mode (fail on undefined variables)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Replace the functions exposed to templates
    pub fn functions(mut self, functions: FunctionTable) -> Self {
        self.functions = functions;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine {
            strict_mode: self.strict_mode,
            functions: self.functions,
        }
    }
}

/// The template engine
pub struct Engine {
    strict_mode: bool,
    functions: FunctionTable,
}

impl Default for Engine {
    fn default() -> Self {
        EngineBuilder::new().build()
    }
}

impl Engine {
    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Functions this engine exposes
    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Create a configured MiniJinja environment with the built-in blocks
    fn create_environment(&self) -> Result<Environment<'static>> {
        let mut env = Environment::new();

        if self.strict_mode {
            env.set_undefined_behavior(UndefinedBehavior::Strict);
        } else {
            env.set_undefined_behavior(UndefinedBehavior::Lenient);
        }
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        env.add_filter("toyaml", filters::toyaml);
        env.add_filter("tojson", filters::tojson);
        env.add_filter("nindent", filters::nindent);
        env.add_filter("indent", filters::indent);

        self.functions.register(&mut env);

        for &(name, source) in BUILTIN_BLOCKS {
            env.add_template(name, source)
                .map_err(|e| TemplateError::from_minijinja(e, name, source))?;
        }

        Ok(env)
    }

    /// Render `template` with `crd` bound to the raw CRD text
    ///
    /// Nothing is returned unless the whole template rendered.
    pub fn render(&self, template: &str, crd: &str) -> Result<String> {
        self.render_named(USER_TEMPLATE_NAME, template, crd)
    }

    /// Render the embedded default template
    pub fn render_default(&self, crd: &str) -> Result<String> {
        self.render_named(DEFAULT_TEMPLATE_NAME, DEFAULT_TEMPLATE, crd)
    }

    fn render_named(&self, template_name: &str, template: &str, crd: &str) -> Result<String> {
        let mut env = self.create_environment()?;

        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template))?;

        let tmpl = env
            .get_template(template_name)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template))?;

        debug!(template = template_name, "rendering template");

        let ctx = minijinja::context! { crd => crd };
        let rendered = tmpl
            .render(ctx)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template))?;

        Ok(rendered)
    }

    /// The `config` schema as pretty JSON, outside any template
    pub fn export_openapi(&self, crd: &str) -> Result<String> {
        Ok(extract_openapi_json(crd.as_bytes())?)
    }
}
