//! Handlebars engine instance owned by one bundler.

use handlebars::{Handlebars, HelperDef, Template};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::trace;

use super::error::EngineError;
use super::helpers;
use crate::config::CompilerOptions;
use crate::core::BoxError;
use crate::resolver::discover_references;

/// Revision of the precompiled artifact format produced by [`Engine::precompile`].
pub const COMPILER_REVISION: u32 = 1;

/// Engine versions able to load artifacts of [`COMPILER_REVISION`].
pub const COMPILER_VERSIONS: &str = ">= 6.3.0";

/// A partial registered into an [`Engine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialEntry {
    /// Name used in inclusion markers
    pub name: String,
    /// Raw source, or a serialized artifact after precompilation
    pub src: String,
}

impl PartialEntry {
    /// Create an entry from a name and its source.
    pub fn new(name: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
        }
    }
}

/// Serialized, validated form of a template.
///
/// The artifact records the compiler revision it was produced with, the template source
/// that passed parsing, and the names of the partials the template includes so a runtime
/// loader can register dependencies first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompiledTemplate {
    /// `[revision, supported engine versions]`
    pub compiler: (u32, String),
    /// Parsed template source
    pub source: String,
    /// Partials referenced by the template, in first-use order
    #[serde(default)]
    pub partials: Vec<String>,
}

impl PrecompiledTemplate {
    /// Read an artifact back from its serialized form.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Artifact`] for malformed JSON and
    /// [`EngineError::IncompatibleArtifact`] for a different compiler revision.
    pub fn from_json(artifact: &str) -> Result<Self, EngineError> {
        let template: Self = serde_json::from_str(artifact)?;
        if template.compiler.0 != COMPILER_REVISION {
            return Err(EngineError::IncompatibleArtifact {
                found: template.compiler.0,
                expected: COMPILER_REVISION,
            });
        }
        Ok(template)
    }
}

/// A parsed template ready to be applied to contexts.
///
/// Borrows the engine so that rendering sees every partial and helper registered on it.
#[derive(Debug)]
pub struct CompiledTemplate<'e> {
    engine: &'e Engine,
    source: String,
}

impl CompiledTemplate<'_> {
    /// Render the template against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Render`] on unknown helpers or partials, missing variables in
    /// strict mode, or helper failures.
    pub fn render(&self, context: &serde_json::Value) -> Result<String, EngineError> {
        Ok(self.engine.registry.render_template(&self.source, context)?)
    }
}

/// Engine instance: a Handlebars registry plus the partial bookkeeping of its owner.
///
/// `sources` maps each partial name to its latest source (overwritten on
/// re-registration) while `registered` keeps every registration in order, duplicates
/// included, across all invocations on the instance. `helpers` names every helper
/// registered through the engine.
pub struct Engine {
    registry: Handlebars<'static>,
    options: CompilerOptions,
    sources: HashMap<String, String>,
    registered: Vec<PartialEntry>,
    helpers: HashSet<String>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("partials", &self.registered.len())
            .field("helpers", &self.helpers)
            .finish_non_exhaustive()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl Engine {
    /// Create an engine with `options` applied and the built-in helpers registered.
    pub fn new(options: CompilerOptions) -> Self {
        let mut registry = Handlebars::new();

        if options.no_escape {
            registry.register_escape_fn(handlebars::no_escape);
        }
        registry.set_strict_mode(options.strict);
        registry.set_prevent_indent(options.prevent_indent);
        registry.set_dev_mode(options.dev_mode);

        let mut engine = Self {
            registry,
            options,
            sources: HashMap::new(),
            registered: Vec::new(),
            helpers: HashSet::new(),
        };
        helpers::register_builtins(&mut engine);
        engine
    }

    /// Options the engine was created with.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Register a Rust helper under `name`, replacing any helper of that name.
    pub fn register_helper(&mut self, name: &str, helper: Box<dyn HelperDef + Send + Sync + 'static>) {
        trace!("Registering helper '{}'", name);
        self.registry.register_helper(name, helper);
        self.helpers.insert(name.to_string());
    }

    /// Register the rhai script at `path` as helper `name`.
    ///
    /// # Errors
    ///
    /// Returns the engine's script error if the file cannot be read or does not compile.
    pub fn register_script_helper_file(&mut self, name: &str, path: &Path) -> Result<(), BoxError> {
        trace!("Registering script helper '{}' from {}", name, path.display());
        self.registry.register_script_helper_file(name, path)?;
        self.helpers.insert(name.to_string());
        Ok(())
    }

    /// Register a partial under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] if the source does not parse.
    pub fn register_partial(&mut self, name: &str, source: &str) -> Result<(), EngineError> {
        trace!("Registering partial '{}'", name);
        self.registry.register_partial(name, source)?;
        self.sources.insert(name.to_string(), source.to_string());
        self.registered.push(PartialEntry::new(name, source));
        Ok(())
    }

    /// Latest source registered under `name`.
    pub fn partial_source(&self, name: &str) -> Option<&str> {
        self.sources.get(name).map(String::as_str)
    }

    /// Every partial ever registered on this engine, in registration order.
    pub fn partials(&self) -> &[PartialEntry] {
        &self.registered
    }

    /// Whether a helper named `name` was registered on this engine.
    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.contains(name)
    }

    /// Parse `text` into a template that renders against this engine.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] for malformed template syntax.
    pub fn compile(&self, text: &str) -> Result<CompiledTemplate<'_>, EngineError> {
        Template::compile(text)?;
        Ok(CompiledTemplate {
            engine: self,
            source: text.to_string(),
        })
    }

    /// Parse `text` and serialize it into a [`PrecompiledTemplate`] JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Template`] for malformed template syntax.
    pub fn precompile(&self, text: &str) -> Result<String, EngineError> {
        Template::compile(text)?;
        let artifact = PrecompiledTemplate {
            compiler: (COMPILER_REVISION, COMPILER_VERSIONS.to_string()),
            source: text.to_string(),
            partials: discover_references(text),
        };
        Ok(serde_json::to_string(&artifact)?)
    }

    /// Load a precompiled artifact into the registry as template `name`.
    ///
    /// Templates loaded this way are rendered with [`Engine::render`]. Partials are loaded
    /// the same way, through [`Engine::register_precompiled_partial`].
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the artifact is malformed, from another compiler
    /// revision, or its source no longer parses.
    pub fn register_precompiled(&mut self, name: &str, artifact: &str) -> Result<(), EngineError> {
        let template = PrecompiledTemplate::from_json(artifact)?;
        self.registry.register_template_string(name, template.source)?;
        Ok(())
    }

    /// Load a precompiled partial artifact under `name`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Engine::register_precompiled`].
    pub fn register_precompiled_partial(
        &mut self,
        name: &str,
        artifact: &str,
    ) -> Result<(), EngineError> {
        let template = PrecompiledTemplate::from_json(artifact)?;
        self.register_partial(name, &template.source)
    }

    /// Render a template previously loaded with [`Engine::register_precompiled`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Render`] if `name` is unknown or rendering fails.
    pub fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, EngineError> {
        Ok(self.registry.render(name, context)?)
    }
}
