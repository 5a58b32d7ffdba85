//! Compilation pipeline.
//!
//! A [`Bundler`] owns one [`Engine`] and drives each call through a fixed sequence of
//! stages, threading a [`PipelineState`] from one to the next:
//!
//! ```text
//!  resolve_template ─┐
//!  resolve_context  ─┼─> register_partials ─> compile_template ──────────────> result
//!  load_helpers     ─┘                     └> precompile_template ─> wrap_template
//! ```
//!
//! The first three stages run concurrently and must all succeed before partials are
//! resolved. Any failing stage fails the whole call with a [`BundlebarsError`].
//!
//! # Instance lifetime
//!
//! Helpers are loaded on the first call and kept. Partial directory and extension
//! defaults are derived from the first file template and kept. Registered partials
//! accumulate across calls, so precompiling several templates with one bundler emits
//! every partial seen so far.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlebars::config::BundlerConfig;
//! use bundlebars::pipeline::{Bundler, ContextSource, WrapperRef};
//! use serde_json::json;
//!
//! # async fn example() -> bundlebars::core::Result<()> {
//! let mut bundler = Bundler::new(BundlerConfig::default().with_partials_dir("partials"));
//!
//! let html = bundler
//!     .compile("pages/index.hbs", Some(ContextSource::Value(json!({"title": "Home"}))))
//!     .await?;
//!
//! let bundle = bundler
//!     .precompile("pages/index.hbs", Some(WrapperRef::parse("json-bundle")))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod source;
pub mod state;
pub mod wrappers;

pub use context::resolve_context;
pub use source::resolve_template;
pub use state::{ContextSource, PipelineState, TemplateSource, TemplateStream};
pub use wrappers::{BuiltinWrapper, WrapperRef};

pub use crate::templating::PartialEntry;

use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::config::{BundlerConfig, CompilerOptions, partial_path};
use crate::core::{BundlebarsError, Result};
use crate::resolver::resolve_partials;
use crate::templating::{Engine, HelperLoader, ScriptHelperLoader};
use crate::utils::fs::{template_dir, template_ext, template_stem};

/// Compiler instance: configuration, engine and helper loader.
pub struct Bundler {
    config: BundlerConfig,
    engine: Engine,
    helper_loader: Arc<dyn HelperLoader>,
    helpers_loaded: bool,
}

impl std::fmt::Debug for Bundler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bundler")
            .field("config", &self.config)
            .field("engine", &self.engine)
            .field("helpers_loaded", &self.helpers_loaded)
            .finish_non_exhaustive()
    }
}

impl Default for Bundler {
    fn default() -> Self {
        Self::new(BundlerConfig::default())
    }
}

impl Bundler {
    /// Create a bundler; helpers load as rhai scripts.
    pub fn new(config: BundlerConfig) -> Self {
        let engine = Engine::new(config.compiler_options.clone());
        Self {
            config,
            engine,
            helper_loader: Arc::new(ScriptHelperLoader),
            helpers_loaded: false,
        }
    }

    /// Replace the loader used for files in the helpers directory.
    #[must_use]
    pub fn with_helper_loader(mut self, loader: impl HelperLoader + 'static) -> Self {
        self.helper_loader = Arc::new(loader);
        self
    }

    /// Current configuration, including defaults derived so far.
    pub fn config(&self) -> &BundlerConfig {
        &self.config
    }

    /// The engine instance.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Mutable engine access, e.g. to register partials or helpers by hand.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Render `template` against `context`.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub async fn compile(
        &mut self,
        template: impl Into<TemplateSource>,
        context: Option<ContextSource>,
    ) -> Result<String> {
        let state = PipelineState::new(template).with_context(context);
        Ok(self.run_compile(state).await?.into_result())
    }

    /// Precompile `template` and its partials, then apply `wrapper` if given.
    ///
    /// Without a wrapper the result is the template's precompiled artifact.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage, including the wrapper pass.
    pub async fn precompile(
        &mut self,
        template: impl Into<TemplateSource>,
        wrapper: Option<WrapperRef>,
    ) -> Result<String> {
        let state = PipelineState::new(template).with_wrapper(wrapper);
        Ok(self.run_precompile(state).await?.into_result())
    }

    /// Run the render pipeline on a prepared state and return the final state.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub async fn run_compile(&mut self, state: PipelineState) -> Result<PipelineState> {
        let state = self.prepare(state, true).await?;
        let state = self.register_partials(state).await?;
        self.compile_template(state)
    }

    /// Run the precompile pipeline on a prepared state and return the final state.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub async fn run_precompile(&mut self, state: PipelineState) -> Result<PipelineState> {
        let state = self.prepare(state, false).await?;
        let state = self.register_partials(state).await?;
        let state = self.precompile_template(state)?;
        Self::wrap_template(state).await
    }

    /// Source, context and helper stages, run concurrently.
    async fn prepare(&mut self, mut state: PipelineState, with_context: bool) -> Result<PipelineState> {
        let context_ref = if with_context {
            state.context_ref.take()
        } else {
            None
        };

        let context = async move {
            match context_ref {
                Some(source) => context::load_context(source).await.map(Some),
                None => Ok(None),
            }
        };

        let (mut state, context, ()) =
            tokio::try_join!(resolve_template(state), context, self.load_helpers())?;

        if let Some((context, filename)) = context {
            state.context = context;
            state.context_filename = filename;
        } else if state.context.is_null() {
            state.context = json!({});
        }

        Ok(state)
    }

    /// Load every file of the helpers directory, once per instance.
    ///
    /// Files are loaded in file name order. Without a helpers directory only the
    /// built-in helpers are available.
    ///
    /// The instance counts as loaded only after every file succeeded. After a failure
    /// the next call runs every loader again, re-registering helpers that loaded
    /// before the failing one.
    ///
    /// # Errors
    ///
    /// - [`BundlebarsError::HelpersLoad`] if the directory cannot be listed
    /// - [`BundlebarsError::HelperRegistration`] if a helper fails to load
    pub async fn load_helpers(&mut self) -> Result<()> {
        if self.helpers_loaded {
            return Ok(());
        }

        let Some(dir) = self.config.helpers_dir.clone() else {
            self.helpers_loaded = true;
            return Ok(());
        };

        let listing_error = |source| BundlebarsError::HelpersLoad {
            path: dir.clone(),
            source,
        };

        let mut entries = tokio::fs::read_dir(&dir).await.map_err(listing_error)?;
        let mut files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
            if entry.file_type().await.map_err(listing_error)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        for path in files {
            debug!("Loading helper {}", path.display());
            self.helper_loader.load(&path, &mut self.engine).map_err(|source| {
                BundlebarsError::HelperRegistration {
                    name: template_stem(&path),
                    path: path.clone(),
                    source,
                }
            })?;
        }

        self.helpers_loaded = true;
        Ok(())
    }

    /// Discover, fetch and register the partials of `state.template_body`.
    ///
    /// Skipped when partials are disabled, or when the template has no file and no
    /// partials directory and extension are configured. Otherwise the directory and
    /// extension default to the template's own and are kept for later calls.
    ///
    /// # Errors
    ///
    /// - [`BundlebarsError::PartialNotFound`] if any partial file cannot be read
    /// - [`BundlebarsError::Engine`] if a partial does not parse
    pub async fn register_partials(&mut self, mut state: PipelineState) -> Result<PipelineState> {
        let configured = self.config.partials_dir.is_some() && self.config.partials_ext.is_some();
        if self.config.no_partials || (state.template_filename.is_none() && !configured) {
            debug!("Partial discovery skipped");
            return Ok(state);
        }

        let filename = state.template_filename.clone().unwrap_or_default();
        let dir = self.config.partials_dir.get_or_insert_with(|| template_dir(&filename)).clone();
        let ext = self.config.partials_ext.get_or_insert_with(|| template_ext(&filename)).clone();

        let body = state.template_body.as_deref().ok_or(BundlebarsError::MissingTemplate)?;

        let partials = resolve_partials(body, |name| {
            let path = partial_path(&dir, &name, &ext);
            async move {
                tokio::fs::read_to_string(&path).await.map_err(|source| {
                    BundlebarsError::PartialNotFound {
                        name,
                        path,
                        source,
                    }
                })
            }
        })
        .await?;

        for partial in &partials {
            self.engine.register_partial(&partial.name, &partial.src)?;
        }

        state.partials = partials;
        Ok(state)
    }

    /// Render the template body against the resolved context.
    ///
    /// # Errors
    ///
    /// Returns [`BundlebarsError::Engine`] for syntax or render failures.
    pub fn compile_template(&self, mut state: PipelineState) -> Result<PipelineState> {
        let body = state.template_body.as_deref().ok_or(BundlebarsError::MissingTemplate)?;
        let result = self.engine.compile(body)?.render(&state.context)?;
        state.result = Some(result);
        Ok(state)
    }

    /// Precompile the template body and every partial registered on the engine.
    ///
    /// `state.partials` is replaced by the precompiled forms, or emptied when partials
    /// are disabled.
    ///
    /// # Errors
    ///
    /// Returns [`BundlebarsError::Engine`] for syntax failures.
    pub fn precompile_template(&self, mut state: PipelineState) -> Result<PipelineState> {
        state.partials = if self.config.no_partials {
            Vec::new()
        } else {
            self.engine
                .partials()
                .iter()
                .map(|partial| {
                    Ok(PartialEntry::new(&partial.name, self.engine.precompile(&partial.src)?))
                })
                .collect::<Result<Vec<_>>>()?
        };

        let body = state.template_body.as_deref().ok_or(BundlebarsError::MissingTemplate)?;
        state.result = Some(self.engine.precompile(body)?);
        Ok(state)
    }

    /// Render `state.wrapper` over the precompiled result.
    ///
    /// The wrapper runs on a fresh bundler with escaping disabled and default partial
    /// discovery, against `{partials, src, name}` taken from `state`. Without a wrapper
    /// the state is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`BundlebarsError::MissingTemplate`] if a wrapper is set but there is no result
    /// - any error of the wrapper's own compile
    pub async fn wrap_template(mut state: PipelineState) -> Result<PipelineState> {
        let Some(wrapper) = state.wrapper.as_ref() else {
            return Ok(state);
        };
        let src = state.result.as_deref().ok_or(BundlebarsError::MissingTemplate)?;

        debug!("Applying wrapper {:?} to '{}'", wrapper, state.template_name);

        let context = json!({
            "partials": state.partials,
            "src": src,
            "name": state.template_name,
        });

        let mut bundler =
            Bundler::new(BundlerConfig::default().with_compiler_options(CompilerOptions::no_escape()));
        let result = bundler.compile(wrapper.to_source(), Some(ContextSource::Value(context))).await?;

        state.result = Some(result);
        Ok(state)
    }
}
