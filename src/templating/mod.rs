//! Handlebars engine collaborator.
//!
//! The pipeline treats the template engine as a black box with four capabilities:
//! compile a template into something renderable, precompile it into a portable
//! artifact, register partials, and register helpers. [`Engine`] provides exactly that
//! over a [`handlebars::Handlebars`] registry.
//!
//! # Precompiled artifacts
//!
//! [`Engine::precompile`] validates a template and serializes it as a
//! [`PrecompiledTemplate`] JSON object:
//!
//! ```json
//! {"compiler":[1,">= 6.3.0"],"source":"<h1>{{title}}</h1>{{> footer}}","partials":["footer"]}
//! ```
//!
//! Artifacts are loaded back with [`Engine::register_precompiled`] and
//! [`Engine::register_precompiled_partial`], which is how bundles produced by
//! `bundlebars precompile` are consumed at runtime without the bundler.
//!
//! # Partial registry
//!
//! Each registration overwrites the named partial in the registry and is also appended
//! to [`Engine::partials`], a cumulative list that is never deduplicated. A bundler
//! reused for several templates therefore precompiles every partial it has seen.

mod error;
pub mod helpers;
mod renderer;

pub use error::EngineError;
pub use helpers::{HelperLoader, ScriptHelperLoader};
pub use renderer::{
    COMPILER_REVISION, COMPILER_VERSIONS, CompiledTemplate, Engine, PartialEntry,
    PrecompiledTemplate,
};
