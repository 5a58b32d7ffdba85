//! Errors raised by the template engine collaborator.

use thiserror::Error;

/// Failure inside the Handlebars engine.
///
/// Template syntax errors surface when a template or partial is parsed (compile,
/// precompile, partial registration); render errors surface when a compiled
/// template is applied to a context.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The template text could not be parsed
    #[error(transparent)]
    Template(#[from] handlebars::TemplateError),

    /// Rendering failed (unknown helper, missing variable in strict mode, ...)
    #[error(transparent)]
    Render(#[from] handlebars::RenderError),

    /// A precompiled artifact could not be serialized or read back
    #[error("Invalid precompiled template artifact: {0}")]
    Artifact(#[from] serde_json::Error),

    /// The artifact was produced by a different compiler revision
    #[error("Precompiled template has compiler revision {found}, expected {expected}")]
    IncompatibleArtifact {
        /// Revision recorded in the artifact
        found: u32,
        /// Revision this engine produces
        expected: u32,
    },
}
