//! Error handling for Bundlebars
//!
//! This module provides the error taxonomy of the compilation pipeline and the
//! user-facing presentation of those errors. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can match on what went wrong
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`BundlebarsError`] - every failure a pipeline invocation can end with
//! - [`ErrorKind`] - a flat, copyable classification of [`BundlebarsError`]
//! - [`ErrorContext`] - wrapper adding a suggestion and details for terminal output
//!
//! # Propagation
//!
//! A pipeline invocation never recovers locally. The first failing stage rejects the
//! whole invocation and the error reaches the caller unchanged, with the underlying
//! I/O, parse or engine error kept as its [`source`](std::error::Error::source).
//! The only tolerated conditions (a missing context file, disabled or inapplicable
//! partial discovery) never produce an error in the first place.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bundlebars::core::{BundlebarsError, ErrorKind, user_friendly_error};
//!
//! fn report(err: BundlebarsError) {
//!     if err.kind() == ErrorKind::PartialNotFound {
//!         eprintln!("a partial is missing");
//!     }
//!     user_friendly_error(anyhow::Error::from(err)).display();
//! }
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::templating::EngineError;

/// Boxed error used where the underlying failure comes from different libraries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BundlebarsError>;

/// Failures of a compile or precompile invocation.
///
/// Every variant keeps the path or name it concerns and the original error as its
/// source, so nothing is lost between the failing stage and the caller.
#[derive(Error, Debug)]
pub enum BundlebarsError {
    /// The template file could not be read (including not found).
    #[error("Failed to read template '{}'", path.display())]
    TemplateRead {
        /// Template path as supplied by the caller
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The template byte stream failed before reaching end-of-stream, or was not UTF-8.
    #[error("Template stream failed before completion")]
    TemplateStream {
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// No template was supplied and the state carries no template body.
    #[error("No template was supplied")]
    MissingTemplate,

    /// The context file exists but could not be read or parsed.
    #[error("Failed to load context from '{}'", path.display())]
    ContextLoad {
        /// Context file path
        path: PathBuf,
        /// Read or parse error
        #[source]
        source: BoxError,
    },

    /// In-memory context data is not an object.
    #[error("Context must be an object, found {found}")]
    InvalidContext {
        /// Kind of value that was supplied
        found: &'static str,
    },

    /// A discovered partial has no readable backing file.
    #[error("Partial '{name}' not found at '{}'", path.display())]
    PartialNotFound {
        /// Partial name as written in the inclusion marker
        name: String,
        /// Path the partial was looked up at
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The helpers directory could not be listed.
    #[error("Failed to list helpers directory '{}'", path.display())]
    HelpersLoad {
        /// Helpers directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A single helper module failed to load or register.
    #[error("Failed to register helper '{name}' from '{}'", path.display())]
    HelperRegistration {
        /// Helper name
        name: String,
        /// Helper module path
        path: PathBuf,
        /// Loader error
        #[source]
        source: BoxError,
    },

    /// The compiler options file could not be read or parsed.
    #[error("Invalid compiler options file '{}'", path.display())]
    CompilerOptions {
        /// Options file path
        path: PathBuf,
        /// Read or parse error
        #[source]
        source: BoxError,
    },

    /// The template engine rejected a template or failed while rendering.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Flat classification of [`BundlebarsError`] for callers that only need the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Template unreadable or missing
    Io,
    /// Template stream broken
    Stream,
    /// Context file unreadable or malformed
    Context,
    /// Partial backing file unreadable
    PartialNotFound,
    /// Helpers directory unreadable
    HelpersLoad,
    /// Individual helper failed
    Helper,
    /// Configuration input invalid
    Config,
    /// Template engine failure
    Engine,
}

impl BundlebarsError {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TemplateRead {
                ..
            }
            | Self::MissingTemplate => ErrorKind::Io,
            Self::TemplateStream {
                ..
            } => ErrorKind::Stream,
            Self::ContextLoad {
                ..
            }
            | Self::InvalidContext {
                ..
            } => ErrorKind::Context,
            Self::PartialNotFound {
                ..
            } => ErrorKind::PartialNotFound,
            Self::HelpersLoad {
                ..
            } => ErrorKind::HelpersLoad,
            Self::HelperRegistration {
                ..
            } => ErrorKind::Helper,
            Self::CompilerOptions {
                ..
            } => ErrorKind::Config,
            Self::Engine(_) => ErrorKind::Engine,
        }
    }
}

/// Error wrapper with user-facing suggestion and details.
///
/// ```rust,no_run
/// use bundlebars::core::{BundlebarsError, ErrorContext};
///
/// let context = ErrorContext::new(BundlebarsError::MissingTemplate)
///     .with_suggestion("Pass a template file or '-' to read from stdin");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// Headline message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context whose headline is the error's message.
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: message in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for terminal output.
///
/// Known [`BundlebarsError`] variants anywhere in the chain get a tailored suggestion.
/// The message always carries the full `Caused by` chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(ToString::to_string).collect();
    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    let context = ErrorContext {
        message,
        suggestion: None,
        details: None,
    };

    let Some(err) = error.chain().find_map(|cause| cause.downcast_ref::<BundlebarsError>())
    else {
        return context;
    };

    match err {
        BundlebarsError::TemplateRead {
            ..
        }
        | BundlebarsError::MissingTemplate => context
            .with_suggestion("Check that the template path exists, or pass '-' to read from stdin"),
        BundlebarsError::TemplateStream {
            ..
        } => context.with_details("The input stream closed with an error or was not valid UTF-8"),
        BundlebarsError::ContextLoad {
            path,
            ..
        } => context
            .with_suggestion(format!(
                "Check that '{}' is valid {}",
                path.display(),
                if crate::utils::fs::is_yaml(path) { "YAML" } else { "JSON" }
            ))
            .with_details("A missing context file is allowed; an unreadable or malformed one, or one whose top level is not a mapping, is not"),
        BundlebarsError::InvalidContext {
            ..
        } => context.with_suggestion("Pass the context as a JSON object, e.g. {\"title\": \"Home\"}"),
        BundlebarsError::PartialNotFound {
            name,
            ..
        } => context
            .with_suggestion(format!(
                "Create the partial '{name}' or point --partials at the directory that contains it"
            ))
            .with_details("Partials are looked up as <partials-dir>/<name><partials-ext>; '$0' in the directory is replaced by the partial name"),
        BundlebarsError::HelpersLoad {
            ..
        } => context.with_suggestion("Check the --helpers directory exists and is readable"),
        BundlebarsError::HelperRegistration {
            ..
        } => context.with_details("Every file in the helpers directory is loaded as a rhai script helper"),
        BundlebarsError::CompilerOptions {
            ..
        } => context.with_suggestion(
            "Compiler options are a JSON object, e.g. {\"noEscape\": true, \"strict\": false}",
        ),
        BundlebarsError::Engine(_) => context.with_details(
            "The template engine rejected the template. Check for unclosed blocks, unknown helpers or missing variables in strict mode",
        ),
    }
}
