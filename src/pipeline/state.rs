//! State threaded through the stages of one pipeline invocation.

use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;

use super::wrappers::WrapperRef;
use crate::templating::PartialEntry;

/// Byte source a template can be read from.
pub type TemplateStream = Box<dyn AsyncRead + Send + Unpin>;

/// Where the template body comes from.
pub enum TemplateSource {
    /// A template file; its stem becomes the template name
    Path(PathBuf),
    /// A byte stream read to its end; the template name is empty
    Stream(TemplateStream),
}

impl TemplateSource {
    /// Wrap any async reader as a template source.
    pub fn stream(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::Stream(Box::new(reader))
    }

    /// Template held in memory, read like a stream.
    pub fn text(text: impl Into<String>) -> Self {
        Self::stream(std::io::Cursor::new(text.into().into_bytes()))
    }
}

impl fmt::Debug for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<PathBuf> for TemplateSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for TemplateSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for TemplateSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Where the render context comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextSource {
    /// Data supplied directly
    Value(Value),
    /// JSON or YAML file, selected by extension; a missing file yields `{}`
    Path(PathBuf),
}

impl From<Value> for ContextSource {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<PathBuf> for ContextSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ContextSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ContextSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

/// Record carried through every stage of a compile or precompile call.
///
/// Each stage consumes the state and returns it with its own fields filled in. Fields a
/// stage does not own are passed through untouched, including [`extensions`], which
/// callers may use to carry their own data across a run.
///
/// [`extensions`]: PipelineState::extensions
#[derive(Debug)]
pub struct PipelineState {
    /// Template reference not read yet
    pub template: Option<TemplateSource>,
    /// Template file path, when the template came from a file
    pub template_filename: Option<PathBuf>,
    /// Logical template name: file stem, or empty for streams
    pub template_name: String,
    /// Full template text
    pub template_body: Option<String>,
    /// Context reference not resolved yet
    pub context_ref: Option<ContextSource>,
    /// Context file path, when the context came from a file
    pub context_filename: Option<PathBuf>,
    /// Resolved context; `{}` until resolution says otherwise
    pub context: Value,
    /// Partials of this template in registration order, or their precompiled forms
    pub partials: Vec<PartialEntry>,
    /// Wrapper applied after precompilation
    pub wrapper: Option<WrapperRef>,
    /// Final output
    pub result: Option<String>,
    /// Caller data passed through unchanged
    pub extensions: Map<String, Value>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            template: None,
            template_filename: None,
            template_name: String::new(),
            template_body: None,
            context_ref: None,
            context_filename: None,
            context: Value::Object(Map::new()),
            partials: Vec::new(),
            wrapper: None,
            result: None,
            extensions: Map::new(),
        }
    }
}

impl PipelineState {
    /// Fresh state for `template`.
    pub fn new(template: impl Into<TemplateSource>) -> Self {
        Self {
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Fresh state whose template text is already known.
    pub fn from_body(body: impl Into<String>) -> Self {
        Self {
            template_body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Set the context reference.
    #[must_use]
    pub fn with_context(mut self, context: Option<ContextSource>) -> Self {
        self.context_ref = context;
        self
    }

    /// Set the wrapper reference.
    #[must_use]
    pub fn with_wrapper(mut self, wrapper: Option<WrapperRef>) -> Self {
        self.wrapper = wrapper;
        self
    }

    /// Set an extension field.
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Final output, empty if no stage produced one.
    pub fn into_result(self) -> String {
        self.result.unwrap_or_default()
    }
}
