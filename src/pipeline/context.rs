//! Context source stage.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::state::{ContextSource, PipelineState};
use crate::core::{BundlebarsError, Result};
use crate::utils::fs::is_yaml;

/// Resolve `state.context_ref` into `state.context`.
///
/// - no reference: `{}`
/// - data: used as is (`null` becomes `{}`)
/// - path: parsed as YAML for `.yml`/`.yaml`, JSON otherwise; a missing file yields `{}`
///
/// The resolved context is always an object.
///
/// # Errors
///
/// - [`BundlebarsError::ContextLoad`] if the file exists but cannot be read, cannot be
///   parsed, or does not hold a mapping
/// - [`BundlebarsError::InvalidContext`] if in-memory data is not an object
pub async fn resolve_context(mut state: PipelineState) -> Result<PipelineState> {
    if let Some(source) = state.context_ref.take() {
        let (context, filename) = load_context(source).await?;
        state.context = context;
        if filename.is_some() {
            state.context_filename = filename;
        }
    } else if state.context.is_null() {
        state.context = empty();
    }
    Ok(state)
}

/// Load a context without a surrounding state; returns the data and the file it came from.
pub(crate) async fn load_context(source: ContextSource) -> Result<(Value, Option<PathBuf>)> {
    match source {
        ContextSource::Value(Value::Null) => Ok((empty(), None)),
        ContextSource::Value(value @ Value::Object(_)) => Ok((value, None)),
        ContextSource::Value(other) => Err(BundlebarsError::InvalidContext {
            found: value_kind(&other),
        }),
        ContextSource::Path(path) => {
            let context = read_context_file(&path).await?;
            Ok((context, Some(path)))
        }
    }
}

async fn read_context_file(path: &Path) -> Result<Value> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Context file {} not found, using empty context", path.display());
            return Ok(empty());
        }
        Err(e) => {
            return Err(BundlebarsError::ContextLoad {
                path: path.to_path_buf(),
                source: Box::new(e),
            });
        }
    };

    debug!("Loaded context from {}", path.display());

    let parsed: std::result::Result<Value, crate::core::BoxError> = if is_yaml(path) {
        serde_yaml::from_str(&content).map_err(Into::into)
    } else {
        serde_json::from_str(&content).map_err(Into::into)
    };

    match parsed {
        Ok(Value::Null) => Ok(empty()),
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(BundlebarsError::ContextLoad {
            path: path.to_path_buf(),
            source: format!("expected a mapping at the top level, found {}", value_kind(&other)).into(),
        }),
        Err(source) => Err(BundlebarsError::ContextLoad {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
