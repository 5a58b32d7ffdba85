//! Template source stage.

use tokio::io::AsyncReadExt;
use tracing::debug;

use super::state::{PipelineState, TemplateSource};
use crate::core::{BundlebarsError, Result};
use crate::utils::fs::template_stem;

/// Read the template body into `state`.
///
/// A file template sets `template_filename` and, unless already set, `template_name`
/// to the file stem. A stream template is read to its end and leaves the name empty.
/// When no reference is pending and a body is already present, the state is returned
/// unchanged.
///
/// # Errors
///
/// - [`BundlebarsError::TemplateRead`] if the file cannot be read
/// - [`BundlebarsError::TemplateStream`] if the stream fails or is not UTF-8
/// - [`BundlebarsError::MissingTemplate`] if there is neither a reference nor a body
pub async fn resolve_template(mut state: PipelineState) -> Result<PipelineState> {
    let Some(template) = state.template.take() else {
        if state.template_body.is_some() {
            return Ok(state);
        }
        return Err(BundlebarsError::MissingTemplate);
    };

    let body = match template {
        TemplateSource::Path(path) => {
            if state.template_name.is_empty() {
                state.template_name = template_stem(&path);
            }
            debug!("Reading template from {}", path.display());
            let body = tokio::fs::read_to_string(&path).await.map_err(|source| {
                BundlebarsError::TemplateRead {
                    path: path.clone(),
                    source,
                }
            })?;
            state.template_filename = Some(path);
            body
        }
        TemplateSource::Stream(mut stream) => {
            debug!("Reading template from stream");
            let mut bytes = Vec::new();
            stream
                .read_to_end(&mut bytes)
                .await
                .map_err(|source| BundlebarsError::TemplateStream { source })?;
            String::from_utf8(bytes).map_err(|e| BundlebarsError::TemplateStream {
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?
        }
    };

    state.template_body = Some(body);
    Ok(state)
}
