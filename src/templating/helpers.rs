//! Built-in helpers and loading of helper modules from disk.
//!
//! Every engine starts with two helpers:
//!
//! - `var` - turns a name into an identifier by replacing `-` with `_`
//!   (`{{var "site-header"}}` renders `site_header`)
//! - `json` - serializes its argument as JSON (`{{{json name}}}` renders `"site-header"`)
//!
//! Further helpers come from a helpers directory. Each file in it is handed to a
//! [`HelperLoader`]; the default [`ScriptHelperLoader`] registers the file as a
//! [rhai](https://rhai.rs) script helper named after the file stem, so
//! `helpers/upper.rhai` provides `{{upper title}}`.

use handlebars::handlebars_helper;
use std::path::Path;

use super::Engine;
use crate::core::BoxError;
use crate::utils::fs::template_stem;

handlebars_helper!(var: |name: str| name.replace('-', "_"));
handlebars_helper!(json: |value: Json| value.to_string());

/// Register the built-in helpers into `engine`.
pub(crate) fn register_builtins(engine: &mut Engine) {
    engine.register_helper("var", Box::new(var));
    engine.register_helper("json", Box::new(json));
}

/// Loads one helper module into an engine.
///
/// Implemented for closures with the same signature, so callers can register helpers
/// from Rust code:
///
/// ```rust,no_run
/// use bundlebars::templating::{Engine, HelperLoader};
/// use std::path::Path;
///
/// handlebars::handlebars_helper!(upper: |s: str| s.to_uppercase());
///
/// let loader = |_: &Path, engine: &mut Engine| -> Result<(), bundlebars::core::BoxError> {
///     engine.register_helper("upper", Box::new(upper));
///     Ok(())
/// };
/// ```
pub trait HelperLoader: Send + Sync {
    /// Register the helpers defined by the module at `path`.
    fn load(&self, path: &Path, engine: &mut Engine) -> Result<(), BoxError>;
}

impl<F> HelperLoader for F
where
    F: Fn(&Path, &mut Engine) -> Result<(), BoxError> + Send + Sync,
{
    fn load(&self, path: &Path, engine: &mut Engine) -> Result<(), BoxError> {
        self(path, engine)
    }
}

/// Registers each helper file as a rhai script helper named after its file stem.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptHelperLoader;

impl HelperLoader for ScriptHelperLoader {
    fn load(&self, path: &Path, engine: &mut Engine) -> Result<(), BoxError> {
        let name = template_stem(path);
        engine.register_script_helper_file(&name, path)?;
        Ok(())
    }
}
