//! Wrapper templates applied over precompiled output.
//!
//! A wrapper is an ordinary template rendered with escaping disabled against:
//!
//! | key        | value                                              |
//! |------------|----------------------------------------------------|
//! | `name`     | logical name of the main template                  |
//! | `src`      | precompiled main template                          |
//! | `partials` | list of `{name, src}` with precompiled partials     |
//!
//! Two wrappers ship with the crate:
//!
//! - `json` - one object with `name`, `template` and a `partials` map
//! - `json-bundle` - a flat object mapping every template and partial name to its
//!   artifact, partials first

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::state::TemplateSource;

const JSON_WRAPPER: &str = include_str!("../../wrappers/json.hbs");
const JSON_BUNDLE_WRAPPER: &str = include_str!("../../wrappers/json-bundle.hbs");

/// Wrappers embedded in the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinWrapper {
    /// Single template with its partials
    Json,
    /// Flat name-to-artifact map
    JsonBundle,
}

impl BuiltinWrapper {
    /// All built-in wrappers.
    pub const ALL: [Self; 2] = [Self::Json, Self::JsonBundle];

    /// Name used on the command line.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonBundle => "json-bundle",
        }
    }

    /// Template text of the wrapper.
    pub const fn source(self) -> &'static str {
        match self {
            Self::Json => JSON_WRAPPER,
            Self::JsonBundle => JSON_BUNDLE_WRAPPER,
        }
    }
}

impl fmt::Display for BuiltinWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference to a wrapper: a built-in or a template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperRef {
    /// Embedded wrapper
    Builtin(BuiltinWrapper),
    /// Wrapper template on disk; its directory is the default partials directory
    Path(PathBuf),
}

impl WrapperRef {
    /// Map a built-in name to that wrapper and anything else to a file path.
    pub fn parse(value: &str) -> Self {
        BuiltinWrapper::ALL
            .into_iter()
            .find(|builtin| builtin.name() == value)
            .map_or_else(|| Self::Path(PathBuf::from(value)), Self::Builtin)
    }

    /// Template source the wrapper pass reads from.
    pub fn to_source(&self) -> TemplateSource {
        match self {
            Self::Builtin(builtin) => TemplateSource::stream(builtin.source().as_bytes()),
            Self::Path(path) => TemplateSource::Path(path.clone()),
        }
    }
}

impl FromStr for WrapperRef {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(value))
    }
}

impl From<BuiltinWrapper> for WrapperRef {
    fn from(builtin: BuiltinWrapper) -> Self {
        Self::Builtin(builtin)
    }
}
