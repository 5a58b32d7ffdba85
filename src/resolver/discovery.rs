//! Textual scan for partial inclusion markers.
//!
//! Discovery is a pre-scan, not a parse: it finds `{{> name}}`, `{{> 'name'}}`,
//! `{{> "name"}}` and their whitespace-control form (`{{~> name}}`), and ignores markers
//! escaped with a backslash (`\{{> name}}`). Dynamic partials (`{{> (lookup ...)}}`) and
//! the `@partial-block` placeholder have no backing file and are skipped.
//!
//! Block partials (`{{#> name}}fallback{{/name}}`) are not discovered: they render their
//! fallback when the partial is not registered.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PARTIAL_MARKER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\\])\{\{~?>\s*['"]?([^'"\s}~(@][^'"\s}~]*)"#).ok()
});

/// Names of the partials referenced by `text`, unique, in order of first occurrence.
///
/// ```rust
/// use bundlebars::resolver::discover_references;
///
/// let names = discover_references("{{> header}}<main>{{> 'nav'}}{{> header}}</main>");
/// assert_eq!(names, vec!["header", "nav"]);
/// ```
#[must_use]
pub fn discover_references(text: &str) -> Vec<String> {
    let Some(marker) = PARTIAL_MARKER.as_ref() else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    marker
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
