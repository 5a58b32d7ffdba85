//! Recursive partial resolution.
//!
//! Given the body of a template, [`resolve_partials`] finds every partial the template
//! references directly or through other partials, fetches each one exactly once, and
//! returns them in registration order.
//!
//! # Algorithm
//!
//! The resolver is a worklist over two sets:
//!
//! - `pending` - names discovered but not fetched yet
//! - `done` - names already fetched; never queued again
//!
//! Resolution proceeds breadth-first in levels. All names pending at one level are
//! fetched concurrently; results are collected in discovery order regardless of which
//! fetch completes first. Once a level is complete its names move to `done`, and the
//! fetched sources are scanned for names that are neither done nor pending, forming
//! the next level. Resolution ends when a scan finds nothing new, which also makes
//! reference cycles terminate.
//!
//! The first failing fetch fails the whole resolution; sibling fetches of that level
//! are dropped.
//!
//! # Ordering
//!
//! The discovery list (root's direct partials first, deeper partials later) is reversed
//! before it is returned, so a chain `page -> a -> b -> c` registers as `[c, b, a]`.
//! Reversal is not a full topological sort: a partial reached both directly from the
//! root and through a deeper partial keeps the position of its first discovery. This
//! does not affect rendering, since partials are looked up by name at render time.
//!
//! ```rust,no_run
//! use bundlebars::resolver::resolve_partials;
//!
//! # async fn example() -> std::io::Result<()> {
//! let partials = resolve_partials("{{> header}}", |name| async move {
//!     tokio::fs::read_to_string(format!("partials/{name}.hbs")).await
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

mod discovery;

pub use discovery::discover_references;

use futures::future::try_join_all;
use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, trace};

use crate::templating::PartialEntry;

/// Resolve every partial transitively referenced by `root`.
///
/// `fetch` is called once per distinct partial name and returns its source.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn resolve_partials<F, Fut, E>(root: &str, mut fetch: F) -> Result<Vec<PartialEntry>, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, E>>,
{
    let mut done: HashSet<String> = HashSet::new();
    let mut discovered: Vec<PartialEntry> = Vec::new();
    let mut pending: Vec<String> = discover_references(root);
    let mut level = 0usize;

    while !pending.is_empty() {
        level += 1;
        debug!("Resolving {} partial(s) at level {}: {:?}", pending.len(), level, pending);

        let fetches = pending.iter().map(|name| {
            trace!("Fetching partial '{}'", name);
            let source = fetch(name.clone());
            let name = name.clone();
            async move { source.await.map(|src| PartialEntry::new(name, src)) }
        });
        let fetched = try_join_all(fetches).await?;

        done.extend(pending.drain(..));

        for entry in &fetched {
            for name in discover_references(&entry.src) {
                if !done.contains(&name) && !pending.contains(&name) {
                    pending.push(name);
                }
            }
        }

        discovered.extend(fetched);
    }

    discovered.reverse();
    debug!("Resolved {} partial(s)", discovered.len());
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// In-memory partial store that counts fetches per name.
    #[derive(Clone, Default)]
    struct Store {
        sources: Arc<HashMap<String, String>>,
        delays: Arc<HashMap<String, u64>>,
        fetches: Arc<Mutex<Vec<String>>>,
    }

    impl Store {
        fn new(sources: &[(&str, &str)]) -> Self {
            Self {
                sources: Arc::new(
                    sources.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
                ),
                ..Self::default()
            }
        }

        fn with_delays(mut self, delays: &[(&str, u64)]) -> Self {
            self.delays = Arc::new(delays.iter().map(|(k, v)| ((*k).to_string(), *v)).collect());
            self
        }

        fn fetch(&self, name: String) -> impl Future<Output = Result<String, String>> + use<> {
            let store = self.clone();
            async move {
                store.fetches.lock().unwrap().push(name.clone());
                if let Some(ms) = store.delays.get(&name) {
                    tokio::time::sleep(Duration::from_millis(*ms)).await;
                }
                store.sources.get(&name).cloned().ok_or_else(|| format!("missing {name}"))
            }
        }

        fn fetch_count(&self, name: &str) -> usize {
            self.fetches.lock().unwrap().iter().filter(|n| *n == name).count()
        }

        fn total_fetches(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    fn names(entries: &[PartialEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_no_references() {
        let store = Store::new(&[]);
        let result = resolve_partials("<p>{{title}}</p>", |n| store.fetch(n)).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(store.total_fetches(), 0);
    }

    #[tokio::test]
    async fn test_chain_registers_leaves_first() {
        let store = Store::new(&[("a", "A{{> b}}"), ("b", "B{{> c}}"), ("c", "C")]);
        let result = resolve_partials("{{> a}}", |n| store.fetch(n)).await.unwrap();

        assert_eq!(names(&result), vec!["c", "b", "a"]);
        assert_eq!(result[0].src, "C");
    }

    #[tokio::test]
    async fn test_repeated_reference_fetched_once() {
        let store = Store::new(&[("item", "<li>{{this}}</li>")]);
        let root = "{{> item}}{{> item}}\n{{#each xs}}{{> item}}{{/each}}";
        let result = resolve_partials(root, |n| store.fetch(n)).await.unwrap();

        assert_eq!(names(&result), vec!["item"]);
        assert_eq!(store.fetch_count("item"), 1);
    }

    #[tokio::test]
    async fn test_shared_dependency_fetched_once() {
        let store = Store::new(&[
            ("header", "{{> logo}}{{> nav}}"),
            ("footer", "{{> logo}}"),
            ("nav", "{{> logo}}"),
            ("logo", "LOGO"),
        ]);
        let result =
            resolve_partials("{{> header}}{{> footer}}", |n| store.fetch(n)).await.unwrap();

        assert_eq!(names(&result), vec!["nav", "logo", "footer", "header"]);
        for name in ["header", "footer", "nav", "logo"] {
            assert_eq!(store.fetch_count(name), 1, "{name} fetched more than once");
        }
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let store = Store::new(&[("a", "{{> b}}"), ("b", "{{> a}}{{> b}}")]);
        let result = resolve_partials("{{> a}}", |n| store.fetch(n)).await.unwrap();

        assert_eq!(names(&result), vec!["b", "a"]);
        assert_eq!(store.total_fetches(), 2);
    }

    #[tokio::test]
    async fn test_root_self_name_not_special() {
        let store = Store::new(&[("page", "inner")]);
        let result = resolve_partials("{{> page}}", |n| store.fetch(n)).await.unwrap();
        assert_eq!(names(&result), vec!["page"]);
    }

    #[tokio::test]
    async fn test_order_independent_of_completion_timing() {
        let sources = [("slow", "{{> deep}}"), ("fast", "F"), ("deep", "D")];
        let root = "{{> slow}}{{> fast}}";

        let slow_first = Store::new(&sources).with_delays(&[("slow", 30)]);
        let fast_first = Store::new(&sources).with_delays(&[("fast", 30)]);

        let a = resolve_partials(root, |n| slow_first.fetch(n)).await.unwrap();
        let b = resolve_partials(root, |n| fast_first.fetch(n)).await.unwrap();

        assert_eq!(names(&a), vec!["deep", "fast", "slow"]);
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_siblings_fetched_concurrently() {
        let store = Store::new(&[("a", "A"), ("b", "B"), ("c", "C")])
            .with_delays(&[("a", 100), ("b", 100), ("c", 100)]);

        let started = tokio::time::Instant::now();
        resolve_partials("{{> a}}{{> b}}{{> c}}", |n| store.fetch(n)).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_missing_partial_fails_resolution() {
        let store = Store::new(&[("a", "{{> gone}}")]);
        let err = resolve_partials("{{> a}}", |n| store.fetch(n)).await.unwrap_err();
        assert_eq!(err, "missing gone");
    }

    #[tokio::test]
    async fn test_failure_drops_slow_siblings() {
        let store = Store::new(&[("slow", "{{> never}}")]).with_delays(&[("slow", 50)]);
        let err =
            resolve_partials("{{> slow}}{{> broken}}", |n| store.fetch(n)).await.unwrap_err();

        assert_eq!(err, "missing broken");
        assert_eq!(store.fetch_count("never"), 0);
    }
}
