//! Helpers shared by the integration tests.

use assert_cmd::Command;
use std::path::Path;

/// The `bundlebars` binary, run from `dir`.
pub fn bundlebars(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("bundlebars").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

/// Expected render of `pages/index.hbs` from [`bundlebars::test_utils::TestProject::with_site`].
pub const SITE_INDEX: &str = "<h1>Home</h1><main><footer>site_footer</footer></main>";
