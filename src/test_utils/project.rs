//! Temporary template projects for tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding templates, partials, data and helpers.
///
/// The directory is removed when the project is dropped.
pub struct TestProject {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestProject {
    /// Create an empty project.
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().to_path_buf();
        Ok(Self {
            temp_dir,
            root,
        })
    }

    /// A small site: a page with nested partials, YAML and JSON data, and a helper.
    ///
    /// ```text
    /// pages/index.hbs          {{> layout}}
    /// pages/index.yml          title: Home
    /// pages/about.hbs          {{> header}}<p>{{shout about}}</p>
    /// pages/about.json         {"title": "About", "about": "us"}
    /// partials/layout.hbs      {{> header}}<main>{{> footer}}</main>
    /// partials/header.hbs      <h1>{{title}}</h1>
    /// partials/footer.hbs      <footer>{{var "site-footer"}}</footer>
    /// helpers/shout.rhai
    /// ```
    pub fn with_site() -> Result<Self> {
        let project = Self::new()?;
        project.write("pages/index.hbs", "{{> layout}}")?;
        project.write("pages/index.yml", "title: Home\n")?;
        project.write("pages/about.hbs", "{{> header}}<p>{{shout about}}</p>")?;
        project.write("pages/about.json", r#"{"title": "About", "about": "us"}"#)?;
        project.write("partials/layout.hbs", "{{> header}}<main>{{> footer}}</main>")?;
        project.write("partials/header.hbs", "<h1>{{title}}</h1>")?;
        project.write("partials/footer.hbs", r#"<footer>{{var "site-footer"}}</footer>"#)?;
        project.write("helpers/shout.rhai", "params[0] + \"!\"")?;
        Ok(project)
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Write a file, creating parent directories.
    pub fn write(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Read a file of the project.
    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Whether a file exists in the project.
    pub fn exists(&self, relative: impl AsRef<Path>) -> bool {
        self.path(relative).exists()
    }
}
