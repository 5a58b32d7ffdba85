//! `bundlebars build` with a `Bundlebars.toml` manifest.

use bundlebars::test_utils::TestProject;
use predicates::prelude::*;
use serde_json::Value;

use crate::common::{SITE_INDEX, bundlebars};

const SITE_MANIFEST: &str = r#"
[options]
partials = "partials/$0.hbs"
helpers = "helpers"

[[targets]]
src = ["pages/*.hbs"]
dest = "dist"
data = true

[[targets]]
src = ["pages/index.hbs"]
dest = "dist/bundles"
precompile = true
wrapper = "json-bundle"
"#;

#[test]
fn test_build_site() {
    let project = TestProject::with_site().unwrap();
    project.write("Bundlebars.toml", SITE_MANIFEST).unwrap();

    bundlebars(&project.root)
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 3 file(s)"));

    assert_eq!(project.read("dist/index.html").unwrap(), SITE_INDEX);
    assert_eq!(project.read("dist/about.html").unwrap(), "<h1>About</h1><p>us!</p>");

    let bundle: Value =
        serde_json::from_str(&project.read("dist/bundles/index.json").unwrap()).unwrap();
    assert_eq!(bundle["index"]["source"], "{{> layout}}");
    assert_eq!(bundle["footer"]["source"], r#"<footer>{{var "site-footer"}}</footer>"#);
}

#[test]
fn test_build_with_explicit_manifest_path() {
    let project = TestProject::with_site().unwrap();
    let manifest = SITE_MANIFEST
        .replace("\"pages", "\"../pages")
        .replace("\"partials", "\"../partials")
        .replace("\"helpers", "\"../helpers");
    project.write("site/Bundlebars.toml", &manifest).unwrap();

    bundlebars(&project.root)
        .args(["build", "--manifest", "site/Bundlebars.toml"])
        .assert()
        .success();

    assert_eq!(project.read("site/dist/index.html").unwrap(), SITE_INDEX);
}

#[test]
fn test_build_reports_failures() {
    let project = TestProject::new().unwrap();
    project.write("ok.hbs", "fine").unwrap();
    project.write("broken.hbs", "{{> nowhere}}").unwrap();
    project
        .write("Bundlebars.toml", "[[targets]]\nsrc = [\"*.hbs\"]\ndest = \"out\"\n")
        .unwrap();

    bundlebars(&project.root)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Partial 'nowhere' not found"))
        .stderr(predicate::str::contains("1 template(s) failed, 1 file(s) written"));

    assert_eq!(project.read("out/ok.html").unwrap(), "fine");
}

#[test]
fn test_build_without_manifest_fails() {
    let project = TestProject::new().unwrap();
    bundlebars(&project.root)
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bundlebars.toml"));
}
