//! `bundlebars compile` and `bundlebars precompile` through the binary.

use bundlebars::test_utils::TestProject;
use predicates::prelude::*;
use serde_json::Value;

use crate::common::{SITE_INDEX, bundlebars};

#[test]
fn test_help() {
    let project = TestProject::new().unwrap();
    bundlebars(&project.root)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("precompile"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn test_compile_to_stdout() {
    let project = TestProject::with_site().unwrap();
    bundlebars(&project.root)
        .args(["compile", "--partials", "partials", "--data", "pages/index.yml", "pages/index.hbs"])
        .assert()
        .success()
        .stdout(SITE_INDEX);
}

#[test]
fn test_compile_with_helpers() {
    let project = TestProject::with_site().unwrap();
    bundlebars(&project.root)
        .args([
            "compile",
            "-p",
            "partials",
            "--helpers",
            "helpers",
            "-d",
            "pages/about.json",
            "pages/about.hbs",
        ])
        .assert()
        .success()
        .stdout("<h1>About</h1><p>us!</p>");
}

#[test]
fn test_compile_without_partials_flag_skips_discovery() {
    let project = TestProject::new().unwrap();
    project.write("plain.hbs", "Hello {{name}}").unwrap();
    project.write("plain.json", r#"{"name": "World"}"#).unwrap();

    bundlebars(&project.root)
        .args(["compile", "-d", "plain.json", "plain.hbs"])
        .assert()
        .success()
        .stdout("Hello World");
}

#[test]
fn test_compile_from_stdin() {
    let project = TestProject::with_site().unwrap();
    bundlebars(&project.root)
        .args(["compile", "--partials", "partials", "--partials-ext", ".hbs", "-d"])
        .arg("pages/index.yml")
        .arg("-")
        .write_stdin("{{> header}}")
        .assert()
        .success()
        .stdout("<h1>Home</h1>");
}

#[test]
fn test_compile_into_out_dir() {
    let project = TestProject::with_site().unwrap();
    bundlebars(&project.root)
        .args(["compile", "-p", "partials", "-d", "pages/index.yml", "-o", "dist"])
        .args(["pages/index.hbs", "-"])
        .write_stdin("<em>{{title}}</em>")
        .assert()
        .success()
        .stdout(predicate::str::contains("Writing result to"))
        .stdout(predicate::str::contains("OK"));

    assert_eq!(project.read("dist/index.hbs").unwrap(), SITE_INDEX);
    assert_eq!(project.read("dist/bb.out").unwrap(), "<em>Home</em>");
}

#[test]
fn test_missing_data_file_renders_empty() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "[{{title}}]").unwrap();

    bundlebars(&project.root)
        .args(["compile", "-d", "nope.yml", "page.hbs"])
        .assert()
        .success()
        .stdout("[]");
}

#[test]
fn test_missing_partial_fails() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "{{> missing}}").unwrap();

    bundlebars(&project.root)
        .args(["compile", "-p", ".", "page.hbs"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Partial 'missing' not found"));
}

#[test]
fn test_one_failing_source_does_not_stop_others() {
    let project = TestProject::new().unwrap();
    project.write("good.hbs", "good").unwrap();
    project.write("bad.hbs", "{{> absent}}").unwrap();

    bundlebars(&project.root)
        .args(["compile", "-p", ".", "-o", "out", "good.hbs", "bad.hbs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 2 template(s) failed"));

    assert_eq!(project.read("out/good.hbs").unwrap(), "good");
    assert!(!project.exists("out/bad.hbs"));
}

#[test]
fn test_options_file_disables_escaping() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "{{html}}").unwrap();
    project.write("data.json", r#"{"html": "<b>bold</b>"}"#).unwrap();
    project.write("options.json", r#"{"noEscape": true}"#).unwrap();

    bundlebars(&project.root)
        .args(["compile", "-d", "data.json", "page.hbs"])
        .assert()
        .success()
        .stdout("&lt;b&gt;bold&lt;/b&gt;");

    bundlebars(&project.root)
        .args(["compile", "--options", "options.json", "-d", "data.json", "page.hbs"])
        .assert()
        .success()
        .stdout("<b>bold</b>");
}

#[test]
fn test_precompile_with_json_wrapper() {
    let project = TestProject::with_site().unwrap();
    let output = bundlebars(&project.root)
        .args(["precompile", "-p", "partials", "--wrapper", "json", "pages/index.hbs"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let bundle: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(bundle["name"], "index");
    assert_eq!(bundle["template"]["source"], "{{> layout}}");
    assert_eq!(bundle["partials"]["header"]["source"], "<h1>{{title}}</h1>");
}

#[test]
fn test_precompile_without_wrapper_emits_artifact() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "{{#if ok}}{{> part}}{{/if}}").unwrap();

    let output = bundlebars(&project.root)
        .args(["precompile", "page.hbs"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let artifact: Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(artifact["source"], "{{#if ok}}{{> part}}{{/if}}");
    assert_eq!(artifact["partials"], serde_json::json!(["part"]));
}

#[test]
fn test_precompile_rejects_malformed_template() {
    let project = TestProject::new().unwrap();
    project.write("broken.hbs", "{{#if}}").unwrap();

    bundlebars(&project.root)
        .args(["precompile", "broken.hbs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.hbs"));
}

#[test]
fn test_non_object_data_file_fails() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "[{{this}}]").unwrap();
    project.write("data.json", r#""raw string""#).unwrap();

    bundlebars(&project.root)
        .args(["compile", "-d", "data.json", "page.hbs"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("raw string").not())
        .stderr(predicate::str::contains("expected a mapping at the top level, found a string"));
}
