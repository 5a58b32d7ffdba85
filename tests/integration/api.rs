//! End-to-end tests through the library API.

use bundlebars::config::BundlerConfig;
use bundlebars::core::ErrorKind;
use bundlebars::pipeline::{BuiltinWrapper, Bundler, ContextSource, TemplateSource, WrapperRef};
use bundlebars::templating::Engine;
use bundlebars::test_utils::TestProject;
use serde_json::{Value, json};

use crate::common::SITE_INDEX;

fn site_bundler(project: &TestProject) -> Bundler {
    Bundler::new(
        BundlerConfig::default()
            .with_partials_dir(project.path("partials"))
            .with_helpers_dir(project.path("helpers")),
    )
}

#[tokio::test]
async fn test_compile_nested_partials_with_yaml_data() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = site_bundler(&project);

    let html = bundler
        .compile(project.path("pages/index.hbs"), Some(project.path("pages/index.yml").into()))
        .await
        .unwrap();

    assert_eq!(html, SITE_INDEX);
}

#[tokio::test]
async fn test_compile_with_script_helper_and_json_data() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = site_bundler(&project);

    let html = bundler
        .compile(project.path("pages/about.hbs"), Some(project.path("pages/about.json").into()))
        .await
        .unwrap();

    assert_eq!(html, "<h1>About</h1><p>us!</p>");
    assert!(bundler.engine().has_helper("shout"));
}

#[tokio::test]
async fn test_one_bundler_serves_many_templates() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = site_bundler(&project);

    let index = bundler
        .compile(project.path("pages/index.hbs"), Some(json!({"title": "Home"}).into()))
        .await
        .unwrap();
    let about = bundler
        .compile(project.path("pages/about.hbs"), Some(json!({"title": "A", "about": "b"}).into()))
        .await
        .unwrap();

    assert_eq!(index, SITE_INDEX);
    assert_eq!(about, "<h1>A</h1><p>b!</p>");
}

#[tokio::test]
async fn test_stream_template_uses_configured_partials() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = Bundler::new(
        BundlerConfig::default()
            .with_partials_dir(project.path("partials"))
            .with_partials_ext(".hbs"),
    );

    let html = bundler
        .compile(
            TemplateSource::text("{{> header}}!"),
            Some(ContextSource::Value(json!({"title": "Streamed"}))),
        )
        .await
        .unwrap();

    assert_eq!(html, "<h1>Streamed</h1>!");
}

#[tokio::test]
async fn test_partials_default_to_template_directory() {
    let project = TestProject::new().unwrap();
    project.write("views/page.html", "[{{> item}}]").unwrap();
    project.write("views/item.html", "{{> leaf}}-item").unwrap();
    project.write("views/leaf.html", "leaf").unwrap();

    let mut bundler = Bundler::default();
    let html = bundler.compile(project.path("views/page.html"), None).await.unwrap();

    assert_eq!(html, "[leaf-item]");
    assert_eq!(bundler.config().partials_ext.as_deref(), Some(".html"));
}

#[tokio::test]
async fn test_missing_nested_partial_fails() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "{{> outer}}").unwrap();
    project.write("outer.hbs", "{{> missing}}").unwrap();

    let mut bundler = Bundler::default();
    let err = bundler.compile(project.path("page.hbs"), None).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PartialNotFound);
    assert!(err.to_string().contains("Partial 'missing' not found"));
}

#[tokio::test]
async fn test_precompiled_artifacts_render_at_runtime() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = site_bundler(&project);

    let bundle = bundler
        .precompile(
            project.path("pages/index.hbs"),
            Some(WrapperRef::Builtin(BuiltinWrapper::Json)),
        )
        .await
        .unwrap();
    let bundle: Value = serde_json::from_str(&bundle).unwrap();

    assert_eq!(bundle["name"], "index");
    let partials = bundle["partials"].as_object().unwrap();
    for name in ["layout", "header", "footer"] {
        assert!(partials.contains_key(name), "missing partial {name}");
    }

    let mut runtime = Engine::default();
    for (name, artifact) in partials {
        runtime.register_precompiled_partial(name, &artifact.to_string()).unwrap();
    }
    runtime.register_precompiled("index", &bundle["template"].to_string()).unwrap();

    let html = runtime.render("index", &json!({"title": "Home"})).unwrap();
    assert_eq!(html, SITE_INDEX);
}

#[tokio::test]
async fn test_json_bundle_is_flat_object() {
    let project = TestProject::with_site().unwrap();
    let mut bundler = site_bundler(&project);

    let bundle = bundler
        .precompile(project.path("pages/index.hbs"), Some(WrapperRef::parse("json-bundle")))
        .await
        .unwrap();
    let bundle: Value = serde_json::from_str(&bundle).unwrap();

    let object = bundle.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, ["footer", "header", "index", "layout"]);
    assert_eq!(object["index"]["source"], "{{> layout}}");
}

#[tokio::test]
async fn test_custom_wrapper_file() {
    let project = TestProject::new().unwrap();
    project.write("page.hbs", "{{> part}}").unwrap();
    project.write("part.hbs", "x").unwrap();
    let wrapper = project
        .write("wrap.tpl", "{{name}}:{{#each partials}}{{name}},{{/each}}")
        .unwrap();

    let mut bundler = Bundler::default();
    let result = bundler
        .precompile(project.path("page.hbs"), Some(WrapperRef::Path(wrapper)))
        .await
        .unwrap();

    assert_eq!(result, "page:part,");
}
