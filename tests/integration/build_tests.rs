use crate::common::{orchestrator, write};
use dexi_build::core::ARTIFACT_FILENAME;
use dexi_build::BuildError;
use tempfile::tempdir;

const DEFINITION: &str = r#"
components:
  - id: mailer
    name: Mailer
    type: pipe-action
    specification:
      source:
        language: JavaScript
        value: mailer/index.js
  - id: broken
    type: pipe-action
    specification:
      source:
        value: broken/index.js
  - id: readme
    type: documentation
    specification:
      source:
        value: readme/index.js
"#;

fn clean_component(root: &std::path::Path, name: &str) {
    write(
        &root.join(name).join("index.js"),
        "var template = require('./view.hbs');\n\nmodule.exports = function () {\n    return template;\n};\n",
    );
    write(&root.join(name).join("view.hbs"), "<p>{{greeting}}</p>\n");
}

#[tokio::test]
async fn test_lint_failure_does_not_stop_siblings() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write(&source.path().join("dexi.yml"), DEFINITION);
    clean_component(source.path(), "mailer");
    write(
        &source.path().join("broken/index.js"),
        "module.exports = function () {\n    debugger;\n};\n",
    );
    write(&source.path().join("readme/index.js"), "this is not javascript");

    let (orchestrator, _) = orchestrator(target.path());
    let summary = orchestrator.run(source.path()).await.unwrap();

    assert!(!summary.success());
    assert_eq!(summary.skipped, vec!["readme".to_string()]);
    assert_eq!(summary.reports.len(), 2);

    let mailer = &summary.reports[0];
    assert_eq!(mailer.component_id, "mailer");
    let artifact = mailer.result.as_ref().unwrap();
    assert_eq!(artifact.path, target.path().join("mailer").join(ARTIFACT_FILENAME));
    assert!(artifact.path.is_file());

    match &summary.reports[1].result {
        Err(BuildError::LintFailed { component, errors, .. }) => {
            assert_eq!(component, "broken");
            assert_eq!(*errors, 1);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!target.path().join("broken").exists());
    assert!(!target.path().join("readme").exists());
}

#[tokio::test]
async fn test_skip_lint_bundles_anyway() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write(&source.path().join("dexi.yml"), DEFINITION);
    clean_component(source.path(), "mailer");
    write(
        &source.path().join("broken/index.js"),
        "module.exports = function () {\n    debugger;\n};\n",
    );

    let (orchestrator, _) = orchestrator(target.path());
    let summary = orchestrator.without_lint().run(source.path()).await.unwrap();

    assert!(summary.success());
    assert!(target.path().join("broken").join(ARTIFACT_FILENAME).is_file());
}

#[tokio::test]
async fn test_missing_entry_creates_no_artifact() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write(&source.path().join("dexi.yml"), DEFINITION);
    clean_component(source.path(), "mailer");

    let (orchestrator, _) = orchestrator(target.path());
    let summary = orchestrator.run(source.path()).await.unwrap();

    match &summary.reports[1].result {
        Err(BuildError::EntryNotFound { component, path }) => {
            assert_eq!(component, "broken");
            assert!(path.ends_with("broken/index.js"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!target.path().join("broken").exists());
    assert!(target.path().join("mailer").join(ARTIFACT_FILENAME).is_file());
}

#[tokio::test]
async fn test_repeated_builds_are_identical() {
    let source = tempdir().unwrap();
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write(
        &source.path().join("dexi.yaml"),
        "components:\n  - id: mailer\n    type: pipe-action\n    specification:\n      source:\n        value: mailer/index.js\n",
    );
    clean_component(source.path(), "mailer");
    write(&source.path().join("mailer/lib/format.js"), "module.exports = require('../data.json');\n");
    write(&source.path().join("mailer/data.json"), "{\"subject\": \"hi\"}\n");
    write(
        &source.path().join("mailer/index.js"),
        "var template = require('./view.hbs');\nvar format = require('./lib/format');\n\nmodule.exports = function () {\n    return [template, format];\n};\n",
    );

    let (orchestrator, _) = orchestrator(first.path());
    orchestrator.run(source.path()).await.unwrap();
    orchestrator.run(source.path()).await.unwrap();
    let once = std::fs::read(first.path().join("mailer").join(ARTIFACT_FILENAME)).unwrap();

    let (orchestrator, _) = crate::common::orchestrator(second.path());
    orchestrator.run(source.path()).await.unwrap();
    let twice = std::fs::read(second.path().join("mailer").join(ARTIFACT_FILENAME)).unwrap();

    assert_eq!(once, twice);
    let text = String::from_utf8(once).unwrap();
    assert!(!text.contains(&source.path().display().to_string()));
}

#[tokio::test]
async fn test_manifest_triggers_exactly_one_install() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write(
        &source.path().join("dexi.yml"),
        r#"
components:
  - id: with-deps
    type: pipe-action
    specification:
      source:
        value: with-deps/index.js
  - id: without-deps
    type: browser-action
    specification:
      source:
        value: without-deps/index.js
"#,
    );
    clean_component(source.path(), "with-deps");
    clean_component(source.path(), "without-deps");
    write(
        &source.path().join("with-deps/package.json"),
        "{\"name\": \"with-deps\", \"dependencies\": {}}",
    );

    let (orchestrator, installer) = orchestrator(target.path());
    let summary = orchestrator.run(source.path()).await.unwrap();

    assert!(summary.success(), "{:?}", summary.reports);
    let calls = installer.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].ends_with("with-deps"));
}

#[tokio::test]
async fn test_malformed_definition_is_fatal() {
    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    write(&source.path().join("dexi.yml"), "components: [unclosed");

    let (orchestrator, _) = orchestrator(target.path());
    let err = orchestrator.run(source.path()).await.unwrap_err();

    assert!(matches!(err, BuildError::DefinitionMalformed { .. }));
    assert!(err.is_fatal());
}
