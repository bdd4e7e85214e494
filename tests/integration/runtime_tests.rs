use crate::common::{node_available, orchestrator, run_node, write};
use dexi_build::core::ARTIFACT_FILENAME;
use std::path::Path;
use tempfile::tempdir;

const TEMPLATE: &str = "<div class=\"mail\">\n  {{subject}} \\ 'quoted' \u{2028}\n</div>\n";

fn js_path(path: &Path) -> String {
    serde_json::to_string(&path.display().to_string()).unwrap()
}

async fn build_fixture(source: &Path, target: &Path) {
    write(
        &source.join("dexi.yml"),
        r#"
components:
  - id: mailer
    type: pipe-action
    specification:
      source:
        value: mailer/index.js
  - id: picker
    type: field-type
    specification:
      source:
        value: picker/index.js
  - id: cycle
    type: browser-action
    specification:
      source:
        value: cycle/index.js
"#,
    );

    write(
        &source.join("mailer/index.js"),
        "var template = require('./mail.html');\nvar path = require('path');\n\nmodule.exports = function () {\n    return {\n        template: template,\n        sep: path.sep,\n        footer: `<footer>${require('./footer.html')}</footer>`\n    };\n};\n",
    );
    write(&source.join("mailer/mail.html"), TEMPLATE);
    write(&source.join("mailer/footer.html"), "sent");

    write(
        &source.join("picker/index.js"),
        "var options = require('./options.json');\nvar style = require('./picker.scss');\n\nmodule.exports = function () {\n    return { options: options, style: style };\n};\n",
    );
    write(&source.join("picker/options.json"), "[\"red\", \"green\"]");
    write(&source.join("picker/picker.scss"), "$accent: red;\n.picker { color: $accent; }\n");

    write(&source.join("cycle/index.js"), "module.exports = require('./a');\n");
    write(
        &source.join("cycle/a.js"),
        "exports.name = 'a';\nvar b = require('./b');\nexports.seen = b.seenA;\n",
    );
    write(&source.join("cycle/b.js"), "var a = require('./a');\nexports.seenA = a.name;\n");

    let (orchestrator, _) = orchestrator(target);
    let summary = orchestrator.run(source).await.unwrap();
    assert!(summary.success(), "{:?}", summary.reports);
}

#[tokio::test]
async fn test_artifacts_coexist_in_one_runtime() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }

    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    build_fixture(source.path(), target.path()).await;

    let script = format!(
        r#"
require({mailer});
require({picker});
require({cycle});
var components = globalThis.components;
var mail = components["mailer"]("component")();
var picker = components["picker"]("component")();
var cycle = components["cycle"]("component");
process.stdout.write(JSON.stringify({{
  ids: Object.keys(components).sort(),
  template: mail.template,
  sep: mail.sep,
  footer: mail.footer,
  options: picker.options,
  style: picker.style,
  cycle: [cycle.name, cycle.seen],
  sameInstance: components["mailer"]("component") === components["mailer"]("component")
}}));
"#,
        mailer = js_path(&target.path().join("mailer").join(ARTIFACT_FILENAME)),
        picker = js_path(&target.path().join("picker").join(ARTIFACT_FILENAME)),
        cycle = js_path(&target.path().join("cycle").join(ARTIFACT_FILENAME)),
    );

    let output: serde_json::Value = serde_json::from_str(&run_node(&script)).unwrap();

    assert_eq!(output["ids"], serde_json::json!(["cycle", "mailer", "picker"]));
    assert_eq!(output["template"], TEMPLATE);
    assert_eq!(output["sep"], "/");
    assert_eq!(output["footer"], "<footer>sent</footer>");
    assert_eq!(output["options"], serde_json::json!(["red", "green"]));
    assert!(output["style"].as_str().unwrap().contains("color: red"));
    assert_eq!(output["cycle"], serde_json::json!(["a", "a"]));
    assert_eq!(output["sameInstance"], true);
}

#[tokio::test]
async fn test_browser_component_tolerates_missing_externals() {
    if !node_available() {
        eprintln!("node not found, skipping");
        return;
    }

    let source = tempdir().unwrap();
    let target = tempdir().unwrap();
    build_fixture(source.path(), target.path()).await;

    // evaluated without any ambient require, the way a browser loads it
    let script = format!(
        r#"
var fs = require("fs");
var vm = require("vm");
var code = fs.readFileSync({picker}, "utf8");
var sandbox = {{}};
vm.runInNewContext(code, sandbox);
var shim = sandbox.components["picker"]("jquery");
process.stdout.write(JSON.stringify({{
  shim: Object.keys(shim).length,
  globals: Object.keys(sandbox)
}}));
"#,
        picker = js_path(&target.path().join("picker").join(ARTIFACT_FILENAME)),
    );

    let output: serde_json::Value = serde_json::from_str(&run_node(&script)).unwrap();
    assert_eq!(output["shim"], 0);
    assert_eq!(output["globals"], serde_json::json!(["components"]));
}
