use crate::core::models::{Environment, ModuleLink, ModuleNode, EXPOSED_ENTRY_NAME};
use crate::infrastructure::processors::AssetProcessor;

/// Render the self-contained artifact for one component.
///
/// `modules` must list dependencies before dependents. The artifact registers
/// a single function under `globalThis.components[<id>]` and defines no other
/// globals. Nothing in the output depends on the build machine or the clock.
pub fn render_artifact(
    component_id: &str,
    environment: Environment,
    entry_key: &str,
    modules: &[&ModuleNode],
) -> String {
    let id = AssetProcessor::string_literal(component_id);
    let entry = AssetProcessor::string_literal(entry_key);

    let mut out = String::with_capacity(
        modules.iter().map(|m| m.transformed.len() + 256).sum::<usize>() + 2048,
    );

    out.push_str(&format!("// dexi component: {}\n", id));
    out.push_str("(function (scope) {\n");
    out.push_str("  var registry = scope.components = scope.components || {};\n");
    out.push_str(&format!("  var previous = registry[{}];\n", id));
    out.push_str("  var hostRequire = typeof require === \"function\" ? require : null;\n");
    out.push_str("  var hasOwn = Object.prototype.hasOwnProperty;\n\n");

    out.push_str("  var definitions = {\n");
    for (i, module) in modules.iter().enumerate() {
        render_definition(&mut out, module);
        out.push_str(if i + 1 < modules.len() { ",\n" } else { "\n" });
    }
    out.push_str("  };\n\n");

    out.push_str(&external_lookup(environment));
    out.push_str(LOADER);

    out.push_str(&format!("  load({});\n\n", entry));
    out.push_str(&format!("  registry[{}] = function (name) {{\n", id));
    out.push_str(&format!(
        "    if (name === {}) {{\n      return load({});\n    }}\n",
        AssetProcessor::string_literal(EXPOSED_ENTRY_NAME),
        entry
    ));
    out.push_str("    return external(name);\n");
    out.push_str("  };\n");
    out.push_str("})(typeof globalThis !== \"undefined\" ? globalThis : this);\n");

    out
}

fn render_definition(out: &mut String, module: &ModuleNode) {
    out.push_str(&format!(
        "    {}: [function (require, module, exports, __filename, __dirname) {{\n",
        AssetProcessor::string_literal(&module.key)
    ));
    out.push_str(&module.transformed);
    if !module.transformed.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("    }, {");

    let links: Vec<String> = module
        .dependencies
        .iter()
        .map(|(specifier, link)| {
            let target = match link {
                ModuleLink::Internal(key) => AssetProcessor::string_literal(key),
                ModuleLink::External(_) => "null".to_string(),
            };
            format!("{}: {}", AssetProcessor::string_literal(specifier), target)
        })
        .collect();
    out.push_str(&links.join(", "));
    out.push_str("}]");
}

/// Names no module in the artifact provides
fn external_lookup(environment: Environment) -> String {
    let missing = match environment {
        Environment::Host => {
            "    throw new Error(\"Cannot find module '\" + name + \"'\");\n"
        }
        // Browser components tolerate absent host modules
        Environment::Browser => "    return {};\n",
    };

    format!(
        "  function external(name) {{\n\
         \x20   if (typeof previous === \"function\") {{\n\
         \x20     return previous(name);\n\
         \x20   }}\n\
         \x20   if (hostRequire) {{\n\
         \x20     return hostRequire(name);\n\
         \x20   }}\n\
         {}  }}\n\n",
        missing
    )
}

const LOADER: &str = r#"  var cache = {};

  function load(key) {
    if (hasOwn.call(cache, key)) {
      return cache[key].exports;
    }
    var definition = definitions[key];
    var module = { exports: {} };
    cache[key] = module;
    var links = definition[1];
    var localRequire = function (name) {
      if (hasOwn.call(links, name)) {
        return links[name] === null ? external(name) : load(links[name]);
      }
      return external(name);
    };
    var slash = key.lastIndexOf("/");
    var dirname = slash > 0 ? key.slice(0, slash) : ".";
    definition[0].call(module.exports, localRequire, module, module.exports, key, dirname);
    return module.exports;
  }

"#;
