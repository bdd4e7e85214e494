//! Rule profiles for the lint gate.
//!
//! A profile is a plain value assembled from the base rules, the overlay of
//! the component type and the global allowances of the execution environment.
//! Profiles are never mutated after construction, so concurrent component
//! builds can't observe each other's settings.

use crate::core::models::{BuildableType, Environment, LintFinding, Severity};
use std::collections::{BTreeMap, BTreeSet};

pub const SYNTAX_ERROR: &str = "syntax-error";
pub const UNDECLARED_GLOBAL: &str = "undeclared-global";
pub const UNUSED_BINDING: &str = "unused-binding";
pub const MAX_LINE_LENGTH: &str = "max-line-length";
pub const NO_DEBUGGER: &str = "no-debugger";
pub const EQEQEQ: &str = "eqeqeq";
pub const DIRECTIVE_POSITION: &str = "directive-position";
pub const PROPERTY_NAMING: &str = "property-naming";
pub const NO_CONSOLE: &str = "no-console";

const DEFAULT_MAX_LINE_LENGTH: usize = 100;

/// ECMAScript built-ins plus the names every component may use
const BASE_GLOBALS: &[&str] = &[
    "Array", "ArrayBuffer", "Boolean", "DataView", "Date", "Error", "EvalError", "Float32Array",
    "Float64Array", "Function", "Infinity", "Int8Array", "Int16Array", "Int32Array", "Intl",
    "JSON", "Map", "Math", "NaN", "Number", "Object", "Promise", "Proxy", "RangeError",
    "ReferenceError", "Reflect", "RegExp", "Set", "String", "Symbol", "SyntaxError", "TypeError",
    "URIError", "Uint8Array", "Uint8ClampedArray", "Uint16Array", "Uint32Array", "WeakMap",
    "WeakSet", "BigInt", "globalThis", "arguments", "undefined", "decodeURI",
    "decodeURIComponent", "encodeURI", "encodeURIComponent", "isFinite", "isNaN", "parseFloat",
    "parseInt", "setTimeout", "clearTimeout", "setInterval", "clearInterval", "console",
    "module", "exports", "require", "t",
];

const HOST_GLOBALS: &[&str] = &[
    "process", "Buffer", "global", "__dirname", "__filename", "setImmediate", "clearImmediate",
];

const BROWSER_GLOBALS: &[&str] = &["$", "window", "document", "navigator", "location"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleLevel {
    Off,
    Warn,
    Error,
}

impl RuleLevel {
    pub fn severity(self) -> Option<Severity> {
        match self {
            RuleLevel::Off => None,
            RuleLevel::Warn => Some(Severity::Warning),
            RuleLevel::Error => Some(Severity::Error),
        }
    }
}

/// Partial rule settings merged on top of a profile
#[derive(Debug, Clone, Default)]
pub struct RuleOverlay {
    pub levels: Vec<(&'static str, RuleLevel)>,
    pub max_line_length: Option<usize>,
    pub globals: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleProfile {
    levels: BTreeMap<&'static str, RuleLevel>,
    max_line_length: usize,
    globals: BTreeSet<String>,
}

impl RuleProfile {
    /// Rules applied to every component
    pub fn base() -> Self {
        let levels = [
            (SYNTAX_ERROR, RuleLevel::Error),
            (UNDECLARED_GLOBAL, RuleLevel::Error),
            (UNUSED_BINDING, RuleLevel::Warn),
            (MAX_LINE_LENGTH, RuleLevel::Warn),
            (NO_DEBUGGER, RuleLevel::Error),
            (EQEQEQ, RuleLevel::Warn),
            (DIRECTIVE_POSITION, RuleLevel::Error),
            (PROPERTY_NAMING, RuleLevel::Error),
            (NO_CONSOLE, RuleLevel::Off),
        ]
        .into_iter()
        .collect();

        Self {
            levels,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            globals: BASE_GLOBALS.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Profile for a component type executed in the given environment
    pub fn for_component(kind: BuildableType, environment: Environment) -> Self {
        Self::base()
            .merge(&type_overlay(kind))
            .merge(&environment_overlay(environment))
    }

    /// New profile with the overlay applied; overlay values win.
    pub fn merge(&self, overlay: &RuleOverlay) -> Self {
        let mut merged = self.clone();
        for (rule, level) in &overlay.levels {
            merged.levels.insert(*rule, *level);
        }
        if let Some(max) = overlay.max_line_length {
            merged.max_line_length = max;
        }
        merged
            .globals
            .extend(overlay.globals.iter().map(|g| g.to_string()));
        merged
    }

    pub fn level(&self, rule: &str) -> RuleLevel {
        self.levels.get(rule).copied().unwrap_or(RuleLevel::Off)
    }

    pub fn severity(&self, rule: &str) -> Option<Severity> {
        self.level(rule).severity()
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub fn allows_global(&self, name: &str) -> bool {
        self.globals.contains(name)
    }
}

fn type_overlay(kind: BuildableType) -> RuleOverlay {
    match kind {
        BuildableType::PipeAction => RuleOverlay {
            levels: vec![(EQEQEQ, RuleLevel::Error)],
            ..Default::default()
        },
        BuildableType::FieldType => RuleOverlay {
            levels: vec![(NO_CONSOLE, RuleLevel::Warn)],
            ..Default::default()
        },
        BuildableType::BrowserAction => RuleOverlay {
            max_line_length: Some(120),
            ..Default::default()
        },
    }
}

fn environment_overlay(environment: Environment) -> RuleOverlay {
    let globals = match environment {
        Environment::Host => HOST_GLOBALS,
        Environment::Browser => BROWSER_GLOBALS,
    };

    RuleOverlay {
        globals: globals.to_vec(),
        ..Default::default()
    }
}

#[derive(Debug, Clone, Copy)]
enum DetailMatch {
    Exact(&'static str),
    Prefix(&'static str),
}

/// Rule + detail pairs that are accepted by policy
#[derive(Debug, Clone)]
pub struct IgnorePolicy {
    entries: Vec<(&'static str, DetailMatch)>,
}

impl Default for IgnorePolicy {
    fn default() -> Self {
        Self {
            entries: vec![
                (DIRECTIVE_POSITION, DetailMatch::Exact("use strict")),
                (PROPERTY_NAMING, DetailMatch::Prefix("$")),
            ],
        }
    }
}

impl IgnorePolicy {
    pub fn none() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn is_ignored(&self, finding: &LintFinding) -> bool {
        let Some(detail) = finding.detail.as_deref() else {
            return false;
        };

        self.entries.iter().any(|(rule, matcher)| {
            *rule == finding.rule
                && match matcher {
                    DetailMatch::Exact(expected) => detail == *expected,
                    DetailMatch::Prefix(prefix) => detail.starts_with(prefix),
                }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn finding(rule: &str, detail: Option<&str>) -> LintFinding {
        LintFinding {
            file: PathBuf::from("index.js"),
            line: 1,
            column: 1,
            rule: rule.to_string(),
            severity: Severity::Error,
            message: String::new(),
            detail: detail.map(str::to_string),
        }
    }

    #[test]
    fn test_overlay_wins_over_base() {
        let base = RuleProfile::base();
        assert_eq!(base.level(EQEQEQ), RuleLevel::Warn);

        let pipe = RuleProfile::for_component(BuildableType::PipeAction, Environment::Host);
        assert_eq!(pipe.level(EQEQEQ), RuleLevel::Error);

        let browser_action =
            RuleProfile::for_component(BuildableType::BrowserAction, Environment::Host);
        assert_eq!(browser_action.max_line_length(), 120);
        assert_eq!(browser_action.level(EQEQEQ), RuleLevel::Warn);
    }

    #[test]
    fn test_environment_selects_globals() {
        let browser = RuleProfile::for_component(BuildableType::FieldType, Environment::Browser);
        assert!(browser.allows_global("$"));
        assert!(browser.allows_global("require"));
        assert!(!browser.allows_global("process"));

        let host = RuleProfile::for_component(BuildableType::PipeAction, Environment::Host);
        assert!(!host.allows_global("$"));
        assert!(host.allows_global("process"));
        assert!(host.allows_global("t"));
    }

    #[test]
    fn test_profiles_are_independent_values() {
        let first = RuleProfile::for_component(BuildableType::FieldType, Environment::Browser);
        let second = RuleProfile::for_component(BuildableType::PipeAction, Environment::Host);
        let again = RuleProfile::for_component(BuildableType::FieldType, Environment::Browser);

        assert_ne!(first, second);
        assert_eq!(first, again);
        assert!(!RuleProfile::base().allows_global("$"));
    }

    #[test]
    fn test_unknown_rule_is_off() {
        assert_eq!(RuleProfile::base().severity("no-such-rule"), None);
        assert_eq!(RuleProfile::base().severity(NO_CONSOLE), None);
    }

    #[test]
    fn test_ignore_policy() {
        let policy = IgnorePolicy::default();
        assert!(policy.is_ignored(&finding(DIRECTIVE_POSITION, Some("use strict"))));
        assert!(policy.is_ignored(&finding(PROPERTY_NAMING, Some("$scope"))));
        assert!(!policy.is_ignored(&finding(PROPERTY_NAMING, Some("_private"))));
        assert!(!policy.is_ignored(&finding(UNDECLARED_GLOBAL, Some("$"))));
        assert!(!policy.is_ignored(&finding(PROPERTY_NAMING, None)));
        assert!(!IgnorePolicy::none().is_ignored(&finding(DIRECTIVE_POSITION, Some("use strict"))));
    }
}
