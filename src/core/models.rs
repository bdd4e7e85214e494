use crate::utils::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Artifact filename written into every component's target folder
pub const ARTIFACT_FILENAME: &str = "component.js";

/// Name under which an artifact exposes its entry module
pub const EXPOSED_ENTRY_NAME: &str = "component";

/// One component declared in the application definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub specification: Option<Specification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Specification {
    #[serde(default)]
    pub source: Option<SourceSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceSpec {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

impl ComponentDescriptor {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    fn source(&self) -> Option<&SourceSpec> {
        self.specification.as_ref()?.source.as_ref()
    }

    /// Declared source language, lowercased. Defaults to javascript.
    pub fn language(&self) -> String {
        self.source()
            .and_then(|s| s.language.as_deref())
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| "javascript".to_string())
    }

    /// Entry file path relative to the source root
    pub fn entry_point(&self) -> Option<&str> {
        self.source()
            .and_then(|s| s.value.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Component type as written in the definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentType {
    PipeAction,
    FieldType,
    BrowserAction,
    Other(String),
}

impl From<String> for ComponentType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pipe-action" => ComponentType::PipeAction,
            "field-type" => ComponentType::FieldType,
            "browser-action" => ComponentType::BrowserAction,
            _ => ComponentType::Other(value),
        }
    }
}

impl From<ComponentType> for String {
    fn from(value: ComponentType) -> Self {
        value.as_str().to_string()
    }
}

impl ComponentType {
    pub fn as_str(&self) -> &str {
        match self {
            ComponentType::PipeAction => "pipe-action",
            ComponentType::FieldType => "field-type",
            ComponentType::BrowserAction => "browser-action",
            ComponentType::Other(other) => other,
        }
    }

    /// The buildable subset of component types
    pub fn buildable(&self) -> Option<BuildableType> {
        match self {
            ComponentType::PipeAction => Some(BuildableType::PipeAction),
            ComponentType::FieldType => Some(BuildableType::FieldType),
            ComponentType::BrowserAction => Some(BuildableType::BrowserAction),
            ComponentType::Other(_) => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildableType {
    PipeAction,
    FieldType,
    BrowserAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Host,
    Browser,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Host => f.write_str("host"),
            Environment::Browser => f.write_str("browser"),
        }
    }
}

/// Source languages the bundler can process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
}

impl SourceLanguage {
    pub fn parse(language: &str) -> Option<Self> {
        match language {
            "js" | "javascript" => Some(SourceLanguage::JavaScript),
            _ => None,
        }
    }
}

/// Everything the pipeline needs to build one component. Immutable once created.
#[derive(Debug, Clone)]
pub struct BuildTarget {
    pub component_id: String,
    pub display_name: String,
    pub kind: BuildableType,
    pub environment: Environment,
    pub language: SourceLanguage,
    pub entry: PathBuf,
    pub component_dir: PathBuf,
    pub output_dir: PathBuf,
    pub artifact_name: &'static str,
}

impl BuildTarget {
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(self.artifact_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub file: PathBuf,
    pub line: usize,
    pub column: usize,
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    /// Offending token, consulted by the ignore policy
    pub detail: Option<String>,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{} {} [{}] {}",
            self.file.display(),
            self.line,
            self.column,
            self.severity,
            self.rule,
            self.message
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct LintReport {
    pub ok: bool,
    pub findings: Vec<LintFinding>,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Script,
    Json,
    Text,
    Stylesheet,
    StylesheetDialect,
}

impl ContentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "cjs" => Some(ContentKind::Script),
            "json" => Some(ContentKind::Json),
            "html" | "xhtml" | "txt" | "hbs" | "xml" => Some(ContentKind::Text),
            "css" => Some(ContentKind::Stylesheet),
            "scss" | "sass" => Some(ContentKind::StylesheetDialect),
            _ => None,
        }
    }
}

/// How a module's dependency specifier is satisfied at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleLink {
    /// Another module in the same artifact, by key
    Internal(String),
    /// Provided by the runtime the artifact is loaded into
    External(String),
}

/// A resolved module in a component's dependency graph
#[derive(Debug, Clone)]
pub struct ModuleNode {
    pub path: PathBuf,
    pub key: String,
    pub kind: ContentKind,
    pub raw: String,
    pub transformed: String,
    pub dependencies: Vec<(String, ModuleLink)>,
}

#[derive(Debug, Clone)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub modules: usize,
    pub size: usize,
}

#[derive(Debug)]
pub struct ComponentReport {
    pub component_id: String,
    pub result: Result<BuildArtifact, BuildError>,
}

#[derive(Debug, Default)]
pub struct BuildSummary {
    pub reports: Vec<ComponentReport>,
    pub skipped: Vec<String>,
    pub build_time: std::time::Duration,
}

impl BuildSummary {
    pub fn success(&self) -> bool {
        self.reports.iter().all(|r| r.result.is_ok())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &BuildArtifact> {
        self.reports.iter().filter_map(|r| r.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &BuildError> {
        self.reports.iter().filter_map(|r| r.result.as_ref().err())
    }
}
