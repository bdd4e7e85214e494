use std::path::PathBuf;
use thiserror::Error;

/// Location of a failure inside a component's source tree
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub specifier: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_specifier(mut self, specifier: &str) -> Self {
        self.specifier = Some(specifier.to_string());
        self
    }
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("No dexi.yml or dexi.yaml found in source folder {}", .source_root.display())]
    DefinitionNotFound { source_root: PathBuf },

    #[error("Malformed definition {}: {message}", .path.display())]
    DefinitionMalformed { path: PathBuf, message: String },

    #[error("No source file specified for component: {component}")]
    MissingEntryPoint { component: String },

    #[error("Source file not found for component {component}: {}", .path.display())]
    EntryNotFound { component: String, path: PathBuf },

    #[error("Component {component} failed linting verification ({errors} errors, {warnings} warnings)")]
    LintFailed {
        component: String,
        errors: usize,
        warnings: usize,
    },

    #[error("Dependency install failed for component {component} in {}: {reason}", .directory.display())]
    DependencyInstallFailed {
        component: String,
        directory: PathBuf,
        reason: String,
    },

    #[error("Bundling failed for component {component}: {message}")]
    BundleFailed {
        component: String,
        message: String,
        context: Option<ErrorContext>,
    },

    #[error("Component id {component:?} cannot be used as an output folder name")]
    InvalidComponentId { component: String },

    #[error("Unsupported language: {language} for component: {component}")]
    UnsupportedLanguage { component: String, language: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn bundle(component: &str, message: String) -> Self {
        Self::BundleFailed {
            component: component.to_string(),
            message,
            context: None,
        }
    }

    pub fn bundle_with_context(component: &str, message: String, context: ErrorContext) -> Self {
        Self::BundleFailed {
            component: component.to_string(),
            message,
            context: Some(context),
        }
    }

    /// Definition errors stop the run before any component is processed.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BuildError::DefinitionNotFound { .. } | BuildError::DefinitionMalformed { .. }
        )
    }

    /// Component the error is scoped to, if any
    pub fn component(&self) -> Option<&str> {
        match self {
            BuildError::MissingEntryPoint { component }
            | BuildError::InvalidComponentId { component }
            | BuildError::EntryNotFound { component, .. }
            | BuildError::LintFailed { component, .. }
            | BuildError::DependencyInstallFailed { component, .. }
            | BuildError::BundleFailed { component, .. }
            | BuildError::UnsupportedLanguage { component, .. } => Some(component),
            _ => None,
        }
    }

    /// Format error with file context for terminal display
    pub fn format_detailed(&self) -> String {
        let mut output = format!("❌ {}", self);

        if let BuildError::BundleFailed {
            context: Some(ctx), ..
        } = self
        {
            if let Some(ref file_path) = ctx.file_path {
                output.push_str(&format!("\n   📁 File: {}", file_path.display()));
            }

            if let (Some(line), Some(column)) = (ctx.line, ctx.column) {
                output.push_str(&format!("\n   📍 Location: line {}, column {}", line, column));
            }

            if let Some(ref specifier) = ctx.specifier {
                output.push_str(&format!("\n   🔗 Specifier: {}", specifier));
            }
        }

        output
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
