use crate::core::models::*;
use crate::core::rules::RuleProfile;
use crate::utils::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Outcome of resolving a dependency specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A file on disk, canonicalized
    File(PathBuf),
    /// A host runtime built-in, provided outside the artifact
    Builtin(String),
    NotFound,
}

/// Module resolution algorithm used by the bundler
pub trait ModuleResolver: Send + Sync {
    fn resolve(&self, specifier: &str, from: &Path) -> Result<Resolution>;
}

/// Static analysis engine run by the lint gate, one file at a time
pub trait SourceLinter: Send + Sync {
    fn lint(&self, file: &Path, source: &str, profile: &RuleProfile) -> Vec<LintFinding>;
}

/// Provisions third-party dependencies into a component directory
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    async fn install(&self, directory: &Path) -> anyhow::Result<()>;
}
