// Component bundler: dependency graph, asset transforms and the artifact runtime
pub mod graph;
pub mod runtime;

pub use graph::*;
pub use runtime::*;

use crate::core::interfaces::ModuleResolver;
use crate::core::models::{BuildArtifact, BuildTarget};
use crate::infrastructure::processors::AssetProcessor;
use crate::infrastructure::{NodeModuleResolver, TokioFileSystemService};
use crate::utils::{BuildError, Logger, Result, Timer};
use std::sync::Arc;

pub struct ModuleBundler {
    resolver: Option<Arc<dyn ModuleResolver>>,
    assets: AssetProcessor,
    fs: TokioFileSystemService,
}

impl Default for ModuleBundler {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleBundler {
    pub fn new() -> Self {
        Self {
            resolver: None,
            assets: AssetProcessor::new(),
            fs: TokioFileSystemService,
        }
    }

    /// Use `resolver` for every target instead of the per-environment default
    pub fn with_resolver(mut self, resolver: Arc<dyn ModuleResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Bundle `target` into `<output_dir>/component.js`.
    ///
    /// The artifact is rendered completely before anything is written, so a
    /// failed bundle leaves the target folder untouched.
    pub async fn bundle(&self, target: &BuildTarget) -> Result<BuildArtifact> {
        let _timer = Timer::start(&format!("Bundle {}", target.component_id));

        if !tokio::fs::try_exists(&target.entry).await.unwrap_or(false) {
            return Err(BuildError::EntryNotFound {
                component: target.component_id.clone(),
                path: target.entry.clone(),
            });
        }

        Logger::compiling(&target.entry);

        let resolver: Arc<dyn ModuleResolver> = match &self.resolver {
            Some(resolver) => Arc::clone(resolver),
            None => Arc::new(NodeModuleResolver::new(target.environment)),
        };

        let graph = DependencyGraph::build(
            &target.component_id,
            &target.entry,
            &target.component_dir,
            resolver,
            &self.assets,
        )
        .await?;

        let order = graph.topological_order();
        let content = render_artifact(
            &target.component_id,
            target.environment,
            &graph.entry().key,
            &order,
        );

        let path = target.artifact_path();
        Logger::writing_artifact(&path, content.len());
        self.fs.write_artifact(&path, &content).await.map_err(|e| {
            BuildError::bundle(
                &target.component_id,
                format!("Cannot write {}: {}", path.display(), e),
            )
        })?;

        Ok(BuildArtifact {
            path,
            modules: order.len(),
            size: content.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{BuildableType, Environment, SourceLanguage, ARTIFACT_FILENAME};
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn target(source: &Path, output: &Path, entry: &str) -> BuildTarget {
        let entry = source.join(entry);
        BuildTarget {
            component_id: "mailer".to_string(),
            display_name: "Mailer".to_string(),
            kind: BuildableType::PipeAction,
            environment: Environment::Host,
            language: SourceLanguage::JavaScript,
            component_dir: entry.parent().unwrap().to_path_buf(),
            entry,
            output_dir: output.join("mailer"),
            artifact_name: ARTIFACT_FILENAME,
        }
    }

    #[tokio::test]
    async fn test_bundle_writes_artifact() {
        let source = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::create_dir_all(source.path().join("mailer")).unwrap();
        fs::write(
            source.path().join("mailer/index.js"),
            "module.exports = require('./greeting.txt');",
        )
        .unwrap();
        fs::write(source.path().join("mailer/greeting.txt"), "hello").unwrap();

        let target = target(source.path(), output.path(), "mailer/index.js");
        let artifact = ModuleBundler::new().bundle(&target).await.unwrap();

        assert_eq!(artifact.path, output.path().join("mailer").join(ARTIFACT_FILENAME));
        assert_eq!(artifact.modules, 2);
        let written = fs::read_to_string(&artifact.path).unwrap();
        assert_eq!(written.len(), artifact.size);
        assert!(written.contains("module.exports = \"hello\";"));
    }

    #[tokio::test]
    async fn test_missing_entry_writes_nothing() {
        let source = tempdir().unwrap();
        let output = tempdir().unwrap();

        let target = target(source.path(), output.path(), "mailer/index.js");
        let err = ModuleBundler::new().bundle(&target).await.unwrap_err();

        assert!(matches!(err, BuildError::EntryNotFound { .. }));
        assert!(!output.path().join("mailer").exists());
    }

    #[tokio::test]
    async fn test_failed_resolution_keeps_previous_artifact() {
        let source = tempdir().unwrap();
        let output = tempdir().unwrap();
        fs::create_dir_all(source.path().join("mailer")).unwrap();
        fs::write(source.path().join("mailer/index.js"), "require('./gone');").unwrap();
        fs::create_dir_all(output.path().join("mailer")).unwrap();
        fs::write(output.path().join("mailer").join(ARTIFACT_FILENAME), "old").unwrap();

        let target = target(source.path(), output.path(), "mailer/index.js");
        let err = ModuleBundler::new().bundle(&target).await.unwrap_err();

        assert!(matches!(err, BuildError::BundleFailed { .. }));
        let existing = fs::read_to_string(output.path().join("mailer").join(ARTIFACT_FILENAME));
        assert_eq!(existing.unwrap(), "old");
    }
}
