use crate::core::definition::DefinitionStore;
use crate::core::dependencies::DependencyInstaller;
use crate::core::eligibility::{environment, needs_build};
use crate::core::interfaces::PackageInstaller;
use crate::core::lint_gate::LintGate;
use crate::core::models::*;
use crate::infrastructure::{ModuleBundler, OxcLinter};
use crate::utils::{BuildError, Logger, Result, Timer};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Builds every eligible component of a definition.
///
/// Each component runs lint, install and bundle in sequence; components run
/// concurrently and one failing never stops the others.
pub struct BuildOrchestrator {
    target_root: PathBuf,
    lint_gate: Option<LintGate>,
    installer: DependencyInstaller,
    bundler: ModuleBundler,
}

impl BuildOrchestrator {
    pub fn new(target_root: impl Into<PathBuf>, installer: Arc<dyn PackageInstaller>) -> Self {
        Self {
            target_root: target_root.into(),
            lint_gate: Some(LintGate::new(Arc::new(OxcLinter::new()))),
            installer: DependencyInstaller::new(installer),
            bundler: ModuleBundler::new(),
        }
    }

    pub fn with_lint_gate(mut self, lint_gate: LintGate) -> Self {
        self.lint_gate = Some(lint_gate);
        self
    }

    /// Bundle without the lint gate
    pub fn without_lint(mut self) -> Self {
        self.lint_gate = None;
        self
    }

    pub fn with_bundler(mut self, bundler: ModuleBundler) -> Self {
        self.bundler = bundler;
        self
    }

    /// Build the definition found in `source_root`
    pub async fn run(&self, source_root: &Path) -> Result<BuildSummary> {
        let definition = DefinitionStore::locate(source_root)?;
        self.run_definition(&definition, source_root).await
    }

    /// Build the components of an explicit definition file.
    ///
    /// Only definition errors are returned as `Err`; component failures are
    /// collected in the summary.
    pub async fn run_definition(
        &self,
        definition_path: &Path,
        source_root: &Path,
    ) -> Result<BuildSummary> {
        let start = Instant::now();
        Logger::build_start(source_root, &self.target_root);

        let store = DefinitionStore::load(definition_path).await?;

        let mut skipped = Vec::new();
        let mut prepared = Vec::new();
        for descriptor in store.components() {
            if !needs_build(descriptor) {
                Logger::component_skipped(&descriptor.id, descriptor.kind.as_str());
                skipped.push(descriptor.id.clone());
                continue;
            }
            prepared.push((descriptor.id.clone(), self.prepare_target(descriptor, source_root)));
        }

        let pipelines = prepared.into_iter().map(|(component_id, target)| async move {
            let result = match target {
                Ok(target) => self.build_component(&target).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                Logger::error(&e.to_string());
            }
            ComponentReport {
                component_id,
                result,
            }
        });
        let reports = join_all(pipelines).await;

        let summary = BuildSummary {
            reports,
            skipped,
            build_time: start.elapsed(),
        };
        Logger::build_complete(
            summary.artifacts().count(),
            summary.failures().count(),
            summary.build_time,
        );

        Ok(summary)
    }

    /// Resolve where a component's sources live and where its artifact goes
    pub fn prepare_target(
        &self,
        descriptor: &ComponentDescriptor,
        source_root: &Path,
    ) -> Result<BuildTarget> {
        if !is_folder_name(&descriptor.id) {
            return Err(BuildError::InvalidComponentId {
                component: descriptor.id.clone(),
            });
        }

        let kind = descriptor.kind.buildable().ok_or_else(|| {
            BuildError::bundle(
                &descriptor.id,
                format!("Component type {} is not buildable", descriptor.kind),
            )
        })?;

        let language = descriptor.language();
        let language = SourceLanguage::parse(&language).ok_or_else(|| {
            BuildError::UnsupportedLanguage {
                component: descriptor.id.clone(),
                language,
            }
        })?;

        let entry_point = descriptor
            .entry_point()
            .ok_or_else(|| BuildError::MissingEntryPoint {
                component: descriptor.id.clone(),
            })?;

        // entry paths are always relative to the source root, even with a leading '/'
        let entry = std::path::absolute(source_root.join(entry_point.trim_start_matches('/')))?;
        let component_dir = entry
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source_root.to_path_buf());
        let output_dir = std::path::absolute(self.target_root.join(&descriptor.id))?;

        Ok(BuildTarget {
            component_id: descriptor.id.clone(),
            display_name: descriptor.display_name().to_string(),
            kind,
            environment: environment(descriptor),
            language,
            entry,
            component_dir,
            output_dir,
            artifact_name: ARTIFACT_FILENAME,
        })
    }

    async fn build_component(&self, target: &BuildTarget) -> Result<BuildArtifact> {
        let _timer = Timer::start(&format!("Component {}", target.display_name));

        if !tokio::fs::try_exists(&target.entry).await.unwrap_or(false) {
            return Err(BuildError::EntryNotFound {
                component: target.component_id.clone(),
                path: target.entry.clone(),
            });
        }

        if let Some(gate) = &self.lint_gate {
            let report = gate.verify(target).await?;
            if !report.ok {
                return Err(BuildError::LintFailed {
                    component: target.component_id.clone(),
                    errors: report.error_count(),
                    warnings: report.warning_count(),
                });
            }
        }

        self.installer.ensure_dependencies(target).await?;

        match target.language {
            SourceLanguage::JavaScript => self.bundler.bundle(target).await,
        }
    }
}

/// Ids become `<target_root>/<id>`, so they must name exactly one folder
fn is_folder_name(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
        && !Path::new(id).is_absolute()
}
