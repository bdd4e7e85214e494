use crate::core::interfaces::SourceLinter;
use crate::core::models::{BuildTarget, LintFinding, LintReport, Severity};
use crate::core::rules::{IgnorePolicy, RuleProfile};
use crate::infrastructure::TokioFileSystemService;
use crate::utils::{Logger, Result, Timer};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

/// Static analysis that must pass before a component is bundled
pub struct LintGate {
    linter: Arc<dyn SourceLinter>,
    policy: IgnorePolicy,
    fs: TokioFileSystemService,
}

impl LintGate {
    pub fn new(linter: Arc<dyn SourceLinter>) -> Self {
        Self::with_policy(linter, IgnorePolicy::default())
    }

    pub fn with_policy(linter: Arc<dyn SourceLinter>, policy: IgnorePolicy) -> Self {
        Self {
            linter,
            policy,
            fs: TokioFileSystemService,
        }
    }

    /// Lint every script in the component directory.
    ///
    /// Findings are logged whatever the verdict; the report is not ok when
    /// any finding that survives the ignore policy is an error.
    pub async fn verify(&self, target: &BuildTarget) -> Result<LintReport> {
        let _timer = Timer::start(&format!("Lint {}", target.component_id));
        Logger::linting(&target.component_dir);

        let mut sources: Vec<(PathBuf, String)> = Vec::new();
        for path in self.fs.scan_scripts(&target.component_dir).await? {
            let source = self.fs.read_file(&path).await?;
            sources.push((path, source));
        }

        let profile = RuleProfile::for_component(target.kind, target.environment);
        let linter = Arc::clone(&self.linter);

        let findings = tokio::task::spawn_blocking(move || {
            sources
                .par_iter()
                .map(|(path, source)| linter.lint(path, source, &profile))
                .collect::<Vec<_>>()
                .into_iter()
                .flatten()
                .collect::<Vec<LintFinding>>()
        })
        .await
        .map_err(|e| std::io::Error::other(format!("lint task failed: {}", e)))?;

        let findings: Vec<LintFinding> = findings
            .into_iter()
            .filter(|finding| !self.policy.is_ignored(finding))
            .collect();

        for finding in &findings {
            Logger::lint_finding(finding);
        }

        let ok = !findings.iter().any(|f| f.severity == Severity::Error);
        if ok {
            Logger::lint_ok(&target.component_dir);
        }

        Ok(LintReport { ok, findings })
    }
}
