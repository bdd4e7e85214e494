use crate::core::models::{LintFinding, Severity};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

pub struct Logger;

impl Logger {
    pub fn init(verbose: bool) {
        let default_filter = if verbose {
            "dexi_build=debug"
        } else {
            "dexi_build=info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn build_start(source_root: &Path, target_root: &Path) {
        info!("🔨 Component Build");
        info!("═══════════════════════════════════════");
        info!("📁 Source: {}", source_root.display());
        info!("📦 Target: {}", target_root.display());
    }

    pub fn definition_loaded(path: &Path, components: usize) {
        info!("📄 Loaded {} components from {}", components, path.display());
    }

    pub fn component_skipped(id: &str, kind: &str) {
        debug!("⏭️  Skipping {} ({}): nothing to build", id, kind);
    }

    pub fn linting(dir: &Path) {
        info!("🔍 Linting component source in: {}", dir.display());
    }

    pub fn lint_ok(dir: &Path) {
        info!("✅ Component source OK in: {}", dir.display());
    }

    pub fn lint_finding(finding: &LintFinding) {
        match finding.severity {
            Severity::Error => error!(
                file = %finding.file.display(),
                line = finding.line,
                column = finding.column,
                rule = %finding.rule,
                "Lint error: {}",
                finding.message
            ),
            Severity::Warning => warn!(
                file = %finding.file.display(),
                line = finding.line,
                column = finding.column,
                rule = %finding.rule,
                "Lint warning: {}",
                finding.message
            ),
        }
    }

    pub fn npm_start(dir: &Path) {
        info!("📥 Running NPM for component source in {}", dir.display());
    }

    pub fn npm_ok() {
        info!(" - NPM OK");
    }

    pub fn compiling(entry: &Path) {
        info!("⚡ Compiling component: {}", entry.display());
    }

    pub fn writing_artifact(path: &Path, size: usize) {
        info!("💾 Writing compiled component to file: {} ({} bytes)", path.display(), size);
    }

    pub fn resolved_module(key: &str) {
        debug!("🔗 Module: {}", key);
    }

    pub fn build_complete(built: usize, failed: usize, build_time: std::time::Duration) {
        info!("");
        info!("📊 Build Statistics:");
        info!("  • Components built: {}", built);
        info!("  • Components failed: {}", failed);
        info!("  • Build time: {:.2?}", build_time);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
