use crate::core::interfaces::PackageInstaller;
use crate::core::models::BuildTarget;
use crate::utils::{BuildError, Logger, Result, Timer};
use std::sync::Arc;

/// Manifest whose presence makes a component install its dependencies
pub const MANIFEST_FILENAME: &str = "package.json";

pub struct DependencyInstaller {
    installer: Arc<dyn PackageInstaller>,
}

impl DependencyInstaller {
    pub fn new(installer: Arc<dyn PackageInstaller>) -> Self {
        Self { installer }
    }

    /// Install the component's declared dependencies, if it declares any.
    ///
    /// Returns whether an install ran.
    pub async fn ensure_dependencies(&self, target: &BuildTarget) -> Result<bool> {
        let manifest = target.component_dir.join(MANIFEST_FILENAME);
        if !tokio::fs::try_exists(&manifest).await.unwrap_or(false) {
            Logger::debug(&format!(
                "No {} in {}, skipping install",
                MANIFEST_FILENAME,
                target.component_dir.display()
            ));
            return Ok(false);
        }

        let _timer = Timer::start(&format!("Install {}", target.component_id));
        Logger::npm_start(&target.component_dir);

        self.installer
            .install(&target.component_dir)
            .await
            .map_err(|e| BuildError::DependencyInstallFailed {
                component: target.component_id.clone(),
                directory: target.component_dir.clone(),
                reason: format!("{:#}", e),
            })?;

        Logger::npm_ok();
        Ok(true)
    }
}
