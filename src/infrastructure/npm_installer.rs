use crate::core::interfaces::PackageInstaller;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Runs `<program> --quiet install` in the component directory.
///
/// The child inherits the environment and stdio of this process, so npm
/// output streams straight to the build log.
pub struct NpmInstaller {
    program: String,
}

impl NpmInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::new("npm")
    }
}

#[async_trait]
impl PackageInstaller for NpmInstaller {
    async fn install(&self, directory: &Path) -> Result<()> {
        let status = Command::new(&self.program)
            .args(["--quiet", "install"])
            .current_dir(directory)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("failed to start {}", self.program))?;

        if !status.success() {
            bail!("{} --quiet install exited with {}", self.program, status);
        }
        Ok(())
    }
}
