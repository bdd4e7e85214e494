use async_trait::async_trait;
use dexi_build::core::{BuildOrchestrator, PackageInstaller};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn write(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Installer double that records every directory it is asked to install into
#[derive(Default)]
pub struct CountingInstaller {
    pub calls: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl PackageInstaller for CountingInstaller {
    async fn install(&self, directory: &Path) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(directory.to_path_buf());
        Ok(())
    }
}

pub fn orchestrator(target_root: &Path) -> (BuildOrchestrator, Arc<CountingInstaller>) {
    let installer = Arc::new(CountingInstaller::default());
    let orchestrator = BuildOrchestrator::new(target_root, installer.clone());
    (orchestrator, installer)
}

pub fn node_available() -> bool {
    std::process::Command::new("node")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Run `script` with node and return its stdout
pub fn run_node(script: &str) -> String {
    let output = std::process::Command::new("node")
        .args(["-e", script])
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "node failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}
