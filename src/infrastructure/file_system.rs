use crate::core::models::ContentKind;
use crate::utils::Result;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory holding installed third-party dependencies, never linted
pub const DEPENDENCY_DIR: &str = "node_modules";

pub struct TokioFileSystemService;

impl TokioFileSystemService {
    /// Every script the bundler would load (`.js`, `.cjs`) below `root`,
    /// excluding installed dependencies, sorted by path
    pub async fn scan_scripts(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut scripts = Vec::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            let mut entries = fs::read_dir(&dir).await?;

            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                let file_type = entry.file_type().await?;

                if file_type.is_dir() {
                    if entry.file_name() != DEPENDENCY_DIR {
                        pending.push(path);
                    }
                } else if path
                    .extension()
                    .and_then(|s| s.to_str())
                    .and_then(ContentKind::from_extension)
                    == Some(ContentKind::Script)
                {
                    scripts.push(path);
                }
            }
        }

        scripts.sort();
        Ok(scripts)
    }

    pub async fn read_file(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }

    /// Replace the file at `path` with `content`, creating parent directories
    pub async fn write_artifact(&self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if fs::try_exists(path).await? {
            fs::remove_file(path).await?;
        }

        fs::write(path, content).await?;
        Ok(())
    }
}
