use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SOURCE_FOLDER: &str = "/var/workspace/source";
pub const DEFAULT_TARGET_FOLDER: &str = "/var/workspace/target";
pub const DEFAULT_NPM_COMMAND: &str = "npm";

/// Resolved settings for one build run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    pub source_folder: PathBuf,
    pub target_folder: PathBuf,
    pub npm_command: String,
    pub skip_lint: bool,
    pub verbose: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            source_folder: PathBuf::from(DEFAULT_SOURCE_FOLDER),
            target_folder: PathBuf::from(DEFAULT_TARGET_FOLDER),
            npm_command: DEFAULT_NPM_COMMAND.to_string(),
            skip_lint: false,
            verbose: false,
        }
    }
}

impl BuildSettings {
    /// Definition file to build, if one exists in the source folder
    pub fn definition_path(&self) -> crate::utils::Result<PathBuf> {
        crate::core::DefinitionStore::locate(&self.source_folder)
    }
}
