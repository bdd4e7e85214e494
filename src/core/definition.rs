use crate::core::models::ComponentDescriptor;
use crate::utils::{BuildError, Logger, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Accepted definition filenames, in lookup order
pub const DEFINITION_FILENAMES: [&str; 2] = ["dexi.yml", "dexi.yaml"];

#[derive(Debug, Default, Deserialize)]
struct DefinitionDocument {
    #[serde(default)]
    components: Option<Vec<ComponentDescriptor>>,
}

/// Parsed application definition, read-only after load
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    path: PathBuf,
    components: Vec<ComponentDescriptor>,
}

impl DefinitionStore {
    /// Find the definition file in the source root
    pub fn locate(source_root: &Path) -> Result<PathBuf> {
        DEFINITION_FILENAMES
            .iter()
            .map(|name| source_root.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| BuildError::DefinitionNotFound {
                source_root: source_root.to_path_buf(),
            })
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BuildError::DefinitionNotFound {
                    source_root: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                }
            } else {
                BuildError::Io(e)
            }
        })?;

        let store = Self::parse(path, &content)?;
        Logger::definition_loaded(path, store.components.len());
        Ok(store)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let document: Option<DefinitionDocument> =
            serde_yaml::from_str(content).map_err(|e| BuildError::DefinitionMalformed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            components: document.and_then(|d| d.components).unwrap_or_default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn components(&self) -> &[ComponentDescriptor] {
        &self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ComponentType;
    use tempfile::tempdir;

    const DEFINITION: &str = r#"
name: sample-app
components:
  - id: 0a1b
    name: Send Mail
    type: pipe-action
    specification:
      source:
        language: javascript
        value: mailer/index.js
  - id: 9f8e
    name: App Config
    type: app-config
"#;

    #[test]
    fn test_locate_prefers_yml() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("dexi.yaml"), DEFINITION).unwrap();
        std::fs::write(temp_dir.path().join("dexi.yml"), DEFINITION).unwrap();

        let found = DefinitionStore::locate(temp_dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "dexi.yml");
    }

    #[test]
    fn test_locate_accepts_yaml_spelling() {
        let temp_dir = tempdir().unwrap();
        std::fs::write(temp_dir.path().join("dexi.yaml"), DEFINITION).unwrap();

        let found = DefinitionStore::locate(temp_dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "dexi.yaml");
    }

    #[test]
    fn test_locate_missing_definition() {
        let temp_dir = tempdir().unwrap();
        let err = DefinitionStore::locate(temp_dir.path()).unwrap_err();
        assert!(matches!(err, BuildError::DefinitionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_components() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("dexi.yml");
        std::fs::write(&path, DEFINITION).unwrap();

        let store = DefinitionStore::load(&path).await.unwrap();
        let components = store.components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].id, "0a1b");
        assert_eq!(components[0].display_name(), "Send Mail");
        assert_eq!(components[0].kind, ComponentType::PipeAction);
        assert_eq!(components[1].kind, ComponentType::Other("app-config".to_string()));
    }

    #[test]
    fn test_malformed_definition() {
        let err = DefinitionStore::parse(Path::new("dexi.yml"), "components: [ {id: ").unwrap_err();
        assert!(matches!(err, BuildError::DefinitionMalformed { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_empty_definition_has_no_components() {
        let store = DefinitionStore::parse(Path::new("dexi.yml"), "").unwrap();
        assert!(store.components().is_empty());
    }
}
