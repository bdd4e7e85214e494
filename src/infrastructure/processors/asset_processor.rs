use crate::core::models::ContentKind;
use crate::infrastructure::processors::ScssProcessor;
use crate::utils::Logger;
use anyhow::{Context, Result};
use std::path::Path;

/// Turns non-script assets into CommonJS modules whose export is the asset
#[derive(Debug, Clone, Default)]
pub struct AssetProcessor {
    scss: ScssProcessor,
}

impl AssetProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script equivalent of `content` for the given kind
    pub fn transform(&self, kind: ContentKind, content: &str, path: &Path) -> Result<String> {
        match kind {
            ContentKind::Script => Ok(content.to_string()),
            ContentKind::Json => self.process_json(content, path),
            ContentKind::Text | ContentKind::Stylesheet => {
                Logger::debug(&format!("📦 Stringifying asset: {}", path.display()));
                Ok(Self::export_text(content))
            }
            ContentKind::StylesheetDialect => {
                let css = self.scss.compile(content, path)?;
                Ok(Self::export_text(&css))
            }
        }
    }

    /// Validate JSON and export it as the module value
    pub fn process_json(&self, content: &str, path: &Path) -> Result<String> {
        let _: serde_json::Value = serde_json::from_str(content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;

        Ok(format!("module.exports = {};", content.trim()))
    }

    /// A module exporting `text` verbatim as a string
    pub fn export_text(text: &str) -> String {
        format!("module.exports = {};", Self::string_literal(text))
    }

    /// JavaScript string literal for `text`
    pub fn string_literal(text: &str) -> String {
        // serde_json escapes everything JS needs except the two line separators
        serde_json::Value::String(text.to_string())
            .to_string()
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029")
    }
}
