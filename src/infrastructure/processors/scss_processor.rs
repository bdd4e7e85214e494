use crate::utils::Timer;
use anyhow::{anyhow, Result};
use std::path::Path;

/// SCSS/SASS preprocessor using the grass crate
#[derive(Debug, Clone, Default)]
pub struct ScssProcessor;

impl ScssProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Compile SCSS/SASS to plain CSS. `@import`s resolve relative to the file.
    pub fn compile(&self, content: &str, path: &Path) -> Result<String> {
        let _timer = Timer::start(&format!(
            "Compiling SCSS {}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
        ));

        let syntax = if path.extension().and_then(|s| s.to_str()) == Some("sass") {
            grass::InputSyntax::Sass
        } else {
            grass::InputSyntax::Scss
        };

        let mut options = grass::Options::default()
            .input_syntax(syntax)
            .style(grass::OutputStyle::Expanded);
        if let Some(dir) = path.parent() {
            options = options.load_path(dir);
        }

        grass::from_string(content.to_string(), &options)
            .map_err(|e| anyhow!("SCSS compilation error in {}: {}", path.display(), e))
    }
}
