use crate::config::{BuildSettings, DEFAULT_NPM_COMMAND, DEFAULT_SOURCE_FOLDER, DEFAULT_TARGET_FOLDER};
use crate::core::{BuildOrchestrator, BuildSummary};
use crate::infrastructure::NpmInstaller;
use crate::utils::{BuildUI, Logger};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dexi-build")]
#[command(about = "Lint, install and bundle the components of a dexi application")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub args: BuildArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build every eligible component (default)
    Build,
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Folder holding the definition file and component sources
    #[arg(long = "source", env = "SOURCE_FOLDER", default_value = DEFAULT_SOURCE_FOLDER, global = true)]
    pub source_folder: PathBuf,

    /// Folder receiving one artifact directory per component
    #[arg(long = "target", env = "TARGET_FOLDER", default_value = DEFAULT_TARGET_FOLDER, global = true)]
    pub target_folder: PathBuf,

    /// Package manager executable used for installs
    #[arg(long = "npm", env = "NPM_COMMAND", default_value = DEFAULT_NPM_COMMAND, global = true)]
    pub npm_command: String,

    /// Bundle without running the lint gate
    #[arg(long, env = "SKIP_LINT", global = true)]
    pub skip_lint: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl From<BuildArgs> for BuildSettings {
    fn from(args: BuildArgs) -> Self {
        Self {
            source_folder: args.source_folder,
            target_folder: args.target_folder,
            npm_command: args.npm_command,
            skip_lint: args.skip_lint,
            verbose: args.verbose,
        }
    }
}

pub struct CliHandler;

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let cli = Cli::parse();
        let settings = BuildSettings::from(cli.args);
        Logger::init(settings.verbose);

        match cli.command.unwrap_or(Commands::Build) {
            Commands::Build => self.handle_build_command(&settings).await,
        }
    }

    pub async fn handle_build_command(&self, settings: &BuildSettings) -> Result<()> {
        BuildUI::show_banner();

        let definition = settings.definition_path()?;
        let summary = Self::orchestrator(settings)
            .run_definition(&definition, &settings.source_folder)
            .await?;
        BuildUI::show_summary(&summary);

        Self::verdict(&summary)
    }

    pub fn orchestrator(settings: &BuildSettings) -> BuildOrchestrator {
        let installer = Arc::new(NpmInstaller::new(settings.npm_command.clone()));
        let orchestrator = BuildOrchestrator::new(&settings.target_folder, installer);

        if settings.skip_lint {
            Logger::warn("Lint gate disabled");
            orchestrator.without_lint()
        } else {
            orchestrator
        }
    }

    fn verdict(summary: &BuildSummary) -> Result<()> {
        let failed = summary.failures().count();
        if failed > 0 {
            bail!("{} component(s) failed to build", failed);
        }
        Ok(())
    }
}
