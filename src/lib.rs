// dexi-build: component build pipeline for dexi applications
pub mod cli;
pub mod config;
pub mod core;
pub mod infrastructure;
pub mod utils;

pub use crate::config::BuildSettings;
pub use crate::core::{BuildOrchestrator, BuildSummary};
pub use crate::utils::{BuildError, Result};
