// Infrastructure layer
pub mod bundler;
pub mod file_system;
pub mod node_resolver;
pub mod npm_installer;
pub mod processors;

pub use bundler::{DependencyGraph, ModuleBundler};
pub use file_system::*;
pub use node_resolver::*;
pub use npm_installer::*;
pub use processors::*;
