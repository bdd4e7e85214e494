// Processors module
pub mod asset_processor;
pub mod js_linter;
pub mod require_scanner;
pub mod scss_processor;

pub use asset_processor::*;
pub use js_linter::*;
pub use require_scanner::*;
pub use scss_processor::*;
