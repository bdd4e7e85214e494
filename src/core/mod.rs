// Core domain layer
pub mod definition;
pub mod dependencies;
pub mod eligibility;
pub mod interfaces;
pub mod lint_gate;
pub mod models;
pub mod rules;
pub mod services;

pub use definition::*;
pub use dependencies::*;
pub use interfaces::*;
pub use lint_gate::*;
pub use models::*;
pub use rules::{IgnorePolicy, RuleLevel, RuleOverlay, RuleProfile};
pub use services::*;
