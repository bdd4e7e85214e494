use crate::core::models::{ComponentDescriptor, ComponentType, Environment};

/// True iff the component type produces an artifact.
pub fn needs_build(descriptor: &ComponentDescriptor) -> bool {
    descriptor.kind.buildable().is_some()
}

/// True iff the component is executed in the browser.
pub fn is_browser_like(descriptor: &ComponentDescriptor) -> bool {
    descriptor.kind == ComponentType::FieldType
}

pub fn environment(descriptor: &ComponentDescriptor) -> Environment {
    if is_browser_like(descriptor) {
        Environment::Browser
    } else {
        Environment::Host
    }
}
