//! Workspace configuration

mod loader;

pub use loader::{load_config, transition_context};
