//! Configuration management for settings-patcher

pub mod loader;
mod schema;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use schema::*;
