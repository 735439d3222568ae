//! settings-patcher - Enable CORS and REST framework support in a Django
//! settings module
//!
//! This is the library interface, allowing the patch to be applied
//! programmatically or to in-memory text.

pub mod cli;
pub mod config;
pub mod error;
pub mod patch;
pub mod settings;

pub use config::Config;
pub use error::Error;
pub use patch::{patch_settings, PatchReport, Patcher, WriteMode};
