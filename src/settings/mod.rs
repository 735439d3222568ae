//! Structural view of Django-style settings modules

mod document;
pub mod lexer;

pub use document::{ListLiteral, SettingsDocument};
pub(crate) use document::line_of;
