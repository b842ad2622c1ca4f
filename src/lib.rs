pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, PosixTerminal, RawModeGuard};
pub use config::toml_config::TomlConfig;
pub use core::{
    buffer::TextBuffer,
    editor::{Editor, EditorSettings},
};
pub use utils::error::{Result, ViewerError};
