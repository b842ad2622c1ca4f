pub mod ansi;
pub mod error;
pub mod logger;
pub mod validation;
