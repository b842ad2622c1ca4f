pub mod buffer;
pub mod cursor;
pub mod editor;
pub mod keys;
pub mod viewport;

pub use crate::domain::model::{Key, Position, WindowSize};
pub use crate::domain::ports::{Storage, Terminal};
pub use crate::utils::error::Result;
