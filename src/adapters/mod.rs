// Adapters implement the domain ports against the real system.

pub mod storage;
pub mod terminal;

pub use storage::LocalStorage;
pub use terminal::{PosixTerminal, RawModeGuard};
