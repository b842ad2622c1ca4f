use crate::domain::model::WindowSize;
use crate::utils::error::Result;

/// Byte-level access to an interactive terminal.
pub trait Terminal {
    fn window_size(&mut self) -> Result<WindowSize>;

    /// Reads one input byte. `Ok(None)` means the read timed out without input.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    fn write_str(&mut self, text: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
}

pub trait Storage {
    fn read_to_string(&self, path: &str) -> Result<String>;
    fn write_string(&self, path: &str, contents: &str) -> Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn window_size(&mut self) -> Result<WindowSize> {
        (**self).window_size()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        (**self).write_str(text)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn read_to_string(&self, path: &str) -> Result<String> {
        (**self).read_to_string(path)
    }

    fn write_string(&self, path: &str, contents: &str) -> Result<()> {
        (**self).write_string(path, contents)
    }
}
