use std::collections::VecDeque;
use viewer::core::{Terminal, WindowSize};
use viewer::{Result, ViewerError};

pub const CTRL_F: u8 = 0x06;
pub const CTRL_Q: u8 = 0x11;
pub const CTRL_S: u8 = 0x13;
pub const ENTER: u8 = 13;
pub const BACKSPACE: u8 = 127;

/// Terminal fake that replays scripted input and records everything written.
/// `None` entries in the script stand for a read timeout; running out of
/// input is an error so a test can never hang.
pub struct ScriptedTerminal {
    input: VecDeque<Option<u8>>,
    pub output: String,
    size: WindowSize,
}

#[allow(dead_code)]
impl ScriptedTerminal {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            input: VecDeque::new(),
            output: String::new(),
            size: WindowSize::new(rows, cols),
        }
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.input.extend(bytes.iter().copied().map(Some));
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.bytes(text.as_bytes())
    }

    pub fn key(self, byte: u8) -> Self {
        self.bytes(&[byte])
    }

    /// A lone Escape: ESC followed by a read timeout.
    pub fn escape(mut self) -> Self {
        self.input.push_back(Some(0x1b));
        self.input.push_back(None);
        self
    }

    pub fn arrow_up(self) -> Self {
        self.bytes(b"\x1b[A")
    }

    pub fn arrow_down(self) -> Self {
        self.bytes(b"\x1b[B")
    }

    pub fn end(self) -> Self {
        self.bytes(b"\x1b[F")
    }

    pub fn delete(self) -> Self {
        self.bytes(b"\x1b[3~")
    }

    pub fn page_down(self) -> Self {
        self.bytes(b"\x1b[6~")
    }
}

impl Terminal for ScriptedTerminal {
    fn window_size(&mut self) -> Result<WindowSize> {
        Ok(self.size)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        self.input.pop_front().ok_or_else(|| {
            ViewerError::IoError(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "scripted input exhausted",
            ))
        })
    }

    fn write_str(&mut self, text: &str) -> Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
