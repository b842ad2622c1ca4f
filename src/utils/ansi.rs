//! ANSI/VT100 escape sequence builders used for screen rendering.

const ESC: &str = "\x1b";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseMode {
    CursorToEnd = 0,
    CursorToBegin = 1,
    All = 2,
}

pub fn erase(mode: EraseMode) -> String {
    format!("{}[{}J", ESC, mode as u8)
}

pub fn erase_line(mode: EraseMode) -> String {
    format!("{}[{}K", ESC, mode as u8)
}

pub fn position_cursor_top_left() -> String {
    format!("{}[H", ESC)
}

/// Moves the cursor to a 1-based screen row and column.
pub fn position_cursor(row: usize, column: usize) -> String {
    format!("{}[{};{}H", ESC, row, column)
}

pub fn hide_cursor() -> String {
    format!("{}[?25l", ESC)
}

pub fn show_cursor() -> String {
    format!("{}[?25h", ESC)
}

pub fn red(message: &str) -> String {
    rendition(message, 31)
}

pub fn inverted(message: &str) -> String {
    rendition(message, 7)
}

fn rendition(message: &str, code: u8) -> String {
    format!("{}[{}m{}{}[0m", ESC, code, message, ESC)
}
