use crate::core::buffer::TextBuffer;
use crate::core::cursor::Cursor;
use crate::core::keys::read_key;
use crate::core::viewport::Viewport;
use crate::domain::model::{Key, Position, WindowSize};
use crate::domain::ports::{Storage, Terminal};
use crate::utils::ansi::{
    erase, erase_line, hide_cursor, inverted, position_cursor, position_cursor_top_left,
    show_cursor, EraseMode,
};
use crate::utils::error::{Result, ViewerError};

const NO_NAME: &str = "[No Name]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub status_prefix: String,
    /// Extra Ctrl-Q presses needed to leave a modified buffer.
    pub quit_confirmations: u32,
    /// Used when the terminal cannot report its size.
    pub default_size: WindowSize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            status_prefix: " Viewer".to_string(),
            quit_confirmations: 1,
            default_size: WindowSize::new(24, 80),
        }
    }
}

/// What has to be repainted after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Redraw {
    Status,
    Line,
    Full,
}

pub struct Editor<T: Terminal, S: Storage> {
    terminal: T,
    storage: S,
    settings: EditorSettings,
    buffer: TextBuffer,
    cursor: Cursor,
    viewport: Viewport,
    window: WindowSize,
    filename: Option<String>,
    dirty: bool,
    status_message: String,
    quit_times: u32,
}

impl<T: Terminal, S: Storage> Editor<T, S> {
    pub fn new(mut terminal: T, storage: S, settings: EditorSettings) -> Self {
        let window = query_window_size(&mut terminal, settings.default_size);
        let quit_times = settings.quit_confirmations;
        Self {
            terminal,
            storage,
            settings,
            buffer: TextBuffer::new(),
            cursor: Cursor::default(),
            viewport: Viewport::new(window.text_rows(), window.cols),
            window,
            filename: None,
            dirty: false,
            status_message: String::new(),
            quit_times,
        }
    }

    /// Loads `path` into the buffer. A missing file starts an empty buffer
    /// that will be saved under that name.
    pub fn open(&mut self, path: &str) -> Result<()> {
        match TextBuffer::load(&self.storage, path) {
            Ok(buffer) => {
                self.status_message = format!("{} lines read", buffer.line_count());
                self.buffer = buffer;
            }
            Err(ViewerError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("{} does not exist yet, starting a new file", path);
                self.buffer = TextBuffer::new();
                self.status_message = "New file".to_string();
            }
            Err(e) => return Err(e),
        }
        self.filename = Some(path.to_string());
        self.cursor = Cursor::default();
        self.viewport = Viewport::new(self.window.text_rows(), self.window.cols);
        self.dirty = false;
        Ok(())
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn window_size(&self) -> WindowSize {
        self.window
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Runs the key loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Editor started with {}x{} window",
            self.window.cols,
            self.window.rows
        );
        self.refresh()?;
        loop {
            let key = read_key(&mut self.terminal)?;
            tracing::trace!("key {:?}", key);
            if !self.process_key(key)? {
                break;
            }
        }
        self.close()
    }

    /// Handles one key. Returns `false` when the editor should quit.
    pub fn process_key(&mut self, key: Key) -> Result<bool> {
        if key != Key::Ctrl('q') {
            self.quit_times = self.settings.quit_confirmations;
        }

        let redraw = match key {
            Key::Ctrl('q') => {
                if self.dirty && self.quit_times > 0 {
                    self.status_message = format!(
                        "WARNING! File has unsaved changes. Press Ctrl-Q {} more time(s) to quit.",
                        self.quit_times
                    );
                    self.quit_times -= 1;
                    Redraw::Status
                } else {
                    tracing::debug!("Quit requested");
                    return Ok(false);
                }
            }
            Key::Ctrl('s') => {
                self.save()?;
                Redraw::Status
            }
            Key::Ctrl('f') => {
                self.find()?;
                Redraw::Status
            }
            Key::Ctrl('l') => {
                tracing::debug!("Redraw requested");
                Redraw::Full
            }
            Key::Ctrl('w') => {
                self.resize_window();
                Redraw::Full
            }
            Key::Char(c) => self.insert_char(c),
            Key::Tab => self.insert_char('\t'),
            Key::Enter => self.carriage_return(),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::ArrowUp
            | Key::ArrowDown
            | Key::ArrowLeft
            | Key::ArrowRight
            | Key::Home
            | Key::End
            | Key::PageUp
            | Key::PageDown => self.move_cursor(key),
            Key::Escape => Redraw::Status,
            Key::Ctrl(c) => self.report_symbol((c as u8).wrapping_sub(b'a').wrapping_add(1)),
            Key::Unknown(byte) => self.report_symbol(byte),
        };

        let redraw = if self.viewport.scroll_to(self.cursor.position()) {
            Redraw::Full
        } else {
            redraw
        };
        self.repaint(redraw)?;
        Ok(true)
    }

    fn report_symbol(&mut self, byte: u8) -> Redraw {
        self.status_message = format!(" symbol ({})", byte);
        Redraw::Status
    }

    fn move_cursor(&mut self, key: Key) -> Redraw {
        match key {
            Key::ArrowUp => self.cursor.up(&self.buffer),
            Key::ArrowDown => self.cursor.down(&self.buffer),
            Key::ArrowLeft => self.cursor.back(&self.buffer),
            Key::ArrowRight => self.cursor.forward(&self.buffer, false),
            Key::Home => self.cursor.home(),
            Key::End => self.cursor.end(&self.buffer),
            Key::PageUp => self.cursor.page_up(&self.buffer, self.viewport.height()),
            Key::PageDown => self.cursor.page_down(&self.buffer, self.viewport.height()),
            _ => {}
        }
        tracing::debug!("Moved cursor with {:?} to {:?}", key, self.cursor.position());
        Redraw::Status
    }

    fn insert_char(&mut self, character: char) -> Redraw {
        tracing::debug!("Insert {:?} at {:?}", character, self.cursor.position());
        self.buffer.insert(character, self.cursor.position());
        self.cursor.forward(&self.buffer, true);
        self.dirty = true;
        Redraw::Line
    }

    fn carriage_return(&mut self) -> Redraw {
        tracing::debug!("Split line at {:?}", self.cursor.position());
        self.buffer.split_line(self.cursor.position());
        self.cursor.carriage_return();
        self.viewport.reset_left();
        self.dirty = true;
        Redraw::Full
    }

    fn backspace(&mut self) -> Redraw {
        if self.cursor.is_at_start_of_buffer() {
            return Redraw::Status;
        }
        let line_before = self.cursor.line();
        self.cursor.back(&self.buffer);
        tracing::debug!("Backspace deletes at {:?}", self.cursor.position());
        self.buffer.delete_char_at(self.cursor.position());
        self.dirty = true;
        if self.cursor.line() == line_before {
            Redraw::Line
        } else {
            Redraw::Full
        }
    }

    fn delete(&mut self) -> Redraw {
        let position = self.cursor.position();
        let joins_line = position.column > self.buffer.cols_in_line(position.line);
        if joins_line && position.line == self.buffer.line_count() {
            return Redraw::Status;
        }
        tracing::debug!("Delete at {:?}", position);
        self.buffer.delete_char_at(position);
        self.dirty = true;
        if joins_line {
            Redraw::Full
        } else {
            Redraw::Line
        }
    }

    fn resize_window(&mut self) {
        self.window = query_window_size(&mut self.terminal, self.settings.default_size);
        self.viewport.resize(self.window.text_rows(), self.window.cols);
        tracing::info!("Window resized to {}x{}", self.window.cols, self.window.rows);
    }

    fn save(&mut self) -> Result<()> {
        let filename = match self.filename.clone() {
            Some(name) => name,
            None => match self.prompt("Save as: ", |_, _, _| Ok(()))? {
                Some(name) => name,
                None => {
                    self.status_message = "Save aborted".to_string();
                    return Ok(());
                }
            },
        };

        match self.buffer.save(&self.storage, &filename) {
            Ok(lines) => {
                self.status_message = format!(
                    "{} lines written to {} at {}",
                    lines,
                    filename,
                    chrono::Local::now().format("%H:%M:%S")
                );
                self.filename = Some(filename);
                self.dirty = false;
            }
            Err(e) => {
                tracing::error!("Saving {} failed: {}", filename, e);
                self.status_message = format!("Can't save! {}", e);
            }
        }
        Ok(())
    }

    /// Incremental search. Arrow keys jump between matches, Enter keeps the
    /// cursor at the match and Escape returns to where the search started.
    fn find(&mut self) -> Result<()> {
        let saved_cursor = self.cursor;
        let saved_viewport = self.viewport.clone();
        let origin = self.cursor.position();
        let mut last_match: Option<Position> = None;

        let query = self.prompt("Search: ", |editor, query, key| {
            let found = match key {
                Key::Enter | Key::Escape => return Ok(()),
                Key::ArrowRight | Key::ArrowDown => {
                    let from = last_match
                        .map(|p| Position::new(p.line, p.column + 1))
                        .unwrap_or(origin);
                    editor.buffer.search(query, from)
                }
                Key::ArrowLeft | Key::ArrowUp => {
                    let from = last_match.unwrap_or(origin);
                    editor.buffer.search_backwards(query, from)
                }
                _ => editor.buffer.search(query, origin),
            };

            match found {
                Some(position) => {
                    last_match = Some(position);
                    editor.cursor.set_position(position);
                    if editor.viewport.scroll_to(position) {
                        editor.repaint(Redraw::Full)?;
                    }
                }
                None if !query.is_empty() => editor.status_message.push_str(" (not found)"),
                None => {}
            }
            Ok(())
        })?;

        if query.is_none() {
            self.cursor = saved_cursor;
            self.viewport = saved_viewport;
            self.repaint(Redraw::Full)?;
        }
        tracing::debug!("Search finished at {:?}", self.cursor.position());
        Ok(())
    }

    /// Reads a line of input in the status line. `callback` runs after every
    /// key with the current input. Returns `None` when cancelled or empty.
    fn prompt<F>(&mut self, label: &str, mut callback: F) -> Result<Option<String>>
    where
        F: FnMut(&mut Self, &str, Key) -> Result<()>,
    {
        let mut input = String::new();
        self.status_message = label.to_string();
        self.repaint(Redraw::Status)?;

        loop {
            let key = read_key(&mut self.terminal)?;
            match key {
                Key::Enter => {
                    self.status_message.clear();
                    callback(self, &input, key)?;
                    return Ok(if input.is_empty() { None } else { Some(input) });
                }
                Key::Escape => {
                    self.status_message.clear();
                    callback(self, &input, key)?;
                    return Ok(None);
                }
                Key::Backspace => {
                    input.pop();
                }
                Key::Char(c) => input.push(c),
                _ => {}
            }
            self.status_message = format!("{}{}", label, input);
            callback(self, &input, key)?;
            self.repaint(Redraw::Status)?;
        }
    }

    pub fn refresh(&mut self) -> Result<()> {
        self.repaint(Redraw::Full)
    }

    fn repaint(&mut self, redraw: Redraw) -> Result<()> {
        let mut out = String::new();
        match redraw {
            Redraw::Full => {
                out.push_str(&hide_cursor());
                out.push_str(&erase(EraseMode::All));
                for (i, line) in self.buffer.visible_lines(&self.viewport).iter().enumerate() {
                    out.push_str(&position_cursor(i + 1, 1));
                    out.push_str(line);
                }
            }
            Redraw::Line => {
                let row = self.viewport.display_row(self.cursor.line());
                out.push_str(&position_cursor(row, 1));
                out.push_str(&erase_line(EraseMode::CursorToEnd));
                out.push_str(&self.buffer.clipped_line(self.cursor.line(), &self.viewport));
            }
            Redraw::Status => {}
        }
        out.push_str(&self.status_line());
        out.push_str(&self.place_cursor());
        if redraw == Redraw::Full {
            out.push_str(&show_cursor());
        }
        self.terminal.write_str(&out)?;
        self.terminal.flush()
    }

    /// The inverted last row, padded or cut to the window width.
    pub fn status_text(&self) -> String {
        let modified = if self.dirty { " [modified]" } else { "" };
        let text = format!(
            "{}: (L{} C{}) {}{} {}",
            self.settings.status_prefix,
            self.cursor.line(),
            self.cursor.column(),
            self.filename.as_deref().unwrap_or(NO_NAME),
            modified,
            self.status_message
        );
        let width = self.window.cols;
        let mut status: String = text.chars().take(width).collect();
        let len = status.chars().count();
        status.extend(std::iter::repeat(' ').take(width - len));
        status
    }

    fn status_line(&self) -> String {
        format!(
            "{}{}",
            position_cursor(self.window.rows, 1),
            inverted(&self.status_text())
        )
    }

    fn place_cursor(&self) -> String {
        position_cursor(
            self.viewport.display_row(self.cursor.line()),
            self.viewport.display_col(self.cursor.column()),
        )
    }

    fn close(&mut self) -> Result<()> {
        let out = format!("{}{}", erase(EraseMode::All), position_cursor_top_left());
        self.terminal.write_str(&out)?;
        self.terminal.flush()?;
        tracing::info!("Editor closed");
        Ok(())
    }
}

fn query_window_size<T: Terminal>(terminal: &mut T, fallback: WindowSize) -> WindowSize {
    match terminal.window_size() {
        Ok(size) if size.rows >= 2 && size.cols >= 1 => size,
        Ok(size) => {
            tracing::warn!("Terminal reported unusable size {:?}, using {:?}", size, fallback);
            fallback
        }
        Err(e) => {
            tracing::warn!("{}, using {:?}", e, fallback);
            fallback
        }
    }
}
