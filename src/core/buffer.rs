use crate::core::viewport::Viewport;
use crate::domain::model::Position;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

const INITIAL_LINE_CAPACITY: usize = 60;

/// Editable text held as a list of lines. Never empty: a fresh buffer has a
/// single empty line. Lines and columns are 1-based, columns count chars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::with_capacity(INITIAL_LINE_CAPACITY)],
        }
    }

    /// Splits `text` into lines, dropping a trailing `\r` from each. A
    /// trailing newline yields an empty last line so that `to_text` gives
    /// back the same text.
    pub fn from_text(text: &str) -> Self {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines }
    }

    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let contents = storage.read_to_string(path)?;
        let buffer = Self::from_text(&contents);
        tracing::debug!("Loaded {} lines from {}", buffer.line_count(), path);
        Ok(buffer)
    }

    /// Writes the buffer and returns the number of lines written.
    pub fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<usize> {
        storage.write_string(path, &self.to_text())?;
        tracing::debug!("Saved {} lines to {}", self.line_count(), path);
        Ok(self.line_count())
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, line: usize) -> &str {
        &self.lines[line - 1]
    }

    pub fn cols_in_line(&self, line: usize) -> usize {
        self.lines[line - 1].chars().count()
    }

    /// The part of `line` inside the viewport's horizontal extent.
    pub fn clipped_line(&self, line: usize, viewport: &Viewport) -> String {
        clip(&self.lines[line - 1], viewport)
    }

    /// Clipped lines from the viewport top down to its bottom or the end of the buffer.
    pub fn visible_lines(&self, viewport: &Viewport) -> Vec<String> {
        let end = viewport.bottom().min(self.lines.len());
        let start = viewport.top().min(end);
        self.lines[start..end]
            .iter()
            .map(|line| clip(line, viewport))
            .collect()
    }

    pub fn insert(&mut self, character: char, position: Position) {
        let index = position.line - 1;
        if index == self.lines.len() {
            self.lines.push(String::with_capacity(INITIAL_LINE_CAPACITY));
        }
        let line = &mut self.lines[index];
        let at = byte_index(line, position.column - 1);
        line.insert(at, character);
    }

    /// Breaks the line at the given position; the tail moves to a new line below.
    pub fn split_line(&mut self, position: Position) {
        let index = position.line - 1;
        let line = &mut self.lines[index];
        let at = byte_index(line, position.column - 1);
        let tail = line.split_off(at);
        self.lines.insert(index + 1, tail);
    }

    /// Deletes the char at the position. Past the end of a line the next
    /// line is joined onto it instead.
    pub fn delete_char_at(&mut self, position: Position) {
        let index = position.line - 1;
        if position.column > self.cols_in_line(position.line) {
            if index + 1 < self.lines.len() {
                let next = self.lines.remove(index + 1);
                self.lines[index].push_str(&next);
            }
        } else {
            let line = &mut self.lines[index];
            let at = byte_index(line, position.column - 1);
            line.remove(at);
        }
    }

    /// First occurrence at or after `from`, continuing on the following lines.
    pub fn search(&self, text: &str, from: Position) -> Option<Position> {
        if text.is_empty() {
            return None;
        }
        let current = &self.lines[from.line - 1];
        let start = byte_index(current, from.column - 1);
        if let Some(found) = current[start..].find(text) {
            return Some(Position::new(from.line, char_column(current, start + found)));
        }
        self.lines
            .iter()
            .enumerate()
            .skip(from.line)
            .find_map(|(i, line)| {
                line.find(text)
                    .map(|found| Position::new(i + 1, char_column(line, found)))
            })
    }

    /// Last occurrence starting before `from`, continuing on the preceding lines.
    pub fn search_backwards(&self, text: &str, from: Position) -> Option<Position> {
        if text.is_empty() {
            return None;
        }
        let current = &self.lines[from.line - 1];
        let end = byte_index(current, from.column - 1);
        if let Some(found) = current[..end].rfind(text) {
            return Some(Position::new(from.line, char_column(current, found)));
        }
        self.lines[..from.line - 1]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, line)| {
                line.rfind(text)
                    .map(|found| Position::new(i + 1, char_column(line, found)))
            })
    }
}

fn clip(line: &str, viewport: &Viewport) -> String {
    line.chars()
        .skip(viewport.left())
        .take(viewport.width())
        .map(|c| if c == '\t' { ' ' } else { c })
        .collect()
}

/// Byte offset of the char at `char_index`, or the line length past its end.
fn byte_index(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map_or(line.len(), |(i, _)| i)
}

/// 1-based char column of a byte offset.
fn char_column(line: &str, byte_offset: usize) -> usize {
    line[..byte_offset].chars().count() + 1
}
