use crate::core::buffer::TextBuffer;
use crate::domain::model::Position;

/// Text cursor with 1-based line and column. The column may be one past
/// the last char of a line (append position).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    position: Position,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            position: Position::new(line, column),
        }
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn is_at_start_of_buffer(&self) -> bool {
        self.position == Position::new(1, 1)
    }

    /// Moves one char right. Past the end of a line it wraps to the next
    /// line unless `stay_in_line` is set.
    pub fn forward(&mut self, buffer: &TextBuffer, stay_in_line: bool) {
        if stay_in_line || self.position.column <= buffer.cols_in_line(self.position.line) {
            self.position.column += 1;
        } else if self.position.line < buffer.line_count() {
            self.position.line += 1;
            self.position.column = 1;
        }
    }

    /// Moves one char left, wrapping to the end of the previous line.
    pub fn back(&mut self, buffer: &TextBuffer) {
        if self.position.column > 1 {
            self.position.column -= 1;
        } else if self.position.line > 1 {
            self.position.line -= 1;
            self.position.column = buffer.cols_in_line(self.position.line) + 1;
        }
    }

    pub fn up(&mut self, buffer: &TextBuffer) {
        if self.position.line == 1 {
            return;
        }
        self.position.line -= 1;
        self.clamp_column(buffer);
    }

    pub fn down(&mut self, buffer: &TextBuffer) {
        if self.position.line >= buffer.line_count() {
            return;
        }
        self.position.line += 1;
        self.clamp_column(buffer);
    }

    pub fn page_up(&mut self, buffer: &TextBuffer, rows: usize) {
        self.position.line = self.position.line.saturating_sub(rows).max(1);
        self.clamp_column(buffer);
    }

    pub fn page_down(&mut self, buffer: &TextBuffer, rows: usize) {
        self.position.line = (self.position.line + rows).min(buffer.line_count());
        self.clamp_column(buffer);
    }

    pub fn carriage_return(&mut self) {
        self.position.line += 1;
        self.position.column = 1;
    }

    pub fn home(&mut self) {
        self.position.column = 1;
    }

    pub fn end(&mut self, buffer: &TextBuffer) {
        self.position.column = buffer.cols_in_line(self.position.line) + 1;
    }

    // after a vertical move, stay at most one past the last char
    fn clamp_column(&mut self, buffer: &TextBuffer) {
        let cols_in_line = buffer.cols_in_line(self.position.line);
        if self.position.column > cols_in_line {
            self.position.column = cols_in_line + 1;
        }
    }
}
