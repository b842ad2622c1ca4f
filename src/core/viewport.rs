use crate::domain::model::Position;

/// The rectangle of the buffer shown on screen.
///
/// `top`/`bottom` are 0-based line indices, `left`/`right` 0-based column
/// indices, both with exclusive upper bounds. Scrolling moves the window by
/// half its height or width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    top: usize,
    bottom: usize,
    left: usize,
    right: usize,
    horizontal_scroll_dist: usize,
    vertical_scroll_dist: usize,
}

impl Viewport {
    pub fn new(text_rows: usize, cols: usize) -> Self {
        let mut viewport = Self {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
            horizontal_scroll_dist: 1,
            vertical_scroll_dist: 1,
        };
        viewport.resize(text_rows, cols);
        viewport
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn bottom(&self) -> usize {
        self.bottom
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Keeps the top-left corner and adapts the extent to a new window size.
    pub fn resize(&mut self, text_rows: usize, cols: usize) {
        let text_rows = text_rows.max(1);
        let cols = cols.max(1);
        self.bottom = self.top + text_rows;
        self.right = self.left + cols;
        self.horizontal_scroll_dist = (cols / 2).max(1);
        self.vertical_scroll_dist = (text_rows / 2).max(1);
    }

    pub fn scroll_down(&mut self) {
        self.top += self.vertical_scroll_dist;
        self.bottom += self.vertical_scroll_dist;
    }

    pub fn scroll_up(&mut self) {
        let dist = self.top.min(self.vertical_scroll_dist);
        self.top -= dist;
        self.bottom -= dist;
    }

    pub fn scroll_right(&mut self) {
        self.left += self.horizontal_scroll_dist;
        self.right += self.horizontal_scroll_dist;
    }

    pub fn scroll_left(&mut self) {
        let dist = self.left.min(self.horizontal_scroll_dist);
        self.left -= dist;
        self.right -= dist;
    }

    pub fn reset_left(&mut self) {
        self.right -= self.left;
        self.left = 0;
    }

    /// Shifts horizontally so that the 1-based `column` sits half a width
    /// left of the right edge.
    pub fn center_horizontal(&mut self, column: usize) {
        let width = self.width();
        let right = column + self.horizontal_scroll_dist;
        self.left = right.saturating_sub(width);
        self.right = self.left + width;
    }

    /// Shifts vertically so that the 1-based `line` sits in the middle.
    pub fn center_vertical(&mut self, line: usize) {
        let height = self.height();
        self.top = line.saturating_sub(1 + height / 2);
        self.bottom = self.top + height;
    }

    /// 1-based screen row of a 1-based buffer line.
    pub fn display_row(&self, line: usize) -> usize {
        line - self.top
    }

    /// 1-based screen column of a 1-based buffer column.
    pub fn display_col(&self, column: usize) -> usize {
        column - self.left
    }

    pub fn contains(&self, position: Position) -> bool {
        let (line, column) = (position.line - 1, position.column - 1);
        (self.top..self.bottom).contains(&line) && (self.left..self.right).contains(&column)
    }

    /// Scrolls until `position` is visible. Returns whether the window moved.
    pub fn scroll_to(&mut self, position: Position) -> bool {
        let before = (self.top, self.left);
        let (line, column) = (position.line - 1, position.column - 1);

        if line < self.top {
            if self.top - line > self.vertical_scroll_dist {
                self.center_vertical(position.line);
            } else {
                self.scroll_up();
            }
        } else if line >= self.bottom {
            if line - self.bottom >= self.vertical_scroll_dist {
                self.center_vertical(position.line);
            } else {
                self.scroll_down();
            }
        }

        if column < self.left {
            if self.left - column > self.horizontal_scroll_dist {
                self.center_horizontal(position.column);
            } else {
                self.scroll_left();
            }
        } else if column >= self.right {
            if column - self.right >= self.horizontal_scroll_dist {
                self.center_horizontal(position.column);
            } else {
                self.scroll_right();
            }
        }

        before != (self.top, self.left)
    }
}
