use snake_common::games::snake::{RenderDelta, StatusLabel, EMPTY_CHAR};

/// In-memory character frame standing in for a terminal window. It only
/// knows how to apply render deltas and overlay status text on the border.
pub struct Canvas {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut canvas = Self {
            rows,
            cols,
            cells: vec![EMPTY_CHAR; rows * cols],
        };
        canvas.draw_border();
        canvas
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    fn draw_border(&mut self) {
        for col in 0..self.cols {
            self.cells[col] = '-';
            self.cells[(self.rows - 1) * self.cols + col] = '-';
        }
        for row in 0..self.rows {
            self.cells[row * self.cols] = '|';
            self.cells[row * self.cols + self.cols - 1] = '|';
        }
        for (row, col) in [(0, 0), (0, self.cols - 1), (self.rows - 1, 0), (self.rows - 1, self.cols - 1)] {
            self.cells[row * self.cols + col] = '+';
        }
    }

    pub fn apply(&mut self, delta: &RenderDelta) {
        let cell = delta.cell();
        let Some(idx) = self.index(cell.row, cell.col) else {
            return;
        };
        self.cells[idx] = match delta {
            RenderDelta::Draw { glyph, .. } => glyph.as_char(),
            RenderDelta::Clear { .. } => EMPTY_CHAR,
        };
    }

    pub fn apply_all(&mut self, deltas: &[RenderDelta]) {
        for delta in deltas {
            self.apply(delta);
        }
    }

    /// Redraws the frame and writes each label over it, clipped to the row.
    pub fn set_status(&mut self, labels: &[StatusLabel]) {
        self.draw_border();
        for label in labels {
            for (offset, ch) in label.text.chars().enumerate() {
                let col = label.col + offset as i32;
                if col >= self.cols as i32 - 1 {
                    break;
                }
                if let Some(idx) = self.index(label.row, col) {
                    self.cells[idx] = ch;
                }
            }
        }
    }

    pub fn char_at(&self, row: i32, col: i32) -> Option<char> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    pub fn render(&self) -> String {
        self.cells
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
