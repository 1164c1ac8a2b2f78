use serde::{Deserialize, Serialize};

/// Pixel spacing for a column layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConstants {
    pub column_spacing: f64,
    pub row_spacing: f64,
    pub start_x: f64,
    pub start_y: f64,
    /// Extra vertical space between consecutive groups.
    pub group_gap: f64,
}

impl LayoutConstants {
    pub const fn intent_flow() -> Self {
        Self {
            column_spacing: 350.0,
            row_spacing: 80.0,
            start_x: 50.0,
            start_y: 50.0,
            group_gap: 40.0,
        }
    }

    pub const fn routing_flow() -> Self {
        Self {
            column_spacing: 280.0,
            row_spacing: 90.0,
            start_x: 0.0,
            start_y: 0.0,
            group_gap: 30.0,
        }
    }

    pub fn column_x(&self, column: usize) -> f64 {
        self.start_x + column as f64 * self.column_spacing
    }

    pub fn cursor(&self) -> ColumnCursor {
        ColumnCursor {
            next_y: self.start_y,
            row_spacing: self.row_spacing,
        }
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self::intent_flow()
    }
}

/// Running y offset for one column; created fresh for every layout pass.
#[derive(Debug, Clone, Copy)]
pub struct ColumnCursor {
    next_y: f64,
    row_spacing: f64,
}

impl ColumnCursor {
    pub fn peek(&self) -> f64 {
        self.next_y
    }

    /// Returns the current row and moves down one row.
    pub fn take_row(&mut self) -> f64 {
        let y = self.next_y;
        self.next_y += self.row_spacing;
        y
    }

    pub fn skip(&mut self, amount: f64) {
        self.next_y += amount;
    }

    /// Keeps this cursor at or below `y`.
    pub fn align_to(&mut self, y: f64) {
        if y > self.next_y {
            self.next_y = y;
        }
    }
}
