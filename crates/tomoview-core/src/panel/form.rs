use std::ops::{Deref, DerefMut};

/// Text shown in and typed into the properties panel fields.
#[derive(Debug, Default)]
pub struct PanelForm {
    pub units: String,
    /// Physical X, Y, Z lengths.
    pub lengths: [String; 3],
    pub tilt: TiltAnglesSection,
}

impl PanelForm {
    pub fn clear_fields(&mut self) {
        self.units.clear();
        for length in &mut self.lengths {
            length.clear();
        }
    }
}

/// "Tilt Angles" separator, the "Set Tilt Angles" button and the table.
#[derive(Debug, Default)]
pub struct TiltAnglesSection {
    pub separator_visible: bool,
    pub button_visible: bool,
    pub table: TiltAnglesTable,
}

impl TiltAnglesSection {
    pub fn show(&mut self) {
        self.separator_visible = true;
        self.button_visible = true;
        self.table.show();
    }

    pub fn hide(&mut self) {
        self.separator_visible = false;
        self.button_visible = false;
        self.table.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.separator_visible && self.button_visible && self.table.is_visible()
    }
}

/// Row-indexed table of cell text.
///
/// Changing a cell records a `(row, column)` change for the owner to pick up
/// with [`TiltAnglesTable::take_cell_changes`], unless echo is suppressed.
#[derive(Debug, Default)]
pub struct TiltAnglesTable {
    cells: Vec<Vec<String>>,
    column_count: usize,
    visible: bool,
    echo_suppressed: bool,
    cell_changes: Vec<(usize, usize)>,
}

impl TiltAnglesTable {
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn set_row_count(&mut self, rows: usize) {
        let columns = self.column_count;
        self.cells.resize_with(rows, || vec![String::new(); columns]);
    }

    pub fn set_column_count(&mut self, columns: usize) {
        self.column_count = columns;
        for row in &mut self.cells {
            row.resize(columns, String::new());
        }
    }

    pub fn cell_text(&self, row: usize, column: usize) -> Option<&str> {
        self.cells.get(row)?.get(column).map(String::as_str)
    }

    /// Returns `false` if the cell does not exist.
    pub fn set_cell_text(&mut self, row: usize, column: usize, text: impl Into<String>) -> bool {
        let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(column)) else {
            return false;
        };
        let text = text.into();
        if *cell == text {
            return true;
        }
        *cell = text;
        if !self.echo_suppressed {
            self.cell_changes.push((row, column));
        }
        true
    }

    /// Empty every cell, keeping the row and column counts. Pending cell
    /// changes are dropped.
    pub fn clear(&mut self) {
        self.cell_changes.clear();
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                cell.clear();
            }
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_echo_suppressed(&self) -> bool {
        self.echo_suppressed
    }

    /// Cell edits made through the returned guard are not recorded as
    /// changes. The previous state comes back when the guard drops.
    pub fn suppress_echo(&mut self) -> EchoGuard<'_> {
        let previous = std::mem::replace(&mut self.echo_suppressed, true);
        EchoGuard {
            table: self,
            previous,
        }
    }

    pub fn take_cell_changes(&mut self) -> Vec<(usize, usize)> {
        std::mem::take(&mut self.cell_changes)
    }

    pub fn has_cell_changes(&self) -> bool {
        !self.cell_changes.is_empty()
    }
}

pub struct EchoGuard<'a> {
    table: &'a mut TiltAnglesTable,
    previous: bool,
}

impl Deref for EchoGuard<'_> {
    type Target = TiltAnglesTable;

    fn deref(&self) -> &Self::Target {
        self.table
    }
}

impl DerefMut for EchoGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.table
    }
}

impl Drop for EchoGuard<'_> {
    fn drop(&mut self) {
        self.table.echo_suppressed = self.previous;
    }
}

/// Shortest text that parses back to exactly `value` (`5.0` shows as `"5"`).
pub fn format_number(value: f64) -> String {
    format!("{value}")
}

/// Parse a finite number, ignoring surrounding whitespace.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_format_without_trailing_zero() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(7.5), "7.5");
    }

    #[test]
    fn parse_rejects_garbage_and_non_finite() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut table = TiltAnglesTable::default();
        table.set_column_count(1);
        table.set_row_count(2);
        {
            let mut guard = table.suppress_echo();
            guard.set_cell_text(0, 0, "1");
            assert!(guard.is_echo_suppressed());
        }
        assert!(!table.is_echo_suppressed());
        assert!(!table.has_cell_changes());

        table.set_cell_text(1, 0, "2");
        assert_eq!(table.take_cell_changes(), vec![(1, 0)]);
    }

    #[test]
    fn unchanged_text_is_not_a_change() {
        let mut table = TiltAnglesTable::default();
        table.set_column_count(1);
        table.set_row_count(1);
        table.set_cell_text(0, 0, "3");
        table.take_cell_changes();
        table.set_cell_text(0, 0, "3");
        assert!(!table.has_cell_changes());
        assert!(!table.set_cell_text(4, 0, "1"));
    }

    #[test]
    fn clear_drops_pending_changes() {
        let mut table = TiltAnglesTable::default();
        table.set_column_count(1);
        table.set_row_count(2);
        table.set_cell_text(1, 0, "9");
        assert!(table.has_cell_changes());

        table.clear();

        assert!(!table.has_cell_changes());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell_text(1, 0), Some(""));
    }
}
