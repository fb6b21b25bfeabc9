/// The in-memory table every other part of the app works against.
///
/// Headers and rows keep CSV order; cells are plain text. The grid view
/// renders from this struct each frame and never holds state of its own,
/// so saving serializes exactly what the user sees.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    modified: bool,
}

impl Table {
    /// Build a table from already-parsed records. Every row is padded or
    /// truncated to the header count, so cell access is positional from
    /// here on.
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            row.resize(width, String::new());
        }
        Self {
            headers,
            rows,
            modified: false,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.headers.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// Overwrite one cell. Out-of-range coordinates are a no-op; the
    /// editor popup can outlive a table swap and must not panic.
    pub fn set_cell(&mut self, row: usize, col: usize, value: String) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
            self.modified = true;
        }
    }

    /// Every cell in row-major order. The aggregate functions scan the
    /// whole table, not a single column.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flat_map(|r| r.iter().map(|s| s.as_str()))
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// Initial pixel widths for the grid columns, from the longest cell
    /// in a prefix of the rows (headers included). Clamped so one huge
    /// cell cannot push everything else off screen.
    pub fn estimate_column_widths(&self) -> Vec<f32> {
        const SCAN_ROWS: usize = 100;
        let mut max_lens: Vec<usize> = self.headers.iter().map(|h| h.chars().count().max(4)).collect();
        for row in self.rows.iter().take(SCAN_ROWS) {
            for (col, cell) in row.iter().enumerate().take(max_lens.len()) {
                max_lens[col] = max_lens[col].max(cell.chars().count());
            }
        }
        // Average char width ~8px plus padding.
        max_lens
            .into_iter()
            .map(|len| (len as f32 * 8.0 + 16.0).clamp(60.0, 400.0))
            .collect()
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}
