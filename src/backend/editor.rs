/// State machine for the cell editor popup.
///
/// At most one edit session exists at a time. Opening while a session is
/// pending supersedes it: the old buffer is discarded and the new cell's
/// value takes its place, which is what the user sees when they
/// double-click a different cell mid-edit.
#[derive(Debug, Default, PartialEq)]
pub enum CellEditor {
    #[default]
    Closed,
    Editing {
        row: usize,
        col: usize,
        buffer: String,
    },
}

impl CellEditor {
    pub fn new() -> Self {
        Self::Closed
    }

    /// Start editing `(row, col)`, pre-filling the buffer with the
    /// cell's current value.
    pub fn open(&mut self, row: usize, col: usize, current_value: &str) {
        *self = Self::Editing {
            row,
            col,
            buffer: current_value.to_string(),
        };
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    pub fn target(&self) -> Option<(usize, usize)> {
        match self {
            Self::Editing { row, col, .. } => Some((*row, *col)),
            Self::Closed => None,
        }
    }

    /// The pending text, for the popup's text field to bind to.
    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::Editing { buffer, .. } => Some(buffer),
            Self::Closed => None,
        }
    }

    /// Close the session and hand back what to write where. Returns
    /// `None` if nothing was being edited.
    pub fn commit(&mut self) -> Option<(usize, usize, String)> {
        match std::mem::take(self) {
            Self::Editing { row, col, buffer } => Some((row, col, buffer)),
            Self::Closed => None,
        }
    }

    /// Close the session without committing; the cell keeps its value.
    pub fn cancel(&mut self) {
        *self = Self::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_captures_cell_and_prefills_buffer() {
        let mut editor = CellEditor::new();
        assert!(!editor.is_open());

        editor.open(2, 1, "hello");
        assert!(editor.is_open());
        assert_eq!(editor.target(), Some((2, 1)));
        assert_eq!(editor.buffer_mut().map(|b| b.clone()), Some("hello".to_string()));
    }

    #[test]
    fn commit_yields_edited_value_and_closes() {
        let mut editor = CellEditor::new();
        editor.open(0, 0, "1");
        *editor.buffer_mut().unwrap() = "9".to_string();

        assert_eq!(editor.commit(), Some((0, 0, "9".to_string())));
        assert!(!editor.is_open());
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn cancel_discards_pending_value() {
        let mut editor = CellEditor::new();
        editor.open(0, 0, "1");
        *editor.buffer_mut().unwrap() = "scratch".to_string();

        editor.cancel();
        assert!(!editor.is_open());
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn second_open_supersedes_pending_session() {
        let mut editor = CellEditor::new();
        editor.open(0, 0, "first");
        *editor.buffer_mut().unwrap() = "half-typed".to_string();

        editor.open(3, 2, "second");
        assert_eq!(editor.commit(), Some((3, 2, "second".to_string())));
    }
}
