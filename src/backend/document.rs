use anyhow::Result;
use std::path::{Path, PathBuf};

use super::io;
use super::table::Table;

/// The one open file: its table and where it came from. Opening a new
/// file replaces everything wholesale, so edits never leak between
/// documents.
#[derive(Debug, Default)]
pub struct Document {
    table: Table,
    path: Option<PathBuf>,
}

impl Document {
    pub fn open(path: &Path) -> Result<Self> {
        let table = io::read_table(path)?;
        Ok(Self {
            table,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn file_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "[No Name]".to_string())
    }

    /// Serialize the table (committed edits included) to `path`, which
    /// becomes the document's path on success.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        io::write_table(path, &self.table)?;
        self.table.mark_saved();
        self.path = Some(path.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn open_sets_table_and_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "A,B\n1,2\n")?;

        let doc = Document::open(file.path())?;
        assert_eq!(doc.table().headers(), &["A", "B"]);
        assert_eq!(doc.path(), Some(file.path()));
        assert!(!doc.file_name().is_empty());
        Ok(())
    }

    #[test]
    fn save_as_clears_modified_and_retargets_path() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "A,B\n1,2\n")?;

        let mut doc = Document::open(file.path())?;
        doc.table_mut().set_cell(0, 0, "9".into());
        assert!(doc.table().is_modified());

        let out = NamedTempFile::new()?;
        doc.save_as(out.path())?;
        assert!(!doc.table().is_modified());
        assert_eq!(doc.path(), Some(out.path()));

        let saved = io::read_table(out.path())?;
        assert_eq!(saved.get_cell(0, 0), Some("9"));
        Ok(())
    }

    #[test]
    fn opening_a_second_file_discards_prior_edits() -> Result<()> {
        let mut first = NamedTempFile::new()?;
        write!(first, "A,B\n1,2\n")?;
        let mut second = NamedTempFile::new()?;
        write!(second, "X\nonly\n")?;

        let mut doc = Document::open(first.path())?;
        doc.table_mut().set_cell(0, 0, "edited".into());

        doc = Document::open(second.path())?;
        assert_eq!(doc.table().headers(), &["X"]);
        assert_eq!(doc.table().get_cell(0, 0), Some("only"));
        assert!(!doc.table().is_modified());
        assert_eq!(doc.path(), Some(second.path()));
        Ok(())
    }
}
