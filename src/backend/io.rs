use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use super::table::Table;

/// Read a CSV file into a [`Table`]. The first record becomes the header
/// row; remaining records become data rows, padded to the header count.
pub fn read_table(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {:?}", path))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() {
        anyhow::bail!("File {:?} contains no header row", path);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.with_context(|| format!("Malformed CSV record in {:?}", path))?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }

    Ok(Table::new(headers, rows))
}

/// Write a [`Table`] back out as CSV: header record first, then every
/// row, with the csv crate's default quoting.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = csv::WriterBuilder::new().from_writer(BufWriter::new(file));

    writer
        .write_record(table.headers())
        .context("Failed to write CSV header")?;
    for row in table.rows() {
        writer.write_record(row).context("Failed to write CSV row")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

/// Export the table as a JSON array of objects keyed by header name.
/// Serializes the in-memory model, so committed edits are included.
pub fn export_json(path: &Path, table: &Table) -> Result<()> {
    let output = File::create(path).with_context(|| format!("Failed to create file: {:?}", path))?;
    let mut writer = BufWriter::new(output);

    writer.write_all(b"[")?;
    for (i, row) in table.rows().iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        let mut map = serde_json::Map::new();
        for (col, value) in row.iter().enumerate() {
            let key = table
                .headers()
                .get(col)
                .cloned()
                .unwrap_or_else(|| format!("Col {}", col));
            map.insert(key, serde_json::Value::String(value.clone()));
        }
        serde_json::to_writer(&mut writer, &map).context("Failed to serialize row as JSON")?;
    }
    writer.write_all(b"]")?;
    writer.flush().context("Failed to flush JSON output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn read_preserves_column_and_row_order() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "A,B\n1,2\n3,4")?;

        let table = read_table(file.path())?;
        assert_eq!(table.headers(), &["A", "B"]);
        assert_eq!(table.rows(), &[vec!["1".to_string(), "2".into()], vec!["3".into(), "4".into()]]);
        Ok(())
    }

    #[test]
    fn read_pads_short_records() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "A,B,C\n1,2\n")?;

        let table = read_table(file.path())?;
        assert_eq!(table.get_cell(0, 2), Some(""));
        Ok(())
    }

    #[test]
    fn read_missing_file_is_an_error() {
        let err = read_table(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open file"));
    }

    #[test]
    fn read_empty_file_is_an_error() -> Result<()> {
        let file = NamedTempFile::new()?;
        let err = read_table(file.path()).unwrap_err();
        assert!(err.to_string().contains("no header row"));
        Ok(())
    }

    #[test]
    fn round_trip_without_edits_is_lossless() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "name,qty\nwidget,3\n\"a,b\",\"say \"\"hi\"\"\"\n")?;

        let table = read_table(file.path())?;
        let out = NamedTempFile::new()?;
        write_table(out.path(), &table)?;

        let again = read_table(out.path())?;
        assert_eq!(table, again);
        assert_eq!(again.get_cell(1, 0), Some("a,b"));
        assert_eq!(again.get_cell(1, 1), Some("say \"hi\""));
        Ok(())
    }

    #[test]
    fn save_reflects_committed_edits() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(file, "A,B\n1,2\n3,4")?;

        let mut table = read_table(file.path())?;
        table.set_cell(1, 0, "9".into());

        let out = NamedTempFile::new()?;
        write_table(out.path(), &table)?;

        let saved = read_table(out.path())?;
        assert_eq!(saved.get_cell(1, 0), Some("9"));
        assert_eq!(saved.get_cell(1, 1), Some("4"));
        Ok(())
    }

    #[test]
    fn json_export_keys_cells_by_header() -> Result<()> {
        let table = Table::new(
            vec!["name".into(), "qty".into()],
            vec![vec!["widget".into(), "3".into()]],
        );
        let out = NamedTempFile::new()?;
        export_json(out.path(), &table)?;

        let text = std::fs::read_to_string(out.path())?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value[0]["name"], "widget");
        assert_eq!(value[0]["qty"], "3");
        Ok(())
    }
}
