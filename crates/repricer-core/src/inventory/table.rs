use super::row::{DATA_COLUMNS, InventoryRow, RowStatus, STATUS_TITLE};
use crate::{Error, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One CSV record exactly as it was read, terminator included
#[derive(Debug, Clone)]
struct RawRecord {
    text: String,
    cells: Vec<String>,
}

impl RawRecord {
    fn new(text: &str, cells: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            cells: cells.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn terminator(&self) -> &'static str {
        if self.text.ends_with("\r\n") {
            "\r\n"
        } else if self.text.ends_with('\n') {
            "\n"
        } else if self.text.ends_with('\r') {
            "\r"
        } else {
            ""
        }
    }

    /// Set one cell and re-encode the record; other cells keep their text
    fn set_cell(&mut self, column: usize, value: &str) -> Result<()> {
        let current = self.cells.get(column).map(String::as_str).unwrap_or("");
        if current == value {
            return Ok(());
        }

        if self.cells.len() <= column {
            self.cells.resize(column + 1, String::new());
        }
        self.cells[column] = value.to_string();

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(&self.cells)?;
        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        let encoded = String::from_utf8(bytes)
            .map_err(|e| Error::Load(format!("record is not valid UTF-8: {}", e)))?;

        self.text = format!("{}{}", encoded.trim_end_matches('\n'), self.terminator());
        Ok(())
    }
}

/// Where each piece of the file goes when it is written back
#[derive(Debug)]
enum Segment {
    /// Bytes the table does not interpret: blank lines, empty records
    Text(String),
    Header,
    Row(usize),
}

/// The inventory sheet, loaded once and rewritten after every status change.
///
/// Only status cells are ever re-encoded. Every other byte of the file,
/// including blank lines, quoting and number formatting, is written back as
/// it was read.
#[derive(Debug)]
pub struct InventoryTable {
    path: PathBuf,
    bom: bool,
    segments: Vec<Segment>,
    header: Option<RawRecord>,
    rows: Vec<InventoryRow>,
    records: Vec<RawRecord>,
    backup: Option<PathBuf>,
}

impl InventoryTable {
    /// Read and validate an inventory CSV file
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!("Reading inventory from: {}", path.display());

        if !path.exists() {
            return Err(Error::Load(format!(
                "inventory file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Load(format!("{}: {}", path.display(), e)))?;

        let table = Self::parse(path.to_path_buf(), &content)?;

        tracing::info!(
            "Loaded {} inventory rows from {}",
            table.rows.len(),
            path.display()
        );

        Ok(table)
    }

    /// Parse CSV text that belongs to `path`
    pub fn parse(path: PathBuf, content: &str) -> Result<Self> {
        // UTF-8 BOM left behind by spreadsheet exports
        let (bom, text) = match content.strip_prefix('\u{FEFF}') {
            Some(rest) => (true, rest),
            None => (false, content),
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut segments = Vec::new();
        let mut header = None;
        let mut rows = Vec::new();
        let mut records = Vec::new();

        let mut record = csv::StringRecord::new();
        let mut consumed = 0;
        while reader
            .read_record(&mut record)
            .map_err(|e| Error::Load(format!("malformed CSV: {}", e)))?
        {
            let start = record.position().map_or(consumed, |p| p.byte() as usize);
            let end = reader.position().byte() as usize;
            if start > consumed {
                segments.push(Segment::Text(text[consumed..start].to_string()));
            }
            let raw = &text[start..end];
            consumed = end;

            let line = record.position().map_or(0, |p| p.line() as usize);
            let cells: Vec<&str> = record.iter().collect();

            if cells.iter().all(|c| c.trim().is_empty()) {
                segments.push(Segment::Text(raw.to_string()));
                continue;
            }

            if header.is_none() && rows.is_empty() && is_header(&cells) {
                header = Some(RawRecord::new(raw, &cells));
                segments.push(Segment::Header);
                continue;
            }

            rows.push(InventoryRow::from_cells(&cells, line)?);
            records.push(RawRecord::new(raw, &cells));
            segments.push(Segment::Row(rows.len() - 1));
        }
        if consumed < text.len() {
            segments.push(Segment::Text(text[consumed..].to_string()));
        }

        Ok(Self {
            path,
            bom,
            segments,
            header,
            rows,
            records,
            backup: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn rows(&self) -> &[InventoryRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&InventoryRow> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_header(&self) -> bool {
        self.header.is_some()
    }

    /// Backup written before the first rewrite, if any
    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// Number of rows per status, in reporting order
    pub fn status_counts(&self) -> Vec<(RowStatus, usize)> {
        RowStatus::all()
            .into_iter()
            .map(|status| {
                let count = self.rows.iter().filter(|r| r.status == status).count();
                (status, count)
            })
            .collect()
    }

    /// Record a row's status and rewrite the file
    pub fn persist(&mut self, index: usize, status: RowStatus) -> Result<()> {
        if index >= self.rows.len() {
            return Err(Error::Load(format!("no inventory row at index {}", index)));
        }
        self.set_status(index, status)?;

        tracing::debug!("Row {} -> {}", index + 1, status);
        self.write()
    }

    /// Clear statuses accepted by `select` back to unset; returns how many changed
    pub fn reset<F>(&mut self, select: F) -> Result<usize>
    where
        F: Fn(RowStatus) -> bool,
    {
        let selected: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.status.is_terminal() && select(row.status))
            .map(|(index, _)| index)
            .collect();

        for &index in &selected {
            self.set_status(index, RowStatus::Unset)?;
        }

        if !selected.is_empty() {
            self.write()?;
        }
        Ok(selected.len())
    }

    fn set_status(&mut self, index: usize, status: RowStatus) -> Result<()> {
        self.rows[index].status = status;

        let record = &mut self.records[index];
        record.set_cell(DATA_COLUMNS, status.as_str())?;

        // A status column that appears in the data gets a title too
        if record.cells.len() > DATA_COLUMNS
            && let Some(header) = &mut self.header
            && header.cells.len() <= DATA_COLUMNS
        {
            header.set_cell(DATA_COLUMNS, STATUS_TITLE)?;
        }
        Ok(())
    }

    /// Atomically replace the file with the current table
    fn write(&mut self) -> Result<()> {
        self.ensure_backup()?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut content = String::new();
        if self.bom {
            content.push('\u{FEFF}');
        }
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => content.push_str(text),
                Segment::Header => {
                    if let Some(header) = &self.header {
                        content.push_str(&header.text);
                    }
                }
                Segment::Row(index) => content.push_str(&self.records[*index].text),
            }
        }

        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        Ok(())
    }

    fn ensure_backup(&mut self) -> Result<()> {
        if self.backup.is_some() || !self.path.exists() {
            return Ok(());
        }

        let backup = backup_path_for(&self.path, &chrono::Local::now());
        std::fs::copy(&self.path, &backup)?;
        tracing::info!("Backed up inventory to {}", backup.display());

        self.backup = Some(backup);
        Ok(())
    }
}

/// `<stem>.backup-YYYYmmdd-HHMMSS.<ext>` next to the original
pub fn backup_path_for(path: &Path, at: &chrono::DateTime<chrono::Local>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "inventory".to_string());
    let stamp = at.format("%Y%m%d-%H%M%S");
    let name = match path.extension() {
        Some(ext) => format!("{}.backup-{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}.backup-{}", stem, stamp),
    };
    path.with_file_name(name)
}

fn is_header(cells: &[&str]) -> bool {
    cells
        .first()
        .map(|c| c.replace(' ', "").eq_ignore_ascii_case("productline"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SHEET: &str = "\
Magic,Kamigawa: Neon Dynasty,Lion Sash,26,R,3,4.20,,English
Magic,Dominaria,\"Teferi, Hero of Dominaria\",207,M,1,$12.50,,English
Magic,Dominaria,Llanowar Elves,168,C,8,0.25,Foil,English
";

    fn write_sheet(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("inventory.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_headerless_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let table = InventoryTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert!(!table.has_header());
        assert_eq!(table.rows()[1].product_name, "Teferi, Hero of Dominaria");
        assert!(table.rows().iter().all(|r| r.status == RowStatus::Unset));
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let err = InventoryTable::load(Path::new("/nonexistent/inventory.csv")).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn test_load_rejects_malformed_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, "Magic,Dominaria,Opt\n");

        let err = InventoryTable::load(&path).unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }

    #[test]
    fn test_persist_adds_status_column_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let mut table = InventoryTable::load(&path).unwrap();
        table.persist(0, RowStatus::Success).unwrap();

        let backup = table.backup_path().unwrap().to_path_buf();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), SHEET);

        let reloaded = InventoryTable::load(&path).unwrap();
        assert_eq!(reloaded.rows()[0].status, RowStatus::Success);
        assert_eq!(reloaded.rows()[1].status, RowStatus::Unset);
        assert_eq!(reloaded.rows()[1].product_name, "Teferi, Hero of Dominaria");

        let first_line = std::fs::read_to_string(&path).unwrap();
        assert!(first_line.lines().next().unwrap().ends_with(",SUCCESS"));
    }

    #[test]
    fn test_backup_is_created_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let mut table = InventoryTable::load(&path).unwrap();
        table.persist(0, RowStatus::Success).unwrap();
        let first = table.backup_path().unwrap().to_path_buf();
        table.persist(2, RowStatus::Foil).unwrap();

        assert_eq!(table.backup_path().unwrap(), first);
        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .contains(".backup-")
            })
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn test_header_is_preserved_and_extended() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "Product Line,Set Name,Product Name,Number,Rarity,Quantity,TCG Marketplace Price,Foil,Language\n{}",
            SHEET
        );
        let path = write_sheet(&dir, &content);

        let mut table = InventoryTable::load(&path).unwrap();
        assert!(table.has_header());
        assert_eq!(table.len(), 3);

        table.persist(1, RowStatus::Failed).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.lines().next().unwrap().ends_with(",Language,Status"));

        let reloaded = InventoryTable::load(&path).unwrap();
        assert_eq!(reloaded.rows()[1].status, RowStatus::Failed);
    }

    #[test]
    fn test_reset_clears_selected_statuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let mut table = InventoryTable::load(&path).unwrap();
        table.persist(0, RowStatus::Success).unwrap();
        table.persist(1, RowStatus::Failed).unwrap();

        let changed = table.reset(|s| s == RowStatus::Failed).unwrap();
        assert_eq!(changed, 1);

        let reloaded = InventoryTable::load(&path).unwrap();
        assert_eq!(reloaded.rows()[0].status, RowStatus::Success);
        assert_eq!(reloaded.rows()[1].status, RowStatus::Unset);
    }

    #[test]
    fn test_blank_lines_and_bom_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("\u{FEFF}{},,,,,,,,\n", SHEET);
        let path = write_sheet(&dir, &content);

        let mut table = InventoryTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].product_line, "Magic");

        table.persist(1, RowStatus::Skipped).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let expected = content.replace("$12.50,,English\n", "$12.50,,English,SKIPPED\n");
        assert_eq!(written, expected);
    }

    #[test]
    fn test_persist_leaves_other_bytes_untouched() {
        let content = "Product Line,Set Name,Product Name,Number,Rarity,Quantity,TCG Marketplace Price,Foil,Language\r\n\
Magic,Dominaria,Opt,60,C,4.0,\"$1,234.56\",,English\r\n\
\r\n\
Magic,Dominaria, Shock ,1,C,,0.125,,English\r\n\
  ,,,,,,,,\r\n\
Magic,Dominaria,Llanowar Elves,168,C,8,0.25,Foil,English,,,";
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, content);

        let mut table = InventoryTable::load(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[0].quantity, 4);
        assert_eq!(table.rows()[1].product_name, "Shock");

        table.persist(0, RowStatus::Success).unwrap();

        let expected = content
            .replacen("Language\r\n", "Language,Status\r\n", 1)
            .replacen("English\r\n", "English,SUCCESS\r\n", 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);

        table.persist(2, RowStatus::Foil).unwrap();
        let expected = expected.replacen("English,,,", "English,FOIL,,", 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);

        let reloaded = InventoryTable::load(&path).unwrap();
        assert_eq!(reloaded.rows()[0].status, RowStatus::Success);
        assert_eq!(reloaded.rows()[1].status, RowStatus::Unset);
        assert_eq!(reloaded.rows()[2].status, RowStatus::Foil);
    }

    #[test]
    fn test_unchanged_status_does_not_touch_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let mut table = InventoryTable::load(&path).unwrap();
        table.persist(0, RowStatus::Unset).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), SHEET);
    }

    #[test]
    fn test_status_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sheet(&dir, SHEET);

        let mut table = InventoryTable::load(&path).unwrap();
        table.persist(2, RowStatus::Foil).unwrap();

        let counts = table.status_counts();
        assert_eq!(counts[0], (RowStatus::Unset, 2));
        assert!(counts.contains(&(RowStatus::Foil, 1)));
    }

    #[test]
    fn test_backup_path_format() {
        let at = chrono::Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let backup = backup_path_for(Path::new("/data/mtgedit.csv"), &at);
        assert_eq!(
            backup,
            PathBuf::from("/data/mtgedit.backup-20240309-140507.csv")
        );
    }
}
