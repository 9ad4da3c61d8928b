//! Workbook persistence: an `.xlsx` file with one sheet per class section.
//!
//! The first row of each sheet holds the column labels
//! (`Timestamp, Full Name, Admission No, AI Score`), every following row is
//! one record. Staff open the same file in a spreadsheet program, so labels
//! may pick up stray padding and admission numbers may be stored as numbers
//! or as text; lookups go through [`Sheet::column_index`] and
//! [`normalize_cell`].
//!
//! Reads use `calamine`, writes use `rust_xlsxwriter`. A write re-emits every
//! sheet's values, so sibling sheets keep their rows and cells; cell styling
//! is not carried over. Saves are atomic: the file is built in memory,
//! written to a temp file in the same directory and renamed over the original.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx, XlsxError};
use rsc_core::SubmissionRecord;
use rsc_core::entities::format_timestamp;

use crate::error::StoreError;

pub const COL_TIMESTAMP: &str = "Timestamp";
pub const COL_FULL_NAME: &str = "Full Name";
pub const COL_ADMISSION_NO: &str = "Admission No";
pub const COL_SCORE: &str = "AI Score";

/// Column order for newly created sheets.
pub const RECORD_COLUMNS: [&str; 4] = [COL_TIMESTAMP, COL_FULL_NAME, COL_ADMISSION_NO, COL_SCORE];

/// One cell value as the record store sees it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Blank cells, including text that is only whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Where an admission number stands in a class sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionSlot {
    /// No row carries the admission number.
    Absent,
    /// A roster row (no score yet) at this row index.
    Reserved(usize),
    /// A scored row exists: the student has submitted.
    Submitted,
}

impl Workbook {
    /// Read a workbook. Returns `Ok(None)` when the file does not exist and
    /// an empty workbook when the file is empty.
    ///
    /// # Errors
    ///
    /// `Locked` when the file cannot be opened because another program holds
    /// it, `Corrupt` when it is not a readable `.xlsx` file, `Io` otherwise.
    pub fn load(path: &Path) -> Result<Option<Self>, StoreError> {
        match fs::metadata(path) {
            Ok(meta) if meta.len() == 0 => return Ok(Some(Self::default())),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::workbook_io(path, e)),
        }

        let mut book: Xlsx<_> = match calamine::open_workbook(path) {
            Ok(book) => book,
            Err(XlsxError::Io(e)) => return Err(StoreError::workbook_io(path, e)),
            Err(e) => return Err(corrupt(path, &e)),
        };

        let mut sheets = Vec::new();
        for name in book.sheet_names() {
            let range = book
                .worksheet_range(&name)
                .map_err(|e| corrupt(path, &e))?;
            sheets.push(Sheet::from_rows(name, range.rows()));
        }
        Ok(Some(Self { sheets }))
    }

    /// Atomically replace the workbook file with this document.
    ///
    /// # Errors
    ///
    /// `Locked` if a spreadsheet program has the file open or the destination
    /// cannot be replaced, `Encode` when a sheet cannot be represented in
    /// `.xlsx`, `Io` for any other filesystem failure.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(owner) = office_owner_file(path) {
            tracing::warn!(owner = %owner.display(), "workbook is open in a spreadsheet program");
            return Err(StoreError::Locked {
                path: path.to_path_buf(),
            });
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let bytes = self.to_xlsx().map_err(|e| StoreError::Encode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io(tmp.path(), e))?;
        tmp.persist(path)
            .map_err(|e| StoreError::workbook_io(path, e.error))?;
        Ok(())
    }

    fn to_xlsx(&self) -> Result<Vec<u8>, rust_xlsxwriter::XlsxError> {
        let mut out = rust_xlsxwriter::Workbook::new();
        for sheet in &self.sheets {
            let worksheet = out.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            for (col, label) in sheet.columns.iter().enumerate() {
                worksheet.write_string(0, col_num(col)?, label.as_str())?;
            }
            for (index, row) in sheet.rows.iter().enumerate() {
                let row_num = row_num(index + 1)?;
                for (col, cell) in row.iter().enumerate() {
                    let col = col_num(col)?;
                    match cell {
                        Cell::Empty => {}
                        Cell::Number(value) => {
                            worksheet.write_number(row_num, col, *value)?;
                        }
                        Cell::Text(text) => {
                            worksheet.write_string(row_num, col, text.as_str())?;
                        }
                        Cell::Bool(value) => {
                            worksheet.write_boolean(row_num, col, *value)?;
                        }
                    }
                }
            }
        }
        out.save_to_buffer()
    }

    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Mutable sheet by name, created empty at the end if absent.
    pub fn sheet_mut_or_insert(&mut self, name: &str) -> &mut Sheet {
        let index = match self.sheets.iter().position(|sheet| sheet.name == name) {
            Some(index) => index,
            None => {
                self.sheets.push(Sheet::new(name));
                self.sheets.len() - 1
            }
        };
        &mut self.sheets[index]
    }

    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|sheet| sheet.name.clone()).collect()
    }
}

impl Sheet {
    /// Empty sheet with the standard record columns.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: RECORD_COLUMNS.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Build a sheet from raw spreadsheet rows: the first row is the header,
    /// fully blank rows are dropped, short rows are padded to the header.
    fn from_rows<'a>(name: String, mut rows: impl Iterator<Item = &'a [Data]>) -> Self {
        let columns: Vec<String> = rows
            .next()
            .map(|header| header.iter().map(header_label).collect())
            .unwrap_or_default();

        let body = rows
            .map(|row| {
                let mut cells: Vec<Cell> = row.iter().map(cell_from).collect();
                if cells.len() < columns.len() {
                    cells.resize(columns.len(), Cell::Empty);
                }
                cells
            })
            .filter(|cells| !cells.iter().all(Cell::is_blank))
            .collect();

        Self {
            name,
            columns,
            rows: body,
        }
    }

    /// Index of the column whose trimmed label equals `label`, ignoring case.
    #[must_use]
    pub fn column_index(&self, label: &str) -> Option<usize> {
        let wanted = label.trim();
        self.columns
            .iter()
            .position(|column| column.trim().eq_ignore_ascii_case(wanted))
    }

    /// Column labels with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_columns(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.trim().to_string()).collect()
    }

    /// Whether any row's admission number normalizes to `admission_no`.
    ///
    /// # Errors
    ///
    /// `MissingColumn` when the sheet has rows but no admission column.
    pub fn contains_admission_no(&self, admission_no: &str) -> Result<bool, StoreError> {
        Ok(self.first_row_for(admission_no)?.is_some())
    }

    /// Classify `admission_no` for a new submission.
    ///
    /// Roster imports add rows with an empty score; such a row reserves the
    /// student's place without counting as a submission. A sheet with no
    /// score column at all is treated as fully submitted.
    ///
    /// # Errors
    ///
    /// `MissingColumn` when the sheet has rows but no admission column.
    pub fn submission_slot(&self, admission_no: &str) -> Result<SubmissionSlot, StoreError> {
        let Some(admission_idx) = self.admission_column()? else {
            return Ok(SubmissionSlot::Absent);
        };
        let score_idx = self.column_index(COL_SCORE);
        let wanted = admission_no.trim();

        let mut reserved = None;
        for (index, row) in self.rows.iter().enumerate() {
            if row.get(admission_idx).map(normalize_cell).as_deref() != Some(wanted) {
                continue;
            }
            let scored = score_idx.is_none_or(|i| row.get(i).is_some_and(|cell| !cell.is_blank()));
            if scored {
                return Ok(SubmissionSlot::Submitted);
            }
            reserved.get_or_insert(index);
        }
        Ok(reserved.map_or(SubmissionSlot::Absent, SubmissionSlot::Reserved))
    }

    /// Decode every row into a `SubmissionRecord`, in insertion order.
    ///
    /// # Errors
    ///
    /// `MissingColumn` when the sheet has rows but lacks the name or
    /// admission column.
    pub fn records(&self) -> Result<Vec<SubmissionRecord>, StoreError> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let name_idx = self.require_column(COL_FULL_NAME)?;
        let adm_idx = self.require_column(COL_ADMISSION_NO)?;
        let ts_idx = self.column_index(COL_TIMESTAMP);
        let score_idx = self.column_index(COL_SCORE);

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let text = |idx: Option<usize>| {
                    idx.and_then(|i| row.get(i))
                        .map(normalize_cell)
                        .unwrap_or_default()
                };
                SubmissionRecord {
                    timestamp: text(ts_idx),
                    full_name: text(Some(name_idx)),
                    admission_no: text(Some(adm_idx)),
                    score: score_idx.and_then(|i| row.get(i)).and_then(cell_as_f64),
                }
            })
            .collect())
    }

    /// Append one record, adding any missing standard column first.
    /// Existing rows keep their cells; new columns are padded with blanks.
    pub fn push_record(&mut self, record: &SubmissionRecord) {
        let indices = self.ensure_record_columns();
        let mut row = vec![Cell::Empty; self.columns.len()];
        write_record(&mut row, indices, record);
        self.rows.push(row);
    }

    /// Overwrite row `index` with `record`, keeping any extra cells the row
    /// carries in non-standard columns.
    pub fn fill_row(&mut self, index: usize, record: &SubmissionRecord) {
        let indices = self.ensure_record_columns();
        let width = self.columns.len();
        if let Some(row) = self.rows.get_mut(index) {
            if row.len() < width {
                row.resize(width, Cell::Empty);
            }
            write_record(row, indices, record);
        }
    }

    fn first_row_for(&self, admission_no: &str) -> Result<Option<usize>, StoreError> {
        let Some(index) = self.admission_column()? else {
            return Ok(None);
        };
        let wanted = admission_no.trim();
        Ok(self
            .rows
            .iter()
            .position(|row| row.get(index).map(normalize_cell).as_deref() == Some(wanted)))
    }

    /// The admission column, `None` for a sheet without rows.
    fn admission_column(&self) -> Result<Option<usize>, StoreError> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        self.require_column(COL_ADMISSION_NO).map(Some)
    }

    fn ensure_record_columns(&mut self) -> [usize; 4] {
        RECORD_COLUMNS.map(|label| self.ensure_column(label))
    }

    fn ensure_column(&mut self, label: &str) -> usize {
        if let Some(index) = self.column_index(label) {
            return index;
        }
        self.columns.push(label.to_string());
        for row in &mut self.rows {
            row.push(Cell::Empty);
        }
        self.columns.len() - 1
    }

    fn require_column(&self, label: &'static str) -> Result<usize, StoreError> {
        self.column_index(label)
            .ok_or_else(|| StoreError::MissingColumn {
                sheet: self.name.clone(),
                column: label,
            })
    }
}

/// Header labels keep their padding; only the lookups trim.
fn header_label(data: &Data) -> String {
    match cell_from(data) {
        Cell::Text(label) => label,
        other => normalize_cell(&other),
    }
}

fn write_record(row: &mut [Cell], indices: [usize; 4], record: &SubmissionRecord) {
    let [ts, name, adm, score] = indices;
    row[ts] = Cell::text(record.timestamp.as_str());
    row[name] = Cell::text(record.full_name.as_str());
    row[adm] = Cell::text(record.admission_no.as_str());
    row[score] = record.score.map_or(Cell::Empty, Cell::Number);
}

/// Canonical text form of a cell.
///
/// Integral numbers print without a fractional part so that `1001`,
/// `1001.0` and `"1001"` compare equal.
#[must_use]
pub fn normalize_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(text) => text.trim().to_string(),
        Cell::Number(value) => format_float(*value),
        Cell::Bool(value) => value.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

fn cell_as_f64(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) => Some(*value),
        Cell::Text(text) => text.trim().parse().ok(),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn cell_from(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Float(value) => Cell::Number(*value),
        Data::Bool(value) => Cell::Bool(*value),
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Cell::Text(text.clone())
        }
        Data::DateTime(value) => value
            .as_datetime()
            .map_or_else(|| Cell::Number(value.as_f64()), |at| Cell::Text(format_timestamp(at))),
        Data::Error(error) => Cell::Text(error.to_string()),
    }
}

/// Owner file a spreadsheet program leaves next to a workbook it has open:
/// `~$name` (Excel) or `.~lock.name#` (LibreOffice).
#[must_use]
pub fn office_owner_file(path: &Path) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    [format!("~${name}"), format!(".~lock.{name}#")]
        .into_iter()
        .map(|owner| dir.join(owner))
        .find(|owner| owner.exists())
}

fn corrupt(path: &Path, error: &XlsxError) -> StoreError {
    StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

fn row_num(index: usize) -> Result<u32, rust_xlsxwriter::XlsxError> {
    u32::try_from(index).map_err(|_| rust_xlsxwriter::XlsxError::RowColumnLimitError)
}

fn col_num(index: usize) -> Result<u16, rust_xlsxwriter::XlsxError> {
    u16::try_from(index).map_err(|_| rust_xlsxwriter::XlsxError::RowColumnLimitError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn record(name: &str, adm: &str, score: Option<f64>) -> SubmissionRecord {
        SubmissionRecord {
            timestamp: "2026-01-05 09:12:00".into(),
            full_name: name.into(),
            admission_no: adm.into(),
            score,
        }
    }

    fn text(value: &str) -> Cell {
        Cell::text(value)
    }

    #[rstest]
    #[case(Cell::Number(1001.0), "1001")]
    #[case(Cell::text(" 1001 "), "1001")]
    #[case(Cell::text("RSC/2026/001"), "RSC/2026/001")]
    #[case(Cell::Empty, "")]
    #[case(Cell::Number(9.5), "9.5")]
    fn cells_normalize(#[case] cell: Cell, #[case] expected: &str) {
        assert_eq!(normalize_cell(&cell), expected);
    }

    #[test]
    fn column_lookup_ignores_case_and_padding() {
        let sheet = Sheet {
            name: "JSS 1A".into(),
            columns: vec![
                "Timestamp".into(),
                " full name".into(),
                " admission no ".into(),
            ],
            rows: Vec::new(),
        };
        assert_eq!(sheet.column_index("Admission No"), Some(2));
        assert_eq!(sheet.column_index("Full Name"), Some(1));
        assert_eq!(sheet.column_index("AI Score"), None);
        assert_eq!(
            sheet.trimmed_columns(),
            vec!["Timestamp", "full name", "admission no"]
        );
    }

    #[test]
    fn numeric_admission_cells_match_text_lookup() {
        let sheet = Sheet {
            name: "SS 2B".into(),
            columns: RECORD_COLUMNS.iter().map(ToString::to_string).collect(),
            rows: vec![vec![text("t"), text("Ada"), Cell::Number(1001.0), Cell::Number(9.0)]],
        };
        assert!(sheet.contains_admission_no("1001").unwrap());
        assert!(!sheet.contains_admission_no("1002").unwrap());
    }

    #[test]
    fn roster_rows_reserve_without_submitting() {
        let mut sheet = Sheet::new("JSS 1A");
        sheet.push_record(&record("Ada", "1", None));
        sheet.push_record(&record("Grace", "2", Some(8.0)));

        assert_eq!(sheet.submission_slot("1").unwrap(), SubmissionSlot::Reserved(0));
        assert_eq!(sheet.submission_slot("2").unwrap(), SubmissionSlot::Submitted);
        assert_eq!(sheet.submission_slot("3").unwrap(), SubmissionSlot::Absent);

        sheet.fill_row(0, &record("Ada Lovelace", "1", Some(9.0)));
        assert_eq!(sheet.submission_slot("1").unwrap(), SubmissionSlot::Submitted);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.records().unwrap()[0].full_name, "Ada Lovelace");
    }

    #[test]
    fn sheet_without_score_column_counts_rows_as_submitted() {
        let sheet = Sheet {
            name: "JSS 2A".into(),
            columns: vec!["Full Name".into(), "Admission No".into()],
            rows: vec![vec![text("Ada"), text("1")]],
        };
        assert_eq!(sheet.submission_slot("1").unwrap(), SubmissionSlot::Submitted);
    }

    #[test]
    fn push_record_fills_missing_columns() {
        let mut sheet = Sheet {
            name: "JSS 2C".into(),
            columns: vec!["Full Name ".into(), "Admission No".into()],
            rows: vec![vec![text("Grace Hopper"), Cell::Number(7.0)]],
        };
        sheet.push_record(&record("Ada Lovelace", "1001", Some(9.0)));

        assert_eq!(
            sheet.columns,
            vec!["Full Name ", "Admission No", "Timestamp", "AI Score"]
        );
        assert_eq!(
            sheet.rows[0],
            vec![text("Grace Hopper"), Cell::Number(7.0), Cell::Empty, Cell::Empty]
        );
        assert_eq!(
            sheet.rows[1],
            vec![
                text("Ada Lovelace"),
                text("1001"),
                text("2026-01-05 09:12:00"),
                Cell::Number(9.0)
            ]
        );

        let records = sheet.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].admission_no, "7");
        assert_eq!(records[0].score, None);
        assert_eq!(records[1].score, Some(9.0));
    }

    #[test]
    fn records_require_identity_columns() {
        let sheet = Sheet {
            name: "Broken".into(),
            columns: vec!["Whatever".into()],
            rows: vec![vec![text("x")]],
        };
        assert!(matches!(
            sheet.records(),
            Err(StoreError::MissingColumn { column: COL_FULL_NAME, .. })
        ));
        assert!(sheet.contains_admission_no("1").is_err());
        assert!(sheet.submission_slot("1").is_err());
    }

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Workbook::load(&dir.path().join("none.xlsx")).unwrap(), None);
    }

    #[test]
    fn load_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        fs::write(&path, "PK\u{3}\u{4} not a workbook").unwrap();
        assert!(matches!(
            Workbook::load(&path),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn save_then_load_preserves_sheets_and_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("book.xlsx");
        let mut book = Workbook::default();
        book.sheet_mut_or_insert("SS 1A").push_record(&record("A", "1", None));
        book.sheet_mut_or_insert("JSS 1A").push_record(&record("B", "2", Some(8.5)));
        book.sheets.push(Sheet {
            name: "Notes".into(),
            columns: vec!["Label".into(), "Flag".into()],
            rows: vec![vec![text("keep me"), Cell::Bool(true)]],
        });
        book.save(&path).unwrap();

        let loaded = Workbook::load(&path).unwrap().unwrap();
        assert_eq!(loaded.sheet_names(), vec!["SS 1A", "JSS 1A", "Notes"]);
        assert_eq!(loaded, book);
    }

    #[test]
    fn open_spreadsheet_blocks_save_as_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Project_Results.xlsx");
        fs::write(dir.path().join("~$Project_Results.xlsx"), "owner").unwrap();

        let err = Workbook::default().save(&path).unwrap_err();
        assert!(err.is_retriable());
        assert!(!path.exists());

        fs::remove_file(dir.path().join("~$Project_Results.xlsx")).unwrap();
        fs::write(dir.path().join(".~lock.Project_Results.xlsx#"), "owner").unwrap();
        assert!(office_owner_file(&path).is_some());
    }
}
