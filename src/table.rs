use crate::error::{ReportError, Result};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// A single decoded cell.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Empty cells and zero-length text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Cell text with surrounding whitespace removed.
    ///
    /// Whole numbers print without a fractional part so a score typed as `90`
    /// reads back as `"90"` whether the sheet stored it as text or as a number.
    pub fn to_trimmed_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Rows of cells as decoded from the first sheet, header row first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        RawTable { rows }
    }

    /// Builds a table from string literals; empty strings become empty cells.
    ///
    /// # Examples
    /// ```
    /// use report_card::table::RawTable;
    ///
    /// let table = RawTable::from_strings(&[&["姓名", "语文"], &["张三", "90"]]);
    /// assert_eq!(table.rows.len(), 2);
    /// ```
    pub fn from_strings(rows: &[&[&str]]) -> Self {
        RawTable {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|cell| CellValue::from(*cell)).collect())
                .collect(),
        }
    }

    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    /// Decode the first worksheet of an Excel or OpenDocument workbook.
    pub fn from_excel_bytes(bytes: &[u8]) -> Result<Self> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReportError::malformed("workbook contains no sheets"))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        log::debug!(
            "decoded sheet '{}' with {} rows x {} columns",
            sheet_name,
            range.height(),
            range.width()
        );

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();

        Ok(RawTable { rows })
    }

    /// Decode comma-separated text. Every line is a row; nothing is treated as a
    /// header by the reader itself.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(CellValue::from).collect());
        }

        Ok(RawTable { rows })
    }

    /// Pick a decoder from the file name's extension.
    pub fn from_bytes(bytes: &[u8], file_name: &str) -> Result<Self> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some("csv") => Self::from_csv_bytes(bytes),
            Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => {
                Self::from_excel_bytes(bytes)
            }
            Some(ext) => Err(ReportError::UnsupportedFormat(ext.to_string())),
            None => Err(ReportError::UnsupportedFormat(format!(
                "'{}' has no extension",
                file_name
            ))),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        Self::from_bytes(&bytes, file_name)
    }
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
