//! Reading and writing composition tables.
//!
//! The file format is chosen from the extension:
//!
//! - `.xlsx`, `.xlsm`, `.xls`, `.ods`: spreadsheets (only `.xlsx` can be written)
//! - `.csv`: comma-separated
//! - `.tsv`, `.txt`: tab-separated

mod delimited;
mod spreadsheet;

pub use delimited::{read_delimited, write_delimited};
pub use spreadsheet::{read_spreadsheet, write_xlsx};

use crate::data::{RawTable, TextTable};
use crate::error::{NormError, Result};
use std::path::Path;

/// Supported table file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Xlsx,
    Xls,
    Ods,
    Csv,
    Tsv,
}

impl TableFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            "ods" => Ok(Self::Ods),
            "csv" => Ok(Self::Csv),
            "tsv" | "txt" => Ok(Self::Tsv),
            _ => Err(NormError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Whether tables can be written in this format.
    pub fn is_writable(self) -> bool {
        matches!(self, Self::Xlsx | Self::Csv | Self::Tsv)
    }
}

/// Read a table file into raw cells.
///
/// `sheet` selects a worksheet by name for spreadsheet formats; the first
/// worksheet is used when it is `None`. It is ignored for delimited files.
pub fn read_table<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<RawTable> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx | TableFormat::Xls | TableFormat::Ods => read_spreadsheet(path, sheet),
        TableFormat::Csv => read_delimited(path, b','),
        TableFormat::Tsv => read_delimited(path, b'\t'),
    }
}

/// Write a rendered table, overwriting any existing file.
pub fn write_table<P: AsRef<Path>>(path: P, table: &TextTable) -> Result<()> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Xlsx => write_xlsx(path, table),
        TableFormat::Csv => write_delimited(path, b',', table),
        TableFormat::Tsv => write_delimited(path, b'\t', table),
        TableFormat::Xls | TableFormat::Ods => Err(NormError::UnsupportedFormat(format!(
            "{} (output must be .xlsx, .csv or .tsv)",
            path.display()
        ))),
    }
}
