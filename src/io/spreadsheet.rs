//! Spreadsheet tables.
//!
//! Workbooks are read with calamine (xlsx, xlsm, xls, ods) and written as
//! xlsx with rust_xlsxwriter. Only one worksheet is read or written.

use crate::data::{Cell, RawTable, TextTable};
use crate::error::{NormError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use log::warn;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// Read one worksheet; its first row is the header.
///
/// Trailing header cells that are blank end the table; anything to their
/// right is dropped.
pub fn read_spreadsheet<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<RawTable> {
    let path = path.as_ref();
    // Surface a missing file as an I/O error rather than a workbook error.
    std::fs::metadata(path)?;

    let mut workbook = open_workbook_auto(path)?;
    let range = match sheet {
        Some(name) => workbook.worksheet_range(name)?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| NormError::EmptyData("workbook has no worksheets".to_string()))??,
    };

    let mut rows = range.rows();
    let header_cells: Vec<Cell> = match rows.next() {
        Some(cells) => cells.iter().map(to_cell).collect(),
        None => return Err(NormError::EmptyData("worksheet is empty".to_string())),
    };

    let width = header_cells
        .iter()
        .rposition(|c| !c.is_blank())
        .map(|i| i + 1)
        .unwrap_or(0);
    let header: Vec<String> = header_cells[..width].iter().map(Cell::to_label).collect();

    let mut data = Vec::new();
    for cells in rows {
        let mut row: Vec<Cell> = cells.iter().map(to_cell).collect();
        if row.len() > width {
            if row[width..].iter().any(|c| !c.is_blank()) {
                warn!(
                    "Dropping cells beyond column {} that have no header in row {}",
                    width,
                    data.len() + 2
                );
            }
            row.truncate(width);
        }
        data.push(row);
    }

    Ok(RawTable::new(header, data))
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::from(s.as_str()),
        Data::Empty => Cell::Empty,
        // Booleans, dates and error cells are kept as text and coerce to missing.
        other => Cell::Text(other.to_string()),
    }
}

/// Write a rendered table to the first worksheet of a new xlsx workbook.
///
/// Empty strings leave the cell blank.
pub fn write_xlsx<P: AsRef<Path>>(path: P, table: &TextTable) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (j, name) in table.header.iter().enumerate() {
        worksheet.write_string(0, col_num(j)?, name.as_str())?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = row_num(i + 1)?;
        for (j, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet.write_string(r, col_num(j)?, value.as_str())?;
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}

fn row_num(i: usize) -> Result<u32> {
    u32::try_from(i).map_err(|_| NormError::InvalidParameter(format!("row {} out of range", i)))
}

fn col_num(j: usize) -> Result<u16> {
    u16::try_from(j)
        .map_err(|_| NormError::InvalidParameter(format!("column {} out of range", j)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> TextTable {
        TextTable {
            header: vec!["Sample".into(), "Point".into(), "SiO2".into(), "CaO".into()],
            rows: vec![
                vec!["C1".into(), "Pt1".into(), "633333".into(), "316667".into()],
                vec!["C1".into(), "Pt2".into(), "".into(), "".into()],
            ],
        }
    }

    #[test]
    fn test_xlsx_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_xlsx(&path, &sample_table()).unwrap();

        let raw = read_spreadsheet(&path, None).unwrap();
        assert_eq!(raw.header, vec!["Sample", "Point", "SiO2", "CaO"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0][2], Cell::Text("633333".into()));
        assert!(raw.rows[1][2].is_blank());
    }

    #[test]
    fn test_named_sheet_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        write_xlsx(&path, &sample_table()).unwrap();

        assert!(read_spreadsheet(&path, Some("Sheet1")).is_ok());
        assert!(read_spreadsheet(&path, Some("Compositions")).is_err());
    }

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Int(3)), Cell::Number(3.0));
        assert_eq!(to_cell(&Data::Float(2.5)), Cell::Number(2.5));
        assert_eq!(to_cell(&Data::String("<LOD".into())), Cell::Text("<LOD".into()));
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
        assert!(to_cell(&Data::Bool(true)).to_measure().is_missing());
    }
}
