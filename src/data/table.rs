//! Composition tables keyed by a multi-part sample identifier.

use super::measure::Measure;
use crate::error::{NormError, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single cell as read from a table file, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Blank text counts as empty.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Coerce the cell to a measurement.
    pub fn to_measure(&self) -> Measure {
        match self {
            Cell::Number(v) => Measure::new(*v),
            Cell::Text(s) => Measure::parse(s),
            Cell::Empty => Measure::MISSING,
        }
    }

    /// Render the cell as a label (header name or key part).
    ///
    /// Integral numbers drop their fractional part so that a spreadsheet
    /// point number `3.0` reads back as `3`.
    pub fn to_label(&self) -> String {
        match self {
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Empty => String::new(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// An uncoerced rectangular table: one header row plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { header, rows }
    }
}

/// A fully rendered table ready to be written: header plus text cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Composite row identifier (sample, campaign, point, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowKey(pub Vec<String>);

impl RowKey {
    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for RowKey {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        RowKey(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// One sample row: its key and one measure per measurement column.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionRow {
    pub key: RowKey,
    pub values: Vec<Measure>,
}

/// A rectangular composition table.
///
/// Column names are unique and every row carries exactly one value per
/// measurement column. Row order is the order the rows were read in.
#[derive(Debug, Clone)]
pub struct CompositionTable {
    key_names: Vec<String>,
    column_names: Vec<String>,
    rows: Vec<CompositionRow>,
    n_coerced: usize,
}

impl CompositionTable {
    /// Create a table from already-coerced rows.
    pub fn new(
        key_names: Vec<String>,
        column_names: Vec<String>,
        rows: Vec<CompositionRow>,
    ) -> Result<Self> {
        check_unique(key_names.iter().chain(column_names.iter()))?;

        for (i, row) in rows.iter().enumerate() {
            if row.key.0.len() != key_names.len() {
                return Err(NormError::DimensionMismatch {
                    row: i,
                    expected: key_names.len(),
                    actual: row.key.0.len(),
                });
            }
            if row.values.len() != column_names.len() {
                return Err(NormError::DimensionMismatch {
                    row: i,
                    expected: column_names.len(),
                    actual: row.values.len(),
                });
            }
        }

        Ok(Self {
            key_names,
            column_names,
            rows,
            n_coerced: 0,
        })
    }

    /// Build a table from raw cells, using the first `key_columns` columns
    /// as the row key and coercing every other cell to a [`Measure`].
    ///
    /// Blank rows are skipped. Text that does not parse as a number is
    /// coerced to missing and counted in [`n_coerced`](Self::n_coerced).
    pub fn from_raw(raw: RawTable, key_columns: usize) -> Result<Self> {
        let width = raw.header.len();
        if width <= key_columns {
            return Err(NormError::EmptyData(format!(
                "table has {} columns, need more than {} key columns",
                width, key_columns
            )));
        }

        let key_names = raw.header[..key_columns].to_vec();
        let column_names = raw.header[key_columns..].to_vec();
        check_unique(raw.header.iter())?;

        let mut rows = Vec::with_capacity(raw.rows.len());
        let mut n_coerced = 0;

        for (i, cells) in raw.rows.into_iter().enumerate() {
            if cells.iter().all(Cell::is_blank) {
                continue;
            }
            if cells.len() != width {
                return Err(NormError::DimensionMismatch {
                    row: i,
                    expected: width,
                    actual: cells.len(),
                });
            }

            let key: RowKey = cells[..key_columns].iter().map(Cell::to_label).collect();
            let values: Vec<Measure> = cells[key_columns..]
                .iter()
                .enumerate()
                .map(|(j, cell)| {
                    let m = cell.to_measure();
                    if m.is_missing() && !cell.is_blank() {
                        debug!(
                            "Row {} column '{}': non-numeric cell {:?} treated as missing",
                            key, column_names[j], cell
                        );
                        n_coerced += 1;
                    }
                    m
                })
                .collect();

            rows.push(CompositionRow { key, values });
        }

        Ok(Self {
            key_names,
            column_names,
            rows,
            n_coerced,
        })
    }

    /// Names of the key columns.
    #[inline]
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Names of the measurement columns.
    #[inline]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[inline]
    pub fn rows(&self) -> &[CompositionRow] {
        &self.rows
    }

    /// Number of rows.
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of measurement columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Number of non-blank cells that could not be read as numbers.
    #[inline]
    pub fn n_coerced(&self) -> usize {
        self.n_coerced
    }

    /// Position of a measurement column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Value of a named column in a given row.
    pub fn get(&self, row: usize, column: &str) -> Option<Measure> {
        let j = self.column_index(column)?;
        self.rows.get(row).map(|r| r.values[j])
    }
}

fn check_unique<'a>(names: impl Iterator<Item = &'a String>) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(NormError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> Vec<String> {
        ["Sample", "Campaign", "Point", "Run", "Na2O PIGE", "SiO2", "CaO"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn raw_row(key: [&str; 4], values: [Cell; 3]) -> Vec<Cell> {
        key.iter().map(|&s| Cell::from(s)).chain(values).collect()
    }

    #[test]
    fn test_from_raw_splits_key_and_values() {
        let raw = RawTable::new(
            header(),
            vec![raw_row(
                ["C1", "P1", "Pt1", "A"],
                [20000.0.into(), 700000.0.into(), "280000".into()],
            )],
        );
        let table = CompositionTable::from_raw(raw, 4).unwrap();

        assert_eq!(table.key_names(), &["Sample", "Campaign", "Point", "Run"]);
        assert_eq!(table.column_names(), &["Na2O PIGE", "SiO2", "CaO"]);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.rows()[0].key.parts(), &["C1", "P1", "Pt1", "A"]);
        assert_eq!(table.get(0, "CaO").unwrap().value(), Some(280000.0));
        assert_eq!(table.n_coerced(), 0);
    }

    #[test]
    fn test_placeholder_cells_are_coerced() {
        let raw = RawTable::new(
            header(),
            vec![raw_row(
                ["C1", "P1", "Pt1", "A"],
                ["<LOD".into(), 700000.0.into(), Cell::Empty],
            )],
        );
        let table = CompositionTable::from_raw(raw, 4).unwrap();

        assert!(table.get(0, "Na2O PIGE").unwrap().is_missing());
        assert!(table.get(0, "CaO").unwrap().is_missing());
        // Only the placeholder text counts, not the blank cell.
        assert_eq!(table.n_coerced(), 1);
    }

    #[test]
    fn test_blank_rows_skipped() {
        let raw = RawTable::new(
            header(),
            vec![
                raw_row(["C1", "P1", "Pt1", "A"], [1.0.into(), 2.0.into(), 3.0.into()]),
                vec![Cell::Empty; 7],
                raw_row(["C1", "P1", "Pt2", "A"], [1.0.into(), 2.0.into(), 3.0.into()]),
            ],
        );
        let table = CompositionTable::from_raw(raw, 4).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.rows()[1].key.parts()[2], "Pt2");
    }

    #[test]
    fn test_numeric_key_labels() {
        assert_eq!(Cell::Number(3.0).to_label(), "3");
        assert_eq!(Cell::Number(2.5).to_label(), "2.5");
        assert_eq!(Cell::Text(" A ".into()).to_label(), "A");
    }

    #[test]
    fn test_ragged_row_rejected() {
        let raw = RawTable::new(
            header(),
            vec![vec![Cell::from("C1"), Cell::from("P1")]],
        );
        let result = CompositionTable::from_raw(raw, 4);
        assert!(matches!(
            result,
            Err(NormError::DimensionMismatch { expected: 7, actual: 2, .. })
        ));
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let mut h = header();
        h[6] = "SiO2".to_string();
        let result = CompositionTable::from_raw(RawTable::new(h, vec![]), 4);
        assert!(matches!(result, Err(NormError::DuplicateColumn(name)) if name == "SiO2"));
    }

    #[test]
    fn test_too_few_columns() {
        let h = header()[..4].to_vec();
        let result = CompositionTable::from_raw(RawTable::new(h, vec![]), 4);
        assert!(matches!(result, Err(NormError::EmptyData(_))));
    }

    #[test]
    fn test_new_validates_widths() {
        let rows = vec![CompositionRow {
            key: RowKey(vec!["a".into()]),
            values: vec![Measure::new(1.0)],
        }];
        let result = CompositionTable::new(
            vec!["id".into()],
            vec!["x".into(), "y".into()],
            rows,
        );
        assert!(result.is_err());
    }
}
