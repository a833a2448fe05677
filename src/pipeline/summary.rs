//! Run summary for a normalization pass.

use crate::data::CompositionTable;
use crate::error::{NormError, Result};
use crate::normalize::{NormalizedTable, RowStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Counts and checks describing one normalization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub fixed_column: String,
    pub total_scale: f64,
    /// Rows read (blank rows excluded).
    pub rows_read: usize,
    pub rows_normalized: usize,
    /// Rows rescaled with some pool values left out.
    pub rows_partial: usize,
    pub rows_missing_fixed: usize,
    pub rows_missing_pool: usize,
    pub rows_zero_pool: usize,
    /// Non-blank cells that were not numbers.
    pub coerced_cells: usize,
    /// Largest |sum(pool) - (total_scale - fixed)| over fully normalized rows.
    pub max_balance_error: f64,
}

impl NormalizationSummary {
    /// Summarize a normalized table against its input.
    pub fn from_tables(input: &CompositionTable, normalized: &NormalizedTable) -> Self {
        let fixed_index = input.column_index(&normalized.fixed_column);

        let max_balance_error = match fixed_index {
            Some(j) => input
                .rows()
                .iter()
                .zip(&normalized.rows)
                .filter(|(_, out)| out.status == RowStatus::Normalized)
                .filter_map(|(row, out)| {
                    let fixed = row.values[j].value()?;
                    let total = out.total().value()?;
                    Some((total - (normalized.total_scale - fixed)).abs())
                })
                .fold(0.0, f64::max),
            None => 0.0,
        };

        Self {
            input: None,
            output: None,
            fixed_column: normalized.fixed_column.clone(),
            total_scale: normalized.total_scale,
            rows_read: input.n_rows(),
            rows_normalized: normalized.count(RowStatus::Normalized),
            rows_partial: normalized.count(RowStatus::Partial),
            rows_missing_fixed: normalized.count(RowStatus::MissingFixedValue),
            rows_missing_pool: normalized.count(RowStatus::MissingPoolValue),
            rows_zero_pool: normalized.count(RowStatus::ZeroPoolSum),
            coerced_cells: input.n_coerced(),
            max_balance_error,
        }
    }

    /// Rows whose output is entirely missing.
    pub fn rows_failed(&self) -> usize {
        self.rows_missing_fixed + self.rows_missing_pool + self.rows_zero_pool
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(NormError::from)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(NormError::from)
    }

    /// Write as JSON (`.json`) or YAML (`.yaml`, `.yml`).
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let text = match ext.as_deref() {
            Some("json") => self.to_json()?,
            Some("yaml") | Some("yml") => self.to_yaml()?,
            _ => {
                return Err(NormError::UnsupportedFormat(format!(
                    "{} (report must be .json, .yaml or .yml)",
                    path.display()
                )))
            }
        };
        std::fs::write(path, text)?;
        Ok(())
    }
}

impl fmt::Display for NormalizationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} rows read, {} normalized to {} around '{}'",
            self.rows_read,
            self.rows_normalized + self.rows_partial,
            self.total_scale,
            self.fixed_column
        )?;
        if self.rows_partial > 0 {
            writeln!(f, "  {} rows rescaled with missing pool values", self.rows_partial)?;
        }
        if self.rows_failed() > 0 {
            writeln!(
                f,
                "  {} rows left missing ({} missing fixed value, {} missing pool value, {} zero pool sum)",
                self.rows_failed(),
                self.rows_missing_fixed,
                self.rows_missing_pool,
                self.rows_zero_pool
            )?;
        }
        write!(f, "  {} non-numeric cells treated as missing", self.coerced_cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CompositionRow, Measure, RowKey};
    use crate::normalize::{norm_fixed, scale};

    fn create_test_table() -> CompositionTable {
        let row = |point: &str, values: [f64; 3]| CompositionRow {
            key: RowKey(vec![point.to_string()]),
            values: values.iter().map(|&v| Measure::new(v)).collect(),
        };
        CompositionTable::new(
            vec!["Point".into()],
            vec!["Na2O PIGE".into(), "SiO2".into(), "CaO".into()],
            vec![
                row("Pt1", [20000.0, 700000.0, 280000.0]),
                row("Pt2", [50000.0, 600000.0, 300000.0]),
                row("Pt3", [1_000_000.0, 0.0, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let table = create_test_table();
        let norm = norm_fixed(&table, "Na2O PIGE", scale::PPM).unwrap();
        let summary = NormalizationSummary::from_tables(&table, &norm);

        assert_eq!(summary.rows_read, 3);
        assert_eq!(summary.rows_normalized, 2);
        assert_eq!(summary.rows_zero_pool, 1);
        assert_eq!(summary.rows_failed(), 1);
        assert!(summary.max_balance_error < 1e-6);
    }

    #[test]
    fn test_summary_serialization() {
        let table = create_test_table();
        let norm = norm_fixed(&table, "Na2O PIGE", scale::PPM).unwrap();
        let summary = NormalizationSummary::from_tables(&table, &norm);

        let json = summary.to_json().unwrap();
        assert!(json.contains("\"rows_zero_pool\": 1"));
        assert!(!json.contains("\"input\""));

        let yaml = summary.to_yaml().unwrap();
        let parsed: NormalizationSummary = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, summary);
    }

    #[test]
    fn test_write_to_rejects_unknown_extension() {
        let table = create_test_table();
        let norm = norm_fixed(&table, "Na2O PIGE", scale::PPM).unwrap();
        let summary = NormalizationSummary::from_tables(&table, &norm);

        let dir = tempfile::tempdir().unwrap();
        assert!(summary.write_to(dir.path().join("report.txt")).is_err());
        assert!(summary.write_to(dir.path().join("report.yml")).is_ok());
    }
}
