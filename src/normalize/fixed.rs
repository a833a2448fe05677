//! Fixed-component renormalization.
//!
//! One column (sodium oxide after its own correction) is held fixed. The
//! remaining columns, the pool, are rescaled proportionally so that they
//! fill whatever is left of the total scale:
//!
//! ```text
//! target   = total_scale - fixed
//! x_j'     = x_j * target / sum(pool)
//! ```
//!
//! The fixed column is consumed as input and does not appear in the result.

use super::round::{format_measure, Rounding};
use crate::data::{CompositionTable, Measure, RowKey, TextTable};
use crate::error::{NormError, Result};
use log::warn;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Common total scales.
pub mod scale {
    /// Parts per million.
    pub const PPM: f64 = 1_000_000.0;
    /// Weight percent.
    pub const PERCENT: f64 = 100.0;
}

/// Column held fixed in AGLAE composition tables.
pub const DEFAULT_FIXED_COLUMN: &str = "Na2O PIGE";

/// How missing pool values affect a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Any missing pool value makes the whole row missing.
    #[default]
    Propagate,
    /// Missing pool values are left out of the pool sum and stay missing;
    /// the other cells are rescaled.
    Skip,
}

/// Outcome of normalizing a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    /// Every pool value was rescaled.
    Normalized,
    /// Rescaled, but some pool values were missing and left out (skip policy).
    Partial,
    /// The fixed column value is missing.
    MissingFixedValue,
    /// A pool value is missing (propagate policy).
    MissingPoolValue,
    /// The pool sums to zero.
    ZeroPoolSum,
}

impl RowStatus {
    /// Whether the row produced numeric output.
    pub fn is_normalized(self) -> bool {
        matches!(self, RowStatus::Normalized | RowStatus::Partial)
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Normalized => "normalized",
            Self::Partial => "partial",
            Self::MissingFixedValue => "missing_fixed_value",
            Self::MissingPoolValue => "missing_pool_value",
            Self::ZeroPoolSum => "zero_pool_sum",
        }
    }
}

/// A renormalized row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub key: RowKey,
    /// One value per pool column.
    pub values: Vec<Measure>,
    pub status: RowStatus,
}

impl NormalizedRow {
    /// Sum of the rescaled pool values, missing if any value is missing.
    pub fn total(&self) -> Measure {
        self.values.iter().sum()
    }
}

/// Result of fixed-component renormalization.
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    /// Key column names, unchanged from the input.
    pub key_names: Vec<String>,
    /// Pool column names (input columns minus the fixed one).
    pub column_names: Vec<String>,
    /// Rows in input order.
    pub rows: Vec<NormalizedRow>,
    /// Name of the column that was held fixed.
    pub fixed_column: String,
    /// Total every row was scaled against.
    pub total_scale: f64,
}

impl NormalizedTable {
    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of pool columns.
    pub fn n_columns(&self) -> usize {
        self.column_names.len()
    }

    /// Value of a named pool column in a given row.
    pub fn get(&self, row: usize, column: &str) -> Option<Measure> {
        let j = self.column_names.iter().position(|c| c == column)?;
        self.rows.get(row).map(|r| r.values[j])
    }

    /// Number of rows with the given status.
    pub fn count(&self, status: RowStatus) -> usize {
        self.rows.iter().filter(|r| r.status == status).count()
    }

    /// Render every value with zero decimal places.
    ///
    /// The header is the key names followed by the pool column names.
    pub fn to_text(&self, rounding: Rounding, missing_marker: &str) -> TextTable {
        let header = self
            .key_names
            .iter()
            .chain(self.column_names.iter())
            .cloned()
            .collect();

        let rows = self
            .rows
            .iter()
            .map(|r| {
                r.key
                    .parts()
                    .iter()
                    .cloned()
                    .chain(
                        r.values
                            .iter()
                            .map(|&v| format_measure(v, rounding, missing_marker)),
                    )
                    .collect()
            })
            .collect();

        TextTable { header, rows }
    }
}

/// Renormalize one row's values around a fixed column.
///
/// `values` holds one measure per table column, `fixed_index` points at the
/// fixed one. The returned vector excludes the fixed column. When the
/// status is not normalized, every returned value is missing.
pub fn normalize_row(
    values: &[Measure],
    fixed_index: usize,
    total_scale: f64,
    policy: MissingPolicy,
) -> (Vec<Measure>, RowStatus) {
    let pool: Vec<Measure> = values
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != fixed_index)
        .map(|(_, &v)| v)
        .collect();
    let all_missing = |status| (vec![Measure::MISSING; pool.len()], status);

    let fixed = values[fixed_index];
    if fixed.is_missing() {
        return all_missing(RowStatus::MissingFixedValue);
    }
    let target = Measure::new(total_scale) - fixed;

    let has_missing = pool.iter().any(|v| v.is_missing());
    let pool_sum: Measure = match policy {
        MissingPolicy::Propagate => {
            if has_missing {
                return all_missing(RowStatus::MissingPoolValue);
            }
            pool.iter().sum()
        }
        MissingPolicy::Skip => pool.iter().filter(|v| !v.is_missing()).sum(),
    };

    if pool_sum.is_zero() {
        return all_missing(RowStatus::ZeroPoolSum);
    }

    let factor = target / pool_sum;
    let rescaled = pool.iter().map(|&v| v * factor).collect();
    let status = if has_missing {
        RowStatus::Partial
    } else {
        RowStatus::Normalized
    };
    (rescaled, status)
}

/// Renormalize every row of a table around `fixed_column`, propagating
/// missing pool values.
///
/// # Example
/// ```ignore
/// let normalized = norm_fixed(&table, "Na2O PIGE", scale::PPM)?;
/// ```
pub fn norm_fixed(
    table: &CompositionTable,
    fixed_column: &str,
    total_scale: f64,
) -> Result<NormalizedTable> {
    norm_fixed_with_policy(table, fixed_column, total_scale, MissingPolicy::Propagate)
}

/// Renormalize every row of a table with an explicit missing-value policy.
///
/// Rows are independent and processed in parallel; output order matches
/// input order. Rows that cannot be rescaled come back missing with a
/// status and a warning, they never abort the table.
pub fn norm_fixed_with_policy(
    table: &CompositionTable,
    fixed_column: &str,
    total_scale: f64,
    policy: MissingPolicy,
) -> Result<NormalizedTable> {
    if !total_scale.is_finite() || total_scale <= 0.0 {
        return Err(NormError::InvalidParameter(
            "Total scale must be positive and finite".to_string(),
        ));
    }

    let fixed_index = table
        .column_index(fixed_column)
        .ok_or_else(|| NormError::MissingColumn(fixed_column.to_string()))?;

    if table.n_columns() < 2 {
        return Err(NormError::EmptyData(format!(
            "no columns left to rescale besides '{}'",
            fixed_column
        )));
    }

    let column_names: Vec<String> = table
        .column_names()
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != fixed_index)
        .map(|(_, name)| name.clone())
        .collect();

    let rows: Vec<NormalizedRow> = table
        .rows()
        .par_iter()
        .map(|row| {
            let (values, status) = normalize_row(&row.values, fixed_index, total_scale, policy);
            match status {
                RowStatus::ZeroPoolSum => {
                    warn!("Row {}: pool sums to zero, output left missing", row.key)
                }
                RowStatus::MissingFixedValue => {
                    warn!(
                        "Row {}: '{}' is missing, output left missing",
                        row.key, fixed_column
                    )
                }
                RowStatus::MissingPoolValue => {
                    warn!("Row {}: missing pool value, output left missing", row.key)
                }
                RowStatus::Normalized | RowStatus::Partial => {}
            }
            NormalizedRow {
                key: row.key.clone(),
                values,
                status,
            }
        })
        .collect();

    Ok(NormalizedTable {
        key_names: table.key_names().to_vec(),
        column_names,
        rows,
        fixed_column: fixed_column.to_string(),
        total_scale,
    })
}
