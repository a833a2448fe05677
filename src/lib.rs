//! Oxide Composition Renormalization Library
//!
//! Renormalizes tables of oxide concentrations (ppm-like units) after the
//! sodium measurement has been corrected on its own. In every row the
//! sodium column is held fixed and the other oxides are rescaled so the
//! row sums to the total scale again.
//!
//! # Overview
//!
//! - **data**: Measurements with explicit missing values, composition tables
//! - **io**: Spreadsheet (xlsx/xls/ods) and delimited (CSV/TSV) tables
//! - **normalize**: Fixed-component renormalization and integer rendering
//! - **config**: YAML run configuration
//! - **pipeline**: Load, normalize, write and summarize in one call
//!
//! # Example
//!
//! ```no_run
//! use oxide_normalize::prelude::*;
//!
//! let summary = Normalizer::new()
//!     .total_scale(1_000_000.0)
//!     .fixed_column("Na2O PIGE")
//!     .run("compositions.xlsx", "normalized.xlsx")
//!     .unwrap();
//! println!("{}", summary);
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod normalize;
pub mod pipeline;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::config::{NormalizeConfig, DEFAULT_KEY_COLUMNS};
    pub use crate::data::{Cell, CompositionRow, CompositionTable, Measure, RawTable, RowKey, TextTable};
    pub use crate::error::{NormError, Result};
    pub use crate::io::{read_table, write_table, TableFormat};
    pub use crate::normalize::{
        format_measure, norm_fixed, norm_fixed_with_policy, normalize_row, scale, MissingPolicy,
        NormalizedRow, NormalizedTable, Rounding, RowStatus, DEFAULT_FIXED_COLUMN,
    };
    pub use crate::pipeline::{normalize_file, NormalizationSummary, Normalizer};
}
