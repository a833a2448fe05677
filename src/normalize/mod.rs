//! Renormalization of composition rows.
//!
//! - **fixed**: rescale every column but one so the row fills a total scale
//! - **round**: zero-decimal rendering of the results

pub mod fixed;
pub mod round;

pub use fixed::{
    norm_fixed, norm_fixed_with_policy, normalize_row, scale, MissingPolicy, NormalizedRow,
    NormalizedTable, RowStatus, DEFAULT_FIXED_COLUMN,
};
pub use round::{format_measure, Rounding};
