//! Load, normalize and write a composition table in one pass.

mod runner;
mod summary;

pub use runner::{normalize_file, Normalizer};
pub use summary::NormalizationSummary;
