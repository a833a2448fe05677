//! Data structures for composition tables.

mod measure;
mod table;

pub use measure::Measure;
pub use table::{Cell, CompositionRow, CompositionTable, RawTable, RowKey, TextTable};
