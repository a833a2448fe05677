//! Normalizer builder and file-to-file runner.

use super::summary::NormalizationSummary;
use crate::config::NormalizeConfig;
use crate::data::{CompositionTable, TextTable};
use crate::error::{NormError, Result};
use crate::io::{read_table, write_table, TableFormat};
use crate::normalize::{norm_fixed_with_policy, MissingPolicy, NormalizedTable, Rounding};
use log::info;
use std::path::Path;

/// Builder for configuring and running a normalization.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    /// Create a normalizer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a config.
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Current settings.
    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Set the total every row is scaled to.
    pub fn total_scale(mut self, total_scale: f64) -> Self {
        self.config.total_scale = total_scale;
        self
    }

    /// Set the column held fixed.
    pub fn fixed_column(mut self, name: &str) -> Self {
        self.config.fixed_column = name.to_string();
        self
    }

    /// Set the number of leading key columns.
    pub fn key_columns(mut self, n: usize) -> Self {
        self.config.key_columns = n;
        self
    }

    pub fn missing_policy(mut self, policy: MissingPolicy) -> Self {
        self.config.missing = policy;
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.config.rounding = rounding;
        self
    }

    /// Set the text written for missing results.
    pub fn missing_marker(mut self, marker: &str) -> Self {
        self.config.missing_marker = marker.to_string();
        self
    }

    /// Read a named worksheet instead of the first one.
    pub fn sheet(mut self, name: &str) -> Self {
        self.config.sheet = Some(name.to_string());
        self
    }

    /// Load a table file and coerce its cells.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<CompositionTable> {
        self.config.validate()?;
        let raw = read_table(path, self.config.sheet.as_deref())?;
        CompositionTable::from_raw(raw, self.config.key_columns)
    }

    /// Renormalize a loaded table.
    pub fn normalize(&self, table: &CompositionTable) -> Result<NormalizedTable> {
        self.config.validate()?;
        norm_fixed_with_policy(
            table,
            &self.config.fixed_column,
            self.config.total_scale,
            self.config.missing,
        )
    }

    /// Render a normalized table with the configured rounding.
    pub fn render(&self, normalized: &NormalizedTable) -> TextTable {
        normalized.to_text(self.config.rounding, &self.config.missing_marker)
    }

    /// Read `input`, renormalize it and write the result to `output`.
    ///
    /// The output format is checked before the input is read so that a bad
    /// output path fails fast. An existing output file is overwritten.
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> Result<NormalizationSummary> {
        let input = input.as_ref();
        let output = output.as_ref();

        if !TableFormat::from_path(output)?.is_writable() {
            return Err(NormError::UnsupportedFormat(format!(
                "{} (output must be .xlsx, .csv or .tsv)",
                output.display()
            )));
        }

        info!("Loading {}", input.display());
        let table = self.load(input)?;
        info!(
            "Loaded {} rows x {} columns ({} key columns)",
            table.n_rows(),
            table.n_columns(),
            table.key_names().len()
        );

        info!(
            "Normalizing to {} around '{}'",
            self.config.total_scale, self.config.fixed_column
        );
        let normalized = self.normalize(&table)?;

        info!("Writing {}", output.display());
        write_table(output, &self.render(&normalized))?;

        let mut summary = NormalizationSummary::from_tables(&table, &normalized);
        summary.input = Some(input.to_path_buf());
        summary.output = Some(output.to_path_buf());
        Ok(summary)
    }
}

/// Normalize a file with default AGLAE settings.
pub fn normalize_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
) -> Result<NormalizationSummary> {
    Normalizer::new().run(input, output)
}
