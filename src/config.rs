//! Run configuration.

use crate::error::{NormError, Result};
use crate::normalize::{scale, MissingPolicy, Rounding, DEFAULT_FIXED_COLUMN};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of leading key columns in AGLAE composition tables
/// (sample, campaign, point, run).
pub const DEFAULT_KEY_COLUMNS: usize = 4;

/// Settings for a normalization run.
///
/// Every field has a default, so a YAML file only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Total every row is scaled to, fixed column included.
    pub total_scale: f64,
    /// Column held fixed and dropped from the output.
    pub fixed_column: String,
    /// Number of leading columns forming the row key.
    pub key_columns: usize,
    /// Handling of missing pool values.
    pub missing: MissingPolicy,
    /// Rounding rule for the zero-decimal output.
    pub rounding: Rounding,
    /// Text written for missing results.
    pub missing_marker: String,
    /// Worksheet to read; the first one when unset.
    pub sheet: Option<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            total_scale: scale::PPM,
            fixed_column: DEFAULT_FIXED_COLUMN.to_string(),
            key_columns: DEFAULT_KEY_COLUMNS,
            missing: MissingPolicy::default(),
            rounding: Rounding::default(),
            missing_marker: String::new(),
            sheet: None,
        }
    }
}

impl NormalizeConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(NormError::from)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.total_scale.is_finite() || self.total_scale <= 0.0 {
            return Err(NormError::InvalidParameter(format!(
                "total_scale must be positive, got {}",
                self.total_scale
            )));
        }
        if self.key_columns == 0 {
            return Err(NormError::InvalidParameter(
                "key_columns must be at least 1".to_string(),
            ));
        }
        if self.fixed_column.trim().is_empty() {
            return Err(NormError::InvalidParameter(
                "fixed_column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
