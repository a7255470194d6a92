use crate::analyser::logic::types::{SamplingPlan, SigmaPolicy};
use crate::error::{AnalysisError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT: &str = "estoque.csv";
pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_MARGINS: [f64; 2] = [0.02, 0.10];

/// Output flavour for the final report.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for one analysis run.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to change.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input: PathBuf,
    /// Field delimiter of the input file
    pub separator: char,
    pub date_column: String,
    pub store_column: String,
    pub stock_column: String,
    /// Significance level; confidence is `1 - alpha`
    pub alpha: f64,
    /// Margins of error as absolute fractions, applied to every store
    pub margins: Vec<f64>,
    /// Bin count of the all-stores histogram
    pub histogram_bins: usize,
    /// Bin count of each per-store histogram; `None` picks one from the data
    pub store_histogram_bins: Option<usize>,
    /// Rows shown in the dataset preview
    pub head_rows: usize,
    pub format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            separator: ';',
            date_column: "data".to_owned(),
            store_column: "id_loja".to_owned(),
            stock_column: "estoque".to_owned(),
            alpha: DEFAULT_ALPHA,
            margins: DEFAULT_MARGINS.to_vec(),
            histogram_bins: 40,
            store_histogram_bins: None,
            head_rows: 10,
            format: OutputFormat::Text,
        }
    }
}

impl AnalysisConfig {
    /// Reads a JSON config file. Missing keys fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds values rejected by [`AnalysisConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Confidence level as a fraction, e.g. 0.95.
    pub fn confidence_level(&self) -> f64 {
        1.0 - self.alpha
    }

    /// Both sigma policies over the configured margins.
    pub fn sampling_plan(&self) -> SamplingPlan {
        SamplingPlan {
            alpha: self.alpha,
            margins: self.margins.clone(),
            policies: SigmaPolicy::ALL.to_vec(),
        }
    }

    /// Delimiter as the single byte the CSV reader expects.
    pub fn separator_byte(&self) -> Result<u8> {
        u8::try_from(self.separator)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                AnalysisError::Config(format!(
                    "separator must be a single ASCII character, got '{}'",
                    self.separator
                ))
            })
    }

    /// # Errors
    ///
    /// Returns [`AnalysisError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::Config(format!(
                "alpha must lie strictly between 0 and 1, got {}",
                self.alpha
            )));
        }
        if self.margins.is_empty() {
            return Err(AnalysisError::Config(
                "at least one margin of error is required".to_owned(),
            ));
        }
        if let Some(bad) = self.margins.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
            return Err(AnalysisError::Config(format!(
                "margins of error must be positive, got {bad}"
            )));
        }
        if self.histogram_bins == 0 || self.store_histogram_bins == Some(0) {
            return Err(AnalysisError::Config(
                "histogram bin counts must be at least 1".to_owned(),
            ));
        }
        self.separator_byte()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_analysis() {
        let config = AnalysisConfig::default();
        assert_eq!(config.input, PathBuf::from("estoque.csv"));
        assert_eq!(config.separator, ';');
        assert_eq!(config.margins, vec![0.02, 0.10]);
        assert!((config.confidence_level() - 0.95).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() -> Result<()> {
        let config: AnalysisConfig = serde_json::from_str(r#"{"alpha": 0.01, "format": "json"}"#)?;
        assert!((config.alpha - 0.01).abs() < 1e-12);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.stock_column, "estoque");
        Ok(())
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_alpha = AnalysisConfig {
            alpha: 1.5,
            ..Default::default()
        };
        assert!(bad_alpha.validate().is_err());

        let no_margins = AnalysisConfig {
            margins: Vec::new(),
            ..Default::default()
        };
        assert!(no_margins.validate().is_err());

        let negative_margin = AnalysisConfig {
            margins: vec![0.02, -0.1],
            ..Default::default()
        };
        assert!(negative_margin.validate().is_err());

        let wide_separator = AnalysisConfig {
            separator: '§',
            ..Default::default()
        };
        assert!(wide_separator.validate().is_err());
    }

    #[test]
    fn test_from_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"margins": [0.05], "separator": ","}"#)?;
        let config = AnalysisConfig::from_file(&path)?;
        assert_eq!(config.margins, vec![0.05]);
        assert_eq!(config.separator_byte()?, b',');
        Ok(())
    }

    #[test]
    fn test_from_missing_file_fails() {
        let result = AnalysisConfig::from_file(Path::new("does/not/exist.json"));
        assert!(result.is_err());
    }
}
