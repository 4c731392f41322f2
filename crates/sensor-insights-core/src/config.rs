use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

pub const DEFAULT_INPUT: &str = "sensor_data.csv";
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Settings for one analysis run. Every field has a default, so an empty TOML document (or no
/// document at all) reproduces the stock five-task run over `sensor_data.csv`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub timestamp_format: String,
    pub in_range_min: f64,
    pub in_range_max: f64,
    pub top_n: usize,
    pub sample_rows: usize,
    pub output_files: OutputFiles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFiles {
    pub exploration: String,
    pub filtering: String,
    pub hourly: String,
    pub ranking: String,
    pub pivot: String,
}

impl Default for OutputFiles {
    fn default() -> Self {
        Self {
            exploration: "task1_output.csv".to_string(),
            filtering: "task2_output.csv".to_string(),
            hourly: "task3_output.csv".to_string(),
            ranking: "task4_output.csv".to_string(),
            pivot: "task5_output.csv".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            in_range_min: 18.0,
            in_range_max: 30.0,
            top_n: 5,
            sample_rows: 5,
            output_files: OutputFiles::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.in_range_min > self.in_range_max {
            return Err(AnalysisError::Config(format!(
                "in_range_min ({}) is greater than in_range_max ({})",
                self.in_range_min, self.in_range_max
            )));
        }
        if self.top_n == 0 {
            return Err(AnalysisError::Config("top_n must be at least 1".to_string()));
        }
        if self.timestamp_format.trim().is_empty() {
            return Err(AnalysisError::Config(
                "timestamp_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AnalysisConfig::from_toml_str("").expect("empty toml parses");
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.input_path, PathBuf::from("sensor_data.csv"));
        assert_eq!(config.output_files.pivot, "task5_output.csv");
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = AnalysisConfig::from_toml_str(
            r#"
                input_path = "data/readings.csv"
                top_n = 3

                [output_files]
                ranking = "top_sensors.csv"
            "#,
        )
        .expect("partial toml parses");

        assert_eq!(config.input_path, PathBuf::from("data/readings.csv"));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.in_range_min, 18.0);
        assert_eq!(config.output_files.ranking, "top_sensors.csv");
        assert_eq!(config.output_files.hourly, "task3_output.csv");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let config = AnalysisConfig {
            in_range_min: 31.0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let config = AnalysisConfig {
            top_n: 0,
            ..AnalysisConfig::default()
        };
        assert!(matches!(config.validate(), Err(AnalysisError::Config(_))));
    }

    #[test]
    fn unknown_field_types_fail_to_parse() {
        let err = AnalysisConfig::from_toml_str("top_n = \"five\"").unwrap_err();
        assert!(matches!(err, AnalysisError::TomlDe(_)));
    }

    #[test]
    fn output_path_joins_output_dir() {
        let config = AnalysisConfig {
            output_dir: PathBuf::from("out"),
            ..AnalysisConfig::default()
        };
        assert_eq!(
            config.output_path("task2_output.csv"),
            PathBuf::from("out").join("task2_output.csv")
        );
    }
}
