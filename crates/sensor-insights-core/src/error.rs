// crates/sensor-insights-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("required column '{column}' missing from sensor readings")]
    MissingColumn { column: &'static str },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
