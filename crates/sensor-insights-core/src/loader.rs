use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};

pub const SENSOR_ID: &str = "sensor_id";
pub const LOCATION: &str = "location";
pub const TIMESTAMP: &str = "timestamp";
pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const SENSOR_TYPE: &str = "sensor_type";

pub const REQUIRED_COLUMNS: [&str; 6] = [
    SENSOR_ID,
    LOCATION,
    TIMESTAMP,
    TEMPERATURE,
    HUMIDITY,
    SENSOR_TYPE,
];

/// Reads a header-prefixed CSV of sensor readings from disk and normalizes the required columns.
pub fn load_readings(path: &Path) -> Result<DataFrame> {
    let content = std::fs::read(path)?;
    let df = load_readings_from_bytes(&content)?;
    info!(
        path = %path.display(),
        rows = df.height(),
        columns = ?df.get_column_names(),
        "Loaded sensor readings"
    );
    Ok(df)
}

pub fn load_readings_from_bytes(content: &[u8]) -> Result<DataFrame> {
    let cursor = Cursor::new(content);
    // Scan every row for inference so a late malformed value widens the column to String
    // instead of failing the read; normalization then nulls it out.
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(cursor)
        .finish()?;
    debug!(schema = ?raw.schema(), "Inferred CSV schema");
    normalize_readings(raw)
}

/// Casts the required columns to their canonical types. Non-numeric temperature or humidity
/// values become null; any extra columns are passed through untouched.
pub fn normalize_readings(df: DataFrame) -> Result<DataFrame> {
    for column in REQUIRED_COLUMNS {
        if df.column(column).is_err() {
            return Err(AnalysisError::MissingColumn { column });
        }
    }

    let normalized = df
        .lazy()
        .with_columns([
            col(SENSOR_ID).cast(DataType::String),
            col(LOCATION).cast(DataType::String),
            col(TIMESTAMP).cast(DataType::String),
            col(TEMPERATURE).cast(DataType::Float64),
            col(HUMIDITY).cast(DataType::Float64),
            col(SENSOR_TYPE).cast(DataType::String),
        ])
        .collect()?;

    Ok(normalized)
}
