use polars::prelude::*;

use crate::error::Result;
use crate::loader::{LOCATION, SENSOR_TYPE};

/// Descriptive view of the loaded readings. Nothing here mutates the base table.
#[derive(Debug, Clone)]
pub struct Exploration {
    pub row_count: usize,
    pub distinct_locations: Vec<Option<String>>,
    pub distinct_sensor_types: Vec<Option<String>>,
    pub sample: DataFrame,
}

pub fn explore(readings: &DataFrame, sample_rows: usize) -> Result<Exploration> {
    Ok(Exploration {
        row_count: readings.height(),
        distinct_locations: distinct_values(readings, LOCATION)?,
        distinct_sensor_types: distinct_values(readings, SENSOR_TYPE)?,
        sample: readings.head(Some(sample_rows)),
    })
}

/// Sorted distinct values of a string column; a null value sorts first.
pub fn distinct_values(readings: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let unique = readings
        .clone()
        .lazy()
        .select([col(column).unique().sort(SortOptions::default())])
        .collect()?;

    let values = unique
        .column(column)?
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}
