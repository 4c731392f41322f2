use polars::prelude::*;

use crate::error::Result;
use crate::loader::{HUMIDITY, LOCATION, TEMPERATURE};

pub const RANGE_STATUS: &str = "range_status";
pub const IN_RANGE: &str = "in-range";
pub const OUT_OF_RANGE: &str = "out-of-range";
pub const AVG_TEMPERATURE: &str = "avg_temperature";
pub const AVG_HUMIDITY: &str = "avg_humidity";

#[derive(Debug, Clone)]
pub struct FilterSummary {
    pub in_range: u64,
    pub out_of_range: u64,
    pub status_counts: DataFrame,
    pub location_averages: DataFrame,
}

/// Labels each reading `in-range` when `min <= temperature <= max`. A null temperature fails
/// the predicate and is labelled `out-of-range`, so every row lands in exactly one bucket.
pub fn range_status(min: f64, max: f64) -> Expr {
    let within = col(TEMPERATURE)
        .gt_eq(lit(min))
        .and(col(TEMPERATURE).lt_eq(lit(max)))
        .fill_null(lit(false));

    when(within)
        .then(lit(IN_RANGE))
        .otherwise(lit(OUT_OF_RANGE))
        .alias(RANGE_STATUS)
}

pub fn filter_and_aggregate(readings: &DataFrame, min: f64, max: f64) -> Result<FilterSummary> {
    let labelled = readings.clone().lazy().with_column(range_status(min, max));

    let totals = labelled
        .clone()
        .select([
            col(RANGE_STATUS)
                .eq(lit(IN_RANGE))
                .sum()
                .cast(DataType::UInt64)
                .alias(IN_RANGE),
            col(RANGE_STATUS)
                .eq(lit(OUT_OF_RANGE))
                .sum()
                .cast(DataType::UInt64)
                .alias(OUT_OF_RANGE),
        ])
        .collect()?;
    let in_range = first_count(&totals, IN_RANGE)?;
    let out_of_range = first_count(&totals, OUT_OF_RANGE)?;

    let status_counts = labelled
        .group_by([col(RANGE_STATUS)])
        .agg([len().cast(DataType::UInt64).alias("count")])
        .sort_by_exprs([col(RANGE_STATUS)], SortMultipleOptions::default())
        .collect()?;

    Ok(FilterSummary {
        in_range,
        out_of_range,
        status_counts,
        location_averages: location_averages(readings)?,
    })
}

fn first_count(totals: &DataFrame, column: &str) -> Result<u64> {
    Ok(totals.column(column)?.u64()?.into_iter().next().flatten().unwrap_or(0))
}

/// Averages over every reading at a location, regardless of range status. Hottest first;
/// locations whose readings are all null sort last, ties fall back to the location name.
pub fn location_averages(readings: &DataFrame) -> Result<DataFrame> {
    let averages = readings
        .clone()
        .lazy()
        .group_by([col(LOCATION)])
        .agg([
            col(TEMPERATURE).mean().alias(AVG_TEMPERATURE),
            col(HUMIDITY).mean().alias(AVG_HUMIDITY),
        ])
        .sort_by_exprs(
            [col(AVG_TEMPERATURE), col(LOCATION)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_nulls_last(true),
        )
        .collect()?;
    Ok(averages)
}
