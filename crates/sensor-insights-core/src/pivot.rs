use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::hourly::{with_hour_of_day, AVG_TEMP, HOUR_OF_DAY};
use crate::loader::{LOCATION, TEMPERATURE};

pub const HOURS_PER_DAY: i32 = 24;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotCell {
    pub location: Option<String>,
    pub hour: i32,
    pub avg_temp: f64,
}

#[derive(Debug, Clone)]
pub struct PivotAnalysis {
    /// `location` followed by one Float64 column per hour, `"0"` through `"23"`.
    pub table: DataFrame,
    /// Non-null (location, hour, avg_temp) triples backing the wide table.
    pub long_form: DataFrame,
    pub hottest_cell: Option<PivotCell>,
}

pub fn hour_columns() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|hour| hour.to_string()).collect()
}

pub fn pivot_location_hour(readings: &DataFrame, format: &str) -> Result<PivotAnalysis> {
    let with_hours = with_hour_of_day(readings.clone().lazy(), format);

    // One conditional mean per hour keeps all 24 columns even when an hour never occurs.
    let cells: Vec<Expr> = (0..HOURS_PER_DAY)
        .map(|hour| {
            col(TEMPERATURE)
                .filter(col(HOUR_OF_DAY).eq(lit(hour)))
                .mean()
                .alias(hour.to_string())
        })
        .collect();

    let table = with_hours
        .clone()
        .group_by([col(LOCATION)])
        .agg(cells)
        .sort_by_exprs([col(LOCATION)], SortMultipleOptions::default())
        .collect()?;

    let long_form = with_hours
        .filter(col(HOUR_OF_DAY).is_not_null())
        .group_by([col(LOCATION), col(HOUR_OF_DAY)])
        .agg([col(TEMPERATURE).mean().alias(AVG_TEMP)])
        .filter(col(AVG_TEMP).is_not_null())
        .sort_by_exprs(
            [col(AVG_TEMP), col(LOCATION), col(HOUR_OF_DAY)],
            SortMultipleOptions::default().with_order_descending_multi([true, false, false]),
        )
        .collect()?;

    let hottest_cell = hottest_cell(&long_form)?;

    Ok(PivotAnalysis {
        table,
        long_form,
        hottest_cell,
    })
}

/// Reads the first row of the descending-sorted long form. Ties were already broken by
/// location, then hour, in that sort.
fn hottest_cell(long_form: &DataFrame) -> Result<Option<PivotCell>> {
    if long_form.height() == 0 {
        return Ok(None);
    }

    let location = long_form
        .column(LOCATION)?
        .str()?
        .get(0)
        .map(str::to_string);
    let hour = long_form.column(HOUR_OF_DAY)?.i32()?.get(0);
    let avg_temp = long_form.column(AVG_TEMP)?.f64()?.get(0);

    Ok(match (hour, avg_temp) {
        (Some(hour), Some(avg_temp)) => Some(PivotCell {
            location,
            hour,
            avg_temp,
        }),
        _ => None,
    })
}
