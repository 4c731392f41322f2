use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::loader::{TEMPERATURE, TIMESTAMP};

pub const TIMESTAMP_TS: &str = "timestamp_ts";
pub const HOUR_OF_DAY: &str = "hour_of_day";
pub const AVG_TEMP: &str = "avg_temp";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourAverage {
    pub hour: i32,
    pub avg_temp: f64,
}

#[derive(Debug, Clone)]
pub struct HourlyAnalysis {
    pub hourly_averages: DataFrame,
    pub hottest_hour: Option<HourAverage>,
}

/// Parses `timestamp` with `format` into `timestamp_ts` and derives `hour_of_day` (Int32, 0..=23).
/// Text that does not match the format yields a null datetime and therefore a null hour.
pub fn with_hour_of_day(readings: LazyFrame, format: &str) -> LazyFrame {
    let options = StrptimeOptions {
        format: Some(format.into()),
        strict: false,
        exact: true,
        cache: true,
    };

    readings
        .with_column(
            col(TIMESTAMP)
                .str()
                .to_datetime(Some(TimeUnit::Microseconds), None, options, lit("raise"))
                .alias(TIMESTAMP_TS),
        )
        .with_column(
            col(TIMESTAMP_TS)
                .dt()
                .hour()
                .cast(DataType::Int32)
                .alias(HOUR_OF_DAY),
        )
}

pub fn hourly_averages(readings: &DataFrame, format: &str) -> Result<HourlyAnalysis> {
    let hourly = with_hour_of_day(readings.clone().lazy(), format)
        .filter(col(HOUR_OF_DAY).is_not_null())
        .group_by([col(HOUR_OF_DAY)])
        .agg([col(TEMPERATURE).mean().alias(AVG_TEMP)])
        .sort_by_exprs([col(HOUR_OF_DAY)], SortMultipleOptions::default())
        .collect()?;

    let hottest_hour = hottest_hour(&hourly)?;

    Ok(HourlyAnalysis {
        hourly_averages: hourly,
        hottest_hour,
    })
}

/// Highest non-null hourly average; equal averages resolve to the earliest hour.
pub fn hottest_hour(hourly: &DataFrame) -> Result<Option<HourAverage>> {
    let top = hourly
        .clone()
        .lazy()
        .filter(col(AVG_TEMP).is_not_null())
        .sort_by_exprs(
            [col(AVG_TEMP), col(HOUR_OF_DAY)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .limit(1)
        .collect()?;

    if top.height() == 0 {
        return Ok(None);
    }

    let hour = top.column(HOUR_OF_DAY)?.i32()?.get(0);
    let avg_temp = top.column(AVG_TEMP)?.f64()?.get(0);

    Ok(match (hour, avg_temp) {
        (Some(hour), Some(avg_temp)) => Some(HourAverage { hour, avg_temp }),
        _ => None,
    })
}
