use polars::prelude::*;
use serde::Serialize;

use crate::error::Result;
use crate::loader::{SENSOR_ID, TEMPERATURE};

pub const AVG_TEMP: &str = "avg_temp";
pub const RANK_TEMP: &str = "rank_temp";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedSensor {
    pub sensor_id: Option<String>,
    pub avg_temp: f64,
    pub rank: u32,
}

#[derive(Debug, Clone)]
pub struct SensorRanking {
    pub table: DataFrame,
    pub sensors: Vec<RankedSensor>,
}

/// Ranks sensors by mean temperature, hottest first, and keeps the first `top_n` rows.
///
/// Ranking follows SQL `RANK()`: equal averages share a rank and the following rank skips
/// by the size of the tie. Sensors without a single valid temperature have no average and are
/// left out of the ranking entirely. Rows with the same rank are ordered by `sensor_id`.
pub fn rank_sensors(readings: &DataFrame, top_n: usize) -> Result<SensorRanking> {
    let limit = IdxSize::try_from(top_n).unwrap_or(IdxSize::MAX);
    let rank_options = RankOptions {
        method: RankMethod::Min,
        descending: true,
    };

    let table = readings
        .clone()
        .lazy()
        .group_by([col(SENSOR_ID)])
        .agg([col(TEMPERATURE).mean().alias(AVG_TEMP)])
        .filter(col(AVG_TEMP).is_not_null())
        .with_column(
            col(AVG_TEMP)
                .rank(rank_options, None)
                .cast(DataType::UInt32)
                .alias(RANK_TEMP),
        )
        .sort_by_exprs(
            [col(RANK_TEMP), col(SENSOR_ID)],
            SortMultipleOptions::default(),
        )
        .limit(limit)
        .collect()?;

    let ids = table.column(SENSOR_ID)?.str()?;
    let averages = table.column(AVG_TEMP)?.f64()?;
    let ranks = table.column(RANK_TEMP)?.u32()?;

    let mut sensors = Vec::with_capacity(table.height());
    for idx in 0..table.height() {
        if let (Some(avg_temp), Some(rank)) = (averages.get(idx), ranks.get(idx)) {
            sensors.push(RankedSensor {
                sensor_id: ids.get(idx).map(str::to_string),
                avg_temp,
                rank,
            });
        }
    }

    Ok(SensorRanking { table, sensors })
}
