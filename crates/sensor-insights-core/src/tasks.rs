use polars::prelude::DataFrame;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::{explore, filter, hourly, pivot, ranking};

/// Result of one analysis task: the table persisted to the task's CSV, a frame suitable for
/// console display, and a handful of labelled facts worth surfacing to the operator.
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub table: DataFrame,
    pub preview: DataFrame,
    pub highlights: Vec<(String, String)>,
}

impl TaskOutcome {
    fn new(table: DataFrame) -> Self {
        Self {
            preview: table.clone(),
            table,
            highlights: Vec::new(),
        }
    }

    fn with_preview(mut self, preview: DataFrame) -> Self {
        self.preview = preview;
        self
    }

    fn highlight(mut self, label: &str, value: impl Into<String>) -> Self {
        self.highlights.push((label.to_string(), value.into()));
        self
    }
}

pub trait AnalysisTask {
    fn name(&self) -> &'static str;
    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str;
    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome>;
}

/// The five tasks in execution order.
pub fn all_tasks() -> [&'static dyn AnalysisTask; 5] {
    [
        &ExplorationTask,
        &FilteringTask,
        &HourlyTask,
        &RankingTask,
        &PivotTask,
    ]
}

pub struct ExplorationTask;
pub struct FilteringTask;
pub struct HourlyTask;
pub struct RankingTask;
pub struct PivotTask;

impl AnalysisTask for ExplorationTask {
    fn name(&self) -> &'static str {
        "exploration"
    }

    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        &config.output_files.exploration
    }

    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome> {
        let summary = explore::explore(readings, config.sample_rows)?;

        Ok(TaskOutcome::new(readings.clone())
            .with_preview(summary.sample)
            .highlight("total records", summary.row_count.to_string())
            .highlight(
                "distinct locations",
                format!(
                    "{} ({})",
                    summary.distinct_locations.len(),
                    join_values(&summary.distinct_locations)
                ),
            )
            .highlight(
                "distinct sensor types",
                format!(
                    "{} ({})",
                    summary.distinct_sensor_types.len(),
                    join_values(&summary.distinct_sensor_types)
                ),
            ))
    }
}

impl AnalysisTask for FilteringTask {
    fn name(&self) -> &'static str {
        "filtering"
    }

    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        &config.output_files.filtering
    }

    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome> {
        let summary =
            filter::filter_and_aggregate(readings, config.in_range_min, config.in_range_max)?;

        Ok(TaskOutcome::new(summary.location_averages)
            .with_preview(summary.status_counts)
            .highlight(filter::IN_RANGE, summary.in_range.to_string())
            .highlight(filter::OUT_OF_RANGE, summary.out_of_range.to_string()))
    }
}

impl AnalysisTask for HourlyTask {
    fn name(&self) -> &'static str {
        "hourly"
    }

    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        &config.output_files.hourly
    }

    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome> {
        let analysis = hourly::hourly_averages(readings, &config.timestamp_format)?;
        let hottest = match analysis.hottest_hour {
            Some(entry) => format!("{} ({:.2})", entry.hour, entry.avg_temp),
            None => "none".to_string(),
        };

        Ok(TaskOutcome::new(analysis.hourly_averages).highlight("hottest hour", hottest))
    }
}

impl AnalysisTask for RankingTask {
    fn name(&self) -> &'static str {
        "ranking"
    }

    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        &config.output_files.ranking
    }

    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome> {
        let ranking = ranking::rank_sensors(readings, config.top_n)?;
        let leader = match ranking.sensors.first() {
            Some(sensor) => format!(
                "{} ({:.2})",
                sensor.sensor_id.as_deref().unwrap_or("null"),
                sensor.avg_temp
            ),
            None => "none".to_string(),
        };

        Ok(TaskOutcome::new(ranking.table)
            .highlight("sensors ranked", ranking.sensors.len().to_string())
            .highlight("hottest sensor", leader))
    }
}

impl AnalysisTask for PivotTask {
    fn name(&self) -> &'static str {
        "pivot"
    }

    fn output_file<'a>(&self, config: &'a AnalysisConfig) -> &'a str {
        &config.output_files.pivot
    }

    fn run(&self, readings: &DataFrame, config: &AnalysisConfig) -> Result<TaskOutcome> {
        let analysis = pivot::pivot_location_hour(readings, &config.timestamp_format)?;
        let hottest = match &analysis.hottest_cell {
            Some(cell) => format!(
                "{} @ hour {} ({:.2})",
                cell.location.as_deref().unwrap_or("null"),
                cell.hour,
                cell.avg_temp
            ),
            None => "none".to_string(),
        };

        Ok(TaskOutcome::new(analysis.table).highlight("hottest location/hour", hottest))
    }
}

fn join_values(values: &[Option<String>]) -> String {
    values
        .iter()
        .map(|value| value.as_deref().unwrap_or("null"))
        .collect::<Vec<_>>()
        .join(", ")
}
