use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::Serialize;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::loader::load_readings;
use crate::tasks::{all_tasks, AnalysisTask, TaskOutcome};
use crate::writer::write_csv;

#[derive(Debug, Clone, Serialize)]
pub struct TaskReport {
    pub task: String,
    pub output_path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    pub highlights: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub input_path: PathBuf,
    pub row_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub tasks: Vec<TaskReport>,
}

impl RunSummary {
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }
}

/// Holds the loaded readings for the lifetime of one run. Tasks borrow the base table
/// read-only; each task's derived frames are dropped once its CSV is written.
pub struct AnalysisSession {
    config: AnalysisConfig,
    readings: DataFrame,
    reports: Vec<TaskReport>,
    started_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn open(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let started_at = Utc::now();
        info!(
            input = %config.input_path.display(),
            output_dir = %config.output_dir.display(),
            "Opening analysis session"
        );

        let readings = load_readings(&config.input_path)?;
        Ok(Self {
            config,
            readings,
            reports: Vec::new(),
            started_at,
        })
    }

    pub fn reports(&self) -> &[TaskReport] {
        &self.reports
    }

    /// Runs one task against the base table and writes its output file.
    pub fn run_task(&mut self, task: &dyn AnalysisTask) -> Result<TaskOutcome> {
        info!(task = task.name(), "Running task");
        let mut outcome = task.run(&self.readings, &self.config)?;

        let output_path = self.config.output_path(task.output_file(&self.config));
        write_csv(&mut outcome.table, &output_path)?;

        for (label, value) in &outcome.highlights {
            info!(task = task.name(), label = %label, value = %value, "Task highlight");
        }

        self.reports.push(TaskReport {
            task: task.name().to_string(),
            output_path,
            rows: outcome.table.height(),
            columns: outcome.table.width(),
            highlights: outcome.highlights.clone(),
        });

        Ok(outcome)
    }

    /// Runs every task in order, stopping at the first failure. Outputs written before the
    /// failure stay on disk.
    pub fn run_all(&mut self) -> Result<Vec<TaskOutcome>> {
        let mut outcomes = Vec::new();
        for task in all_tasks() {
            outcomes.push(self.run_task(task)?);
        }
        Ok(outcomes)
    }

    pub fn close(self) -> RunSummary {
        let summary = RunSummary {
            input_path: self.config.input_path.clone(),
            row_count: self.readings.height(),
            started_at: self.started_at,
            finished_at: Utc::now(),
            tasks: self.reports,
        };
        info!(
            tasks = summary.tasks.len(),
            rows = summary.row_count,
            "Closed analysis session"
        );
        summary
    }
}
