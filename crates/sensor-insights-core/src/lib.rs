pub mod config;
pub mod error;
pub mod explore;
pub mod filter;
pub mod hourly;
pub mod loader;
pub mod pivot;
pub mod ranking;
pub mod session;
pub mod tasks;
pub mod writer;

pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use session::{AnalysisSession, RunSummary, TaskReport};
pub use tasks::{all_tasks, AnalysisTask, TaskOutcome};
