use std::fs::{self, File};
use std::path::Path;

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::info;

use crate::error::Result;

/// Writes `df` with a header row, truncating any existing file at `path`.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "Wrote task output"
    );
    Ok(())
}
