//! JSON export of a full run report.
//!
//! Unlike the CSV table, the report also carries one outcome per source,
//! including the error kind and message for sources that failed.

use super::export_filename;
use crate::error::ExportError;
use crate::models::RunReport;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Write `report` as pretty JSON for `date` into `output_dir`.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir.as_ref().display()))]
pub async fn write_report(
    report: &RunReport,
    output_dir: impl AsRef<Path>,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let json = serde_json::to_string_pretty(report)?;
    let path = output_dir.as_ref().join(export_filename(date, "json"));

    fs::write(&path, json).await?;
    info!(path = %path.display(), items = report.items.len(), "Wrote JSON report");
    Ok(path)
}
