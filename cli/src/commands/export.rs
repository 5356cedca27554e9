use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use snapbite_core::export;
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

use super::helpers::parse_month;

#[derive(Serialize)]
struct ExportReport {
    path: String,
    rows: usize,
}

pub(crate) fn cmd_export_entries(
    tracker: &Tracker<SqliteStore>,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let entries = tracker.entries();
    let csv = export::entries_csv(&entries);
    let path =
        out.unwrap_or_else(|| PathBuf::from(export::entries_filename(Local::now().date_naive())));

    std::fs::write(&path, &csv)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    report(&path, entries.len(), json)
}

pub(crate) fn cmd_export_month(
    tracker: &Tracker<SqliteStore>,
    month: Option<String>,
    out: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let (year, month) = parse_month(month)?;
    let records = tracker.month_progress(year, month);
    let csv = export::calendar_csv(&records);
    let path = out.unwrap_or_else(|| PathBuf::from(export::calendar_filename(year, month)));

    std::fs::write(&path, &csv)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;

    report(&path, records.len(), json)
}

fn report(path: &std::path::Path, rows: usize, json: bool) -> Result<()> {
    if json {
        let report = ExportReport {
            path: path.display().to_string(),
            rows,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let path = path.display();
        println!("Exported {rows} rows to {path}");
    }
    Ok(())
}
