use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use snapbite_core::analysis::response_to_entry;
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

use crate::analysis::AnalysisClient;

use super::add::{LoggedEntry, print_logged};

/// Capture flow: read the image, post it to the analysis endpoint, and
/// log the estimate. Any failure — unreadable file, transport error, or
/// an error payload from the endpoint — records nothing; the user
/// retries manually.
pub(crate) async fn cmd_analyze(
    tracker: &Tracker<SqliteStore>,
    client: &AnalysisClient,
    image: &Path,
    json: bool,
) -> Result<()> {
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read image: {}", image.display()))?;

    let response = client.analyze_image(&bytes).await?;

    let timestamp = Local::now().to_rfc3339();
    let entry = response_to_entry(response, &timestamp).context("Analysis failed; try again")?;
    let progress = tracker.add_entry(entry.clone())?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&LoggedEntry { entry, progress })?
        );
        return Ok(());
    }

    print_logged(tracker, &entry, &progress);
    Ok(())
}
