use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

/// Manual day rollover: trim the ledger to today's entries. The serve
/// command runs the same trim from a timer shortly after midnight.
pub(crate) fn cmd_prune(tracker: &Tracker<SqliteStore>, json: bool) -> Result<()> {
    let removed = tracker.prune_to_today(Local::now().date_naive())?;

    if json {
        #[derive(Serialize)]
        struct PruneReport {
            removed: usize,
        }
        println!("{}", serde_json::to_string_pretty(&PruneReport { removed })?);
        return Ok(());
    }

    if removed == 0 {
        println!("Nothing to trim; ledger already holds only today's entries");
    } else {
        println!("Trimmed {removed} entries from previous days");
    }
    Ok(())
}
