use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::calendar;
use crate::models::{
    DayProgress, FoodEntry, MacroGoals, NutrientTotals, Streaks, validate_entry, validate_goals,
};
use crate::store::{ENTRIES_KEY, GOALS_KEY, KeyValueStore, MemoryStore, PROGRESS_KEY, SqliteStore};

/// The tracking service: the entry ledger, goal configuration, and
/// calendar progress, all persisted through one injected key-value
/// store. Reads never fail — missing or corrupt blobs degrade to the
/// empty/default value. Writes rewrite the whole blob and propagate
/// errors.
pub struct Tracker<S: KeyValueStore> {
    store: S,
}

impl Tracker<SqliteStore> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open(path)?,
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            store: SqliteStore::open_in_memory()?,
        })
    }
}

impl Tracker<MemoryStore> {
    #[must_use]
    pub fn new_in_memory() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- Entry ledger ---

    /// Every entry ever persisted, oldest first. Empty on first run and
    /// on unreadable or corrupt storage.
    #[must_use]
    pub fn entries(&self) -> Vec<FoodEntry> {
        self.read_or_default(ENTRIES_KEY)
    }

    /// Entries whose stored timestamp starts with the given date. This
    /// is a date-prefix comparison, not a timezone-aware range query:
    /// an entry belongs to the day printed in its timestamp.
    #[must_use]
    pub fn entries_for(&self, date: NaiveDate) -> Vec<FoodEntry> {
        let prefix = date.format("%Y-%m-%d").to_string();
        self.entries()
            .into_iter()
            .filter(|e| e.timestamp.starts_with(&prefix))
            .collect()
    }

    #[must_use]
    pub fn daily_totals(&self, date: NaiveDate) -> NutrientTotals {
        NutrientTotals::from_entries(&self.entries_for(date))
    }

    /// Append an entry (no deduplication — a repeated meal is a new
    /// entry), then recompute that day's totals, evaluate the calorie
    /// goal, and upsert the day's calendar record. Returns the updated
    /// record.
    pub fn add_entry(&self, entry: FoodEntry) -> Result<DayProgress> {
        validate_entry(&entry)?;
        let day = crate::models::timestamp_date(&entry.timestamp).to_string();

        let mut entries = self.entries();
        entries.push(entry);
        self.write_json(ENTRIES_KEY, &entries)?;

        let day_entries: Vec<FoodEntry> = entries
            .iter()
            .filter(|e| e.timestamp.starts_with(&day))
            .cloned()
            .collect();
        let totals = NutrientTotals::from_entries(&day_entries);
        let achieved = totals.meets_goal(&self.goals());

        self.upsert_progress(&day, achieved, totals.calories)
    }

    /// Overwrite the ledger with only today's entries, bounding storage
    /// growth at day rollover. Idempotent; calendar history is never
    /// touched. Returns how many entries were dropped.
    pub fn prune_to_today(&self, today: NaiveDate) -> Result<usize> {
        let prefix = today.format("%Y-%m-%d").to_string();
        let entries = self.entries();
        let kept: Vec<FoodEntry> = entries
            .iter()
            .filter(|e| e.timestamp.starts_with(&prefix))
            .cloned()
            .collect();
        let removed = entries.len() - kept.len();
        self.write_json(ENTRIES_KEY, &kept)?;
        Ok(removed)
    }

    // --- Goals ---

    /// Stored goals, or the defaults when nothing (readable) is stored.
    #[must_use]
    pub fn goals(&self) -> MacroGoals {
        self.read_or_default(GOALS_KEY)
    }

    pub fn set_goals(&self, goals: &MacroGoals) -> Result<()> {
        validate_goals(goals)?;
        self.write_json(GOALS_KEY, goals)
    }

    // --- Calendar progress ---

    /// Full per-day history, insertion order. Never pruned.
    #[must_use]
    pub fn progress(&self) -> Vec<DayProgress> {
        self.read_or_default(PROGRESS_KEY)
    }

    /// Upsert the record for `date`: replace `achieved`/`calories` on an
    /// existing record, or append a new one. The record count only grows
    /// on the first write for a date.
    pub fn upsert_progress(&self, date: &str, achieved: bool, calories: f64) -> Result<DayProgress> {
        let mut records = self.progress();
        if let Some(existing) = records.iter_mut().find(|p| p.date == date) {
            existing.achieved = achieved;
            existing.calories = calories;
        } else {
            records.push(DayProgress {
                date: date.to_string(),
                achieved,
                calories,
            });
        }
        self.write_json(PROGRESS_KEY, &records)?;
        Ok(DayProgress {
            date: date.to_string(),
            achieved,
            calories,
        })
    }

    #[must_use]
    pub fn streaks(&self) -> Streaks {
        calendar::streaks(&self.progress())
    }

    #[must_use]
    pub fn insights(&self) -> Vec<String> {
        calendar::insights(&self.progress())
    }

    #[must_use]
    pub fn month_progress(&self, year: i32, month: u32) -> Vec<DayProgress> {
        calendar::month_records(&self.progress(), year, month)
    }

    // --- Storage helpers ---

    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.store
            .get(key)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("Failed to serialize value")?;
        self.store
            .set(key, &raw)
            .with_context(|| format!("Failed to persist '{key}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SOURCE_LOCAL;

    fn entry(description: &str, calories: f64, timestamp: &str) -> FoodEntry {
        FoodEntry {
            description: description.to_string(),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fat: 5.0,
            timestamp: timestamp.to_string(),
            health_score: None,
            health_description: None,
            confidence: Some(1.0),
            source: Some(SOURCE_LOCAL.to_string()),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_entries_empty_on_first_run() {
        let tracker = Tracker::new_in_memory();
        assert!(tracker.entries().is_empty());
        assert!(tracker.progress().is_empty());
    }

    #[test]
    fn test_entries_degrade_on_corrupt_storage() {
        let tracker = Tracker::new_in_memory();
        tracker.store().set(ENTRIES_KEY, "not json at all").unwrap();
        tracker.store().set(PROGRESS_KEY, "{\"oops\":").unwrap();
        tracker.store().set(GOALS_KEY, "[]").unwrap();

        assert!(tracker.entries().is_empty());
        assert!(tracker.progress().is_empty());
        // Corrupt goals fall back to the defaults
        assert_eq!(tracker.goals(), MacroGoals::default());
    }

    #[test]
    fn test_add_entry_appends_without_dedup() {
        let tracker = Tracker::new_in_memory();
        tracker
            .add_entry(entry("Pizza", 266.0, "2024-06-15T12:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Pizza", 266.0, "2024-06-15T12:00:00Z"))
            .unwrap();
        assert_eq!(tracker.entries().len(), 2);
    }

    #[test]
    fn test_add_entry_rejects_invalid() {
        let tracker = Tracker::new_in_memory();
        assert!(
            tracker
                .add_entry(entry("", 100.0, "2024-06-15T12:00:00Z"))
                .is_err()
        );
        // Nothing persisted on rejection
        assert!(tracker.entries().is_empty());
        assert!(tracker.progress().is_empty());
    }

    #[test]
    fn test_entries_for_filters_by_date_prefix() {
        let tracker = Tracker::new_in_memory();
        tracker
            .add_entry(entry("Yesterday", 100.0, "2024-06-14T23:59:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Morning", 200.0, "2024-06-15T00:01:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Evening", 300.0, "2024-06-15T22:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Tomorrow", 400.0, "2024-06-16T08:00:00Z"))
            .unwrap();

        let today = tracker.entries_for(date("2024-06-15"));
        let names: Vec<&str> = today.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Morning", "Evening"]);

        let totals = tracker.daily_totals(date("2024-06-15"));
        assert!((totals.calories - 500.0).abs() < 0.01);
    }

    #[test]
    fn test_add_entry_creates_then_updates_day_record() {
        let tracker = Tracker::new_in_memory();
        tracker
            .set_goals(&MacroGoals {
                calories: 500.0,
                ..MacroGoals::default()
            })
            .unwrap();

        let progress = tracker
            .add_entry(entry("Lunch", 300.0, "2024-06-15T12:00:00Z"))
            .unwrap();
        assert_eq!(progress.date, "2024-06-15");
        assert!(!progress.achieved);
        assert!((progress.calories - 300.0).abs() < 0.01);
        assert_eq!(tracker.progress().len(), 1);

        let progress = tracker
            .add_entry(entry("Dinner", 300.0, "2024-06-15T19:00:00Z"))
            .unwrap();
        assert!(progress.achieved);
        assert!((progress.calories - 600.0).abs() < 0.01);
        // Same date: still one record, fields replaced in place
        assert_eq!(tracker.progress().len(), 1);
        assert!(tracker.progress()[0].achieved);
    }

    #[test]
    fn test_day_records_keep_their_date_identity() {
        let tracker = Tracker::new_in_memory();
        tracker
            .add_entry(entry("One", 100.0, "2024-06-14T12:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Two", 100.0, "2024-06-15T12:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Three", 100.0, "2024-06-15T13:00:00Z"))
            .unwrap();

        let records = tracker.progress();
        let dates: Vec<&str> = records.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-06-14", "2024-06-15"]);
    }

    #[test]
    fn test_prune_to_today_drops_only_other_days() {
        let tracker = Tracker::new_in_memory();
        tracker
            .add_entry(entry("Old", 100.0, "2024-06-14T12:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Current", 200.0, "2024-06-15T12:00:00Z"))
            .unwrap();

        let removed = tracker.prune_to_today(date("2024-06-15")).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.entries()[0].description, "Current");

        // Calendar history survives the prune
        assert_eq!(tracker.progress().len(), 2);
    }

    #[test]
    fn test_prune_to_today_idempotent() {
        let tracker = Tracker::new_in_memory();
        tracker
            .add_entry(entry("Old", 100.0, "2024-06-14T12:00:00Z"))
            .unwrap();
        tracker
            .add_entry(entry("Current", 200.0, "2024-06-15T12:00:00Z"))
            .unwrap();

        tracker.prune_to_today(date("2024-06-15")).unwrap();
        let after_once = tracker.entries();
        let removed_again = tracker.prune_to_today(date("2024-06-15")).unwrap();
        assert_eq!(removed_again, 0);
        let after_twice = tracker.entries();
        assert_eq!(
            serde_json::to_string(&after_once).unwrap(),
            serde_json::to_string(&after_twice).unwrap()
        );
    }

    #[test]
    fn test_goals_roundtrip_and_defaults() {
        let tracker = Tracker::new_in_memory();
        assert_eq!(tracker.goals(), MacroGoals::default());

        let goals = MacroGoals {
            calories: 1800.0,
            protein: 120.0,
            carbs: 200.0,
            fat: 60.0,
        };
        tracker.set_goals(&goals).unwrap();
        assert_eq!(tracker.goals(), goals);

        assert!(
            tracker
                .set_goals(&MacroGoals {
                    calories: -1.0,
                    ..MacroGoals::default()
                })
                .is_err()
        );
    }

    #[test]
    fn test_upsert_progress_replaces_fields_in_place() {
        let tracker = Tracker::new_in_memory();
        tracker.upsert_progress("2024-06-15", false, 1200.0).unwrap();
        tracker.upsert_progress("2024-06-15", true, 2100.0).unwrap();

        let records = tracker.progress();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, "2024-06-15");
        assert!(records[0].achieved);
        assert!((records[0].calories - 2100.0).abs() < 0.01);
    }

    #[test]
    fn test_streaks_and_insights_read_full_history() {
        let tracker = Tracker::new_in_memory();
        tracker.upsert_progress("2024-03-01", true, 2000.0).unwrap();
        tracker.upsert_progress("2024-03-02", true, 2000.0).unwrap();
        tracker.upsert_progress("2024-03-03", false, 900.0).unwrap();
        tracker.upsert_progress("2024-03-04", true, 2000.0).unwrap();
        tracker.upsert_progress("2024-03-05", true, 2000.0).unwrap();

        let streaks = tracker.streaks();
        assert_eq!(streaks.current, 2);
        assert_eq!(streaks.longest, 2);
    }

    #[test]
    fn test_month_progress_filters() {
        let tracker = Tracker::new_in_memory();
        tracker.upsert_progress("2024-05-31", true, 2000.0).unwrap();
        tracker.upsert_progress("2024-06-01", true, 2000.0).unwrap();
        tracker.upsert_progress("2024-07-01", true, 2000.0).unwrap();

        let june = tracker.month_progress(2024, 6);
        assert_eq!(june.len(), 1);
        assert_eq!(june[0].date, "2024-06-01");
    }

    #[test]
    fn test_works_against_sqlite_store() {
        let tracker = Tracker::open_in_memory().unwrap();
        tracker
            .add_entry(entry("Pizza", 266.0, "2024-06-15T12:00:00Z"))
            .unwrap();
        assert_eq!(tracker.entries().len(), 1);
        assert_eq!(tracker.progress().len(), 1);
    }

    #[test]
    fn test_interleaved_read_modify_write_is_last_write_wins() {
        // Two cycles that both read before either writes: the second
        // write clobbers the first. Not a correctness target — this
        // documents the storage model.
        let tracker = Tracker::new_in_memory();
        let first = {
            let mut entries = tracker.entries();
            entries.push(entry("A", 100.0, "2024-06-15T08:00:00Z"));
            entries
        };
        let second = {
            let mut entries = tracker.entries();
            entries.push(entry("B", 100.0, "2024-06-15T09:00:00Z"));
            entries
        };
        tracker
            .store()
            .set(ENTRIES_KEY, &serde_json::to_string(&first).unwrap())
            .unwrap();
        tracker
            .store()
            .set(ENTRIES_KEY, &serde_json::to_string(&second).unwrap())
            .unwrap();

        let names: Vec<String> = tracker
            .entries()
            .iter()
            .map(|e| e.description.clone())
            .collect();
        assert_eq!(names, vec!["B".to_string()]);
    }
}
