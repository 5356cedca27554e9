use chrono::NaiveDate;

use crate::models::{DayProgress, FoodEntry, timestamp_date, timestamp_time};

pub const ENTRIES_HEADER: &[&str] = &[
    "Date",
    "Time",
    "Description",
    "Calories",
    "Protein (g)",
    "Carbs (g)",
    "Fat (g)",
];

pub const CALENDAR_HEADER: &[&str] = &["Date", "Calories", "Goal Achieved"];

/// Comma-joined CSV: header row, then one row per record, rows joined
/// with newlines. Field values are emitted verbatim — no quoting or
/// escaping, so a comma inside a value shifts the columns after it.
/// Accepted limitation: the fields exported here are dates, numbers,
/// and short food names.
#[must_use]
pub fn to_csv(header: &[&str], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(header.join(","));
    for row in rows {
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Full-ledger export: date and time come straight from the stored
/// timestamp's printed components.
#[must_use]
pub fn entries_csv(entries: &[FoodEntry]) -> String {
    let rows: Vec<Vec<String>> = entries
        .iter()
        .map(|e| {
            vec![
                timestamp_date(&e.timestamp).to_string(),
                timestamp_time(&e.timestamp).to_string(),
                e.description.clone(),
                e.calories.to_string(),
                e.protein.to_string(),
                e.carbs.to_string(),
                e.fat.to_string(),
            ]
        })
        .collect();
    to_csv(ENTRIES_HEADER, &rows)
}

/// Calendar export; callers pre-filter to one month's records.
#[must_use]
pub fn calendar_csv(records: &[DayProgress]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|day| {
            vec![
                day.date.clone(),
                day.calories.to_string(),
                if day.achieved { "Yes" } else { "No" }.to_string(),
            ]
        })
        .collect();
    to_csv(CALENDAR_HEADER, &rows)
}

#[must_use]
pub fn entries_filename(today: NaiveDate) -> String {
    format!("food-entries-{}.csv", today.format("%Y-%m-%d"))
}

#[must_use]
pub fn calendar_filename(year: i32, month: u32) -> String {
    format!("calorie-tracker-{year:04}-{month:02}.csv")
}
