use anyhow::Result;
use serde::Serialize;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use snapbite_core::models::{DayProgress, Streaks};
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

use super::helpers::parse_month;

pub(crate) fn cmd_calendar(
    tracker: &Tracker<SqliteStore>,
    month: Option<String>,
    json: bool,
) -> Result<()> {
    let (year, month) = parse_month(month)?;
    let records = tracker.month_progress(year, month);
    // Streaks and insights always scan the full history, not one month.
    let streaks = tracker.streaks();
    let insights = tracker.insights();

    if json {
        #[derive(Serialize)]
        struct CalendarView {
            year: i32,
            month: u32,
            records: Vec<DayProgress>,
            streaks: Streaks,
            insights: Vec<String>,
        }
        let view = CalendarView {
            year,
            month,
            records,
            streaks,
            insights,
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if tracker.progress().is_empty() {
        eprintln!("No progress recorded yet. Log a food entry to start tracking.");
        process::exit(2);
    }

    if records.is_empty() {
        println!("No records for {year:04}-{month:02}\n");
    } else {
        #[derive(Tabled)]
        struct CalendarRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Calories")]
            calories: String,
            #[tabled(rename = "Goal")]
            goal: String,
        }

        let rows: Vec<CalendarRow> = records
            .iter()
            .map(|day| CalendarRow {
                date: day.date.clone(),
                calories: format!("{:.0}", day.calories),
                goal: if day.achieved { "achieved" } else { "missed" }.to_string(),
            })
            .collect();

        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
            .to_string();
        println!("{table}\n");
    }

    let current = streaks.current;
    let longest = streaks.longest;
    println!("Current streak: {current} days");
    println!("Longest streak: {longest} days");

    println!();
    if insights.is_empty() {
        println!("Track more days to receive personalized insights!");
    } else {
        for insight in &insights {
            println!("- {insight}");
        }
    }

    Ok(())
}
