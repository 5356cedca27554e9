use anyhow::Result;
use chrono::Local;
use serde::Serialize;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use snapbite_core::models::{
    FoodEntry, MacroGoals, NutrientTotals, SOURCE_AI, timestamp_time,
};
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

use super::helpers::{no_neg_zero, parse_date};

#[derive(Serialize)]
struct DailySummary {
    date: String,
    entries: Vec<FoodEntry>,
    totals: NutrientTotals,
    goals: MacroGoals,
    achieved: bool,
}

pub(crate) fn cmd_summary(
    tracker: &Tracker<SqliteStore>,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let entries = tracker.entries_for(date);
    let totals = NutrientTotals::from_entries(&entries);
    let goals = tracker.goals();
    let achieved = totals.meets_goal(&goals);
    let date = date.format("%Y-%m-%d").to_string();

    if json {
        let summary = DailySummary {
            date,
            entries,
            totals,
            goals,
            achieved,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if entries.is_empty() {
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    println!("=== {date} ===\n");

    for e in &entries {
        let time = timestamp_time(&e.timestamp);
        let description = &e.description;
        let cal = e.calories;
        let protein = e.protein;
        let carbs = e.carbs;
        let fat = e.fat;
        let tag = if e.source.as_deref() == Some(SOURCE_AI) {
            " (estimated)".to_string()
        } else {
            e.confidence
                .filter(|c| *c < 1.0)
                .map(|c| format!(" ({:.0}% match)", c * 100.0))
                .unwrap_or_default()
        };
        println!(
            "  [{time}] {description} — {cal:.0} kcal | P:{protein:.1}g C:{carbs:.1}g F:{fat:.1}g{tag}"
        );
    }
    println!();

    let total_cal = totals.calories;
    let total_p = totals.protein;
    let total_c = totals.carbs;
    let total_f = totals.fat;
    println!("  TOTAL: {total_cal:.0} kcal | P:{total_p:.0}g C:{total_c:.0}g F:{total_f:.0}g");

    let goal_cal = goals.calories;
    let goal_p = goals.protein;
    let goal_c = goals.carbs;
    let goal_f = goals.fat;
    println!("  GOAL:  {goal_cal:.0} kcal | P:{goal_p:.0}g C:{goal_c:.0}g F:{goal_f:.0}g");

    if achieved {
        println!("  Calorie goal achieved");
    } else {
        let remaining = goal_cal - total_cal;
        println!("  {remaining:.0} kcal remaining");
    }

    Ok(())
}

pub(crate) fn cmd_history(tracker: &Tracker<SqliteStore>, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Carbs")]
        carbs: String,
        #[tabled(rename = "Fat")]
        fat: String,
    }

    #[derive(Serialize)]
    struct HistoryDay {
        date: String,
        totals: NutrientTotals,
        achieved: bool,
    }

    let today = Local::now().date_naive();
    let goals = tracker.goals();
    let mut summaries = Vec::new();

    for i in 0..days {
        let date = today - chrono::Duration::days(i64::from(i));
        let totals = tracker.daily_totals(date);
        summaries.push(HistoryDay {
            date: date.format("%Y-%m-%d").to_string(),
            achieved: totals.meets_goal(&goals),
            totals,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let rows: Vec<HistoryRow> = summaries
        .iter()
        .map(|s| {
            let cal = no_neg_zero(s.totals.calories);
            let p = no_neg_zero(s.totals.protein);
            let c = no_neg_zero(s.totals.carbs);
            let f = no_neg_zero(s.totals.fat);
            HistoryRow {
                date: s.date.clone(),
                calories: format!("{cal:.0}"),
                protein: format!("{p:.0}g"),
                carbs: format!("{c:.0}g"),
                fat: format!("{f:.0}g"),
            }
        })
        .collect();

    if rows.iter().all(|r| r.calories == "0") {
        eprintln!("No entries in the last {days} days");
        process::exit(2);
    }

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
