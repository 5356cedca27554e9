use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use snapbite_core::lookup;
use snapbite_core::models::{DayProgress, FoodEntry, SOURCE_AI, SOURCE_LOCAL};
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

#[derive(Serialize)]
pub(crate) struct LoggedEntry {
    pub entry: FoodEntry,
    pub progress: DayProgress,
}

/// Build the entry for a manual `add`: explicit macros when calories
/// were given, otherwise a table lookup on the description with the
/// default estimate (tagged `ai`) as the fallback.
fn build_entry(
    description: &str,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    timestamp: String,
) -> FoodEntry {
    let base = FoodEntry {
        description: description.to_string(),
        calories: 0.0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
        timestamp,
        health_score: None,
        health_description: None,
        confidence: None,
        source: None,
    };

    if let Some(calories) = calories {
        return FoodEntry {
            calories,
            protein: protein.unwrap_or(0.0),
            carbs: carbs.unwrap_or(0.0),
            fat: fat.unwrap_or(0.0),
            ..base
        };
    }

    match lookup::find(description) {
        Some(m) => FoodEntry {
            calories: m.calories,
            protein: m.protein,
            carbs: m.carbs,
            fat: m.fat,
            confidence: Some(m.confidence),
            source: Some(SOURCE_LOCAL.to_string()),
            ..base
        },
        None => {
            let d = lookup::DEFAULT_ESTIMATE;
            FoodEntry {
                calories: d.calories,
                protein: d.protein,
                carbs: d.carbs,
                fat: d.fat,
                source: Some(SOURCE_AI.to_string()),
                ..base
            }
        }
    }
}

pub(crate) fn cmd_add(
    tracker: &Tracker<SqliteStore>,
    description: &str,
    calories: Option<f64>,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    json: bool,
) -> Result<()> {
    let timestamp = Local::now().to_rfc3339();
    let entry = build_entry(description, calories, protein, carbs, fat, timestamp);
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

pub(crate) fn print_logged(
    tracker: &Tracker<SqliteStore>,
    entry: &FoodEntry,
    progress: &DayProgress,
) {
    let description = &entry.description;
    let cal = entry.calories;
    let protein = entry.protein;
    let carbs = entry.carbs;
    let fat = entry.fat;
    let estimated = if entry.source.as_deref() == Some(SOURCE_AI) {
        " (estimated)"
    } else {
        ""
    };
    println!(
        "Logged: {description} — {cal:.0} kcal | P:{protein:.1}g C:{carbs:.1}g F:{fat:.1}g{estimated}"
    );

    let goal = tracker.goals().calories;
    let total = progress.calories;
    if progress.achieved {
        println!("Today: {total:.0} / {goal:.0} kcal — goal achieved");
    } else {
        let remaining = goal - total;
        println!("Today: {total:.0} / {goal:.0} kcal — {remaining:.0} kcal to go");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> String {
        "2024-06-15T12:00:00Z".to_string()
    }

    #[test]
    fn test_build_entry_explicit_macros() {
        let entry = build_entry("Leftovers", Some(450.0), Some(20.0), None, Some(15.0), ts());
        assert!((entry.calories - 450.0).abs() < f64::EPSILON);
        assert!((entry.protein - 20.0).abs() < f64::EPSILON);
        assert!((entry.carbs - 0.0).abs() < f64::EPSILON);
        assert!((entry.fat - 15.0).abs() < f64::EPSILON);
        assert!(entry.source.is_none());
        assert!(entry.confidence.is_none());
    }

    #[test]
    fn test_build_entry_lookup_hit() {
        let entry = build_entry("Pizza", None, None, None, None, ts());
        assert!((entry.calories - 266.0).abs() < f64::EPSILON);
        assert_eq!(entry.source.as_deref(), Some(SOURCE_LOCAL));
        assert_eq!(entry.confidence, Some(1.0));
    }

    #[test]
    fn test_build_entry_substring_hit() {
        let entry = build_entry("cheesy pizza", None, None, None, None, ts());
        assert!((entry.calories - 266.0).abs() < f64::EPSILON);
        assert_eq!(entry.confidence, Some(0.8));
    }

    #[test]
    fn test_build_entry_lookup_miss_uses_default_estimate() {
        let entry = build_entry("kumquat", None, None, None, None, ts());
        assert!((entry.calories - 200.0).abs() < f64::EPSILON);
        assert!((entry.protein - 10.0).abs() < f64::EPSILON);
        assert_eq!(entry.source.as_deref(), Some(SOURCE_AI));
        assert!(entry.confidence.is_none());
    }

    #[test]
    fn test_build_entry_explicit_macros_skip_lookup() {
        // An explicit calorie count wins even when the name would match
        let entry = build_entry("pizza", Some(100.0), None, None, None, ts());
        assert!((entry.calories - 100.0).abs() < f64::EPSILON);
        assert!(entry.source.is_none());
    }
}
