use anyhow::Result;

use snapbite_core::models::MacroGoals;
use snapbite_core::store::SqliteStore;
use snapbite_core::tracker::Tracker;

pub(crate) fn cmd_goal_set(
    tracker: &Tracker<SqliteStore>,
    calories: f64,
    protein: Option<f64>,
    carbs: Option<f64>,
    fat: Option<f64>,
    json: bool,
) -> Result<()> {
    let current = tracker.goals();
    let goals = MacroGoals {
        calories,
        protein: protein.unwrap_or(current.protein),
        carbs: carbs.unwrap_or(current.carbs),
        fat: fat.unwrap_or(current.fat),
    };
    tracker.set_goals(&goals)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&goals)?);
        return Ok(());
    }

    print_goals(&goals);
    Ok(())
}

pub(crate) fn cmd_goal_show(tracker: &Tracker<SqliteStore>, json: bool) -> Result<()> {
    let goals = tracker.goals();

    if json {
        println!("{}", serde_json::to_string_pretty(&goals)?);
        return Ok(());
    }

    print_goals(&goals);
    Ok(())
}

fn print_goals(goals: &MacroGoals) {
    let calories = goals.calories;
    let protein = goals.protein;
    let carbs = goals.carbs;
    let fat = goals.fat;
    println!("Daily goals: {calories:.0} kcal | P:{protein:.0}g C:{carbs:.0}g F:{fat:.0}g");
}
