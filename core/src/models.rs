use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

pub const SOURCE_LOCAL: &str = "local";
pub const SOURCE_AI: &str = "ai";

/// One recorded instance of food consumption. Entries are append-only:
/// once written they are never edited, only bulk-trimmed at day rollover.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodEntry {
    pub description: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    /// RFC 3339 instant. The date prefix decides which day the entry
    /// belongs to; no timezone math is applied on top of it.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub health_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub health_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
}

/// The `YYYY-MM-DD` component of a stored timestamp, or `""` if the
/// string is too short to carry one.
#[must_use]
pub fn timestamp_date(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or("")
}

/// The `HH:MM` component of a stored timestamp, or `""`.
#[must_use]
pub fn timestamp_time(timestamp: &str) -> &str {
    timestamp.get(11..16).unwrap_or("")
}

/// Summed nutrient fields over a set of entries. Derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutrientTotals {
    /// Pointwise sum; an empty list yields all-zero totals. The result
    /// does not depend on entry order.
    #[must_use]
    pub fn from_entries(entries: &[FoodEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, e| Self {
            calories: acc.calories + e.calories,
            protein: acc.protein + e.protein,
            carbs: acc.carbs + e.carbs,
            fat: acc.fat + e.fat,
        })
    }

    /// Only the calorie goal gates achievement; protein/carbs/fat goals
    /// are tracked for display but do not affect this flag.
    #[must_use]
    pub fn meets_goal(&self, goals: &MacroGoals) -> bool {
        self.calories >= goals.calories
    }
}

/// Daily macro goals. Missing fields deserialize to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Default for MacroGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 250.0,
            fat: 70.0,
        }
    }
}

/// Per-calendar-day record of whether the calorie goal was met. At most
/// one record per date; later writes for the same date replace
/// `achieved` and `calories` in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: String,
    pub achieved: bool,
    pub calories: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Streaks {
    pub current: usize,
    pub longest: usize,
}

pub fn validate_entry(entry: &FoodEntry) -> Result<()> {
    if entry.description.trim().is_empty() {
        bail!("Entry description must not be empty");
    }
    for (name, value) in [
        ("calories", entry.calories),
        ("protein", entry.protein),
        ("carbs", entry.carbs),
        ("fat", entry.fat),
    ] {
        if value < 0.0 {
            bail!("{name} must not be negative");
        }
    }
    if entry.health_score.is_some_and(|v| !(0.0..=100.0).contains(&v)) {
        bail!("health_score must be between 0 and 100");
    }
    if entry.confidence.is_some_and(|v| !(0.0..=1.0).contains(&v)) {
        bail!("confidence must be between 0 and 1");
    }
    if let Some(source) = entry.source.as_deref() {
        if source != SOURCE_LOCAL && source != SOURCE_AI {
            bail!("Invalid source '{source}'. Must be one of: {SOURCE_LOCAL}, {SOURCE_AI}");
        }
    }
    if chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_err() {
        bail!(
            "Invalid timestamp '{}'. Must be RFC 3339 format",
            entry.timestamp
        );
    }
    Ok(())
}

pub fn validate_goals(goals: &MacroGoals) -> Result<()> {
    for (name, value) in [
        ("calories", goals.calories),
        ("protein", goals.protein),
        ("carbs", goals.carbs),
        ("fat", goals.fat),
    ] {
        if value < 0.0 {
            bail!("Goal {name} must not be negative");
        }
    }
    Ok(())
}
