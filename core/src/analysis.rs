use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::models::{FoodEntry, SOURCE_AI};

/// Payload posted to the analysis endpoint: a base64 image, optionally
/// carrying a `data:image/...;base64,` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroPercentages {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

/// Response from the analysis endpoint. The endpoint answers HTTP 200
/// for both outcomes, so the shape carries either the estimate fields
/// or `error`/`details` — never trust one without checking the other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub protein: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub carbs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    #[serde(
        rename = "macroPercentages",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub macro_percentages: Option<MacroPercentages>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}

/// Share of calories contributed by each macro (4 kcal/g for protein
/// and carbs, 9 kcal/g for fat), rounded to whole percentages. All
/// zeros when the macro calories sum to zero.
#[must_use]
pub fn macro_percentages(protein: f64, carbs: f64, fat: f64) -> MacroPercentages {
    let protein_calories = protein * 4.0;
    let carb_calories = carbs * 4.0;
    let fat_calories = fat * 9.0;
    let total = protein_calories + carb_calories + fat_calories;

    if total <= 0.0 {
        return MacroPercentages {
            protein: 0,
            carbs: 0,
            fat: 0,
        };
    }

    let pct = |part: f64| (part / total * 100.0).round() as i64;
    MacroPercentages {
        protein: pct(protein_calories),
        carbs: pct(carb_calories),
        fat: pct(fat_calories),
    }
}

/// Convert an analysis response into a ledger entry stamped with
/// `timestamp`. An error payload, or a payload missing the estimate
/// fields, yields `Err` — no entry is created and the message is
/// surfaced to the user for a manual retry.
pub fn response_to_entry(response: AnalysisResponse, timestamp: &str) -> Result<FoodEntry> {
    if let Some(error) = response.error {
        match response.details {
            Some(details) => bail!("{error} ({details})"),
            None => bail!("{error}"),
        }
    }

    let Some(description) = response.description.filter(|d| !d.is_empty()) else {
        bail!("Analysis response missing a description");
    };
    let Some(calories) = response.calories else {
        bail!("Analysis response missing a calorie estimate");
    };

    Ok(FoodEntry {
        description,
        calories,
        protein: response.protein.unwrap_or(0.0),
        carbs: response.carbs.unwrap_or(0.0),
        fat: response.fat.unwrap_or(0.0),
        timestamp: timestamp.to_string(),
        health_score: None,
        health_description: None,
        confidence: response.confidence,
        source: response.source.or_else(|| Some(SOURCE_AI.to_string())),
    })
}
