//! Static nutrition lookup. This is the whole of the "recognition"
//! knowledge: a small table of common foods with per-serving estimates.

/// Per-serving nutrition estimate for one food.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodFacts {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A lookup hit. Confidence is 1.0 for an exact key match and 0.8 for a
/// substring match in either direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookupMatch {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub confidence: f64,
}

/// Fallback estimate callers substitute when `find` returns nothing;
/// such entries are tagged `source = "ai"` with no confidence value.
pub const DEFAULT_ESTIMATE: FoodFacts = FoodFacts {
    calories: 200.0,
    protein: 10.0,
    carbs: 25.0,
    fat: 8.0,
};

/// `(name, calories, protein, carbs, fat)` per typical serving.
/// Iteration order matters: substring matching is first-match-wins.
pub const NUTRITION_TABLE: &[(&str, f64, f64, f64, f64)] = &[
    ("pizza", 266.0, 11.0, 33.0, 10.0),
    ("burger", 354.0, 20.0, 29.0, 17.0),
    ("salad", 100.0, 3.0, 11.0, 7.0),
    ("pasta", 288.0, 12.0, 57.0, 2.0),
    ("rice", 130.0, 2.7, 28.0, 0.3),
    ("chicken", 335.0, 38.0, 0.0, 20.0),
    ("fish", 206.0, 22.0, 0.0, 12.0),
    ("sandwich", 250.0, 12.0, 34.0, 8.0),
    ("apple", 52.0, 0.3, 14.0, 0.2),
    ("banana", 89.0, 1.1, 23.0, 0.3),
    ("orange", 47.0, 0.9, 12.0, 0.1),
    ("yogurt", 59.0, 3.5, 5.0, 3.3),
    ("eggs", 155.0, 13.0, 1.1, 11.0),
    ("cheese", 402.0, 25.0, 1.3, 33.0),
    ("nuts", 607.0, 21.0, 20.0, 54.0),
    ("chocolate", 546.0, 4.9, 61.0, 31.0),
    ("bread", 265.0, 9.0, 49.0, 3.2),
    ("steak", 271.0, 26.0, 0.0, 19.0),
    ("potato", 77.0, 2.0, 17.0, 0.1),
    ("avocado", 160.0, 2.0, 8.5, 14.7),
    ("sushi", 200.0, 7.0, 38.0, 3.0),
];

/// Look up a food name: lowercase and trim, try an exact key match
/// (confidence 1.0), then the first table entry where either normalized
/// name contains the other (confidence 0.8). First match wins, not best
/// match.
#[must_use]
pub fn find(name: &str) -> Option<LookupMatch> {
    let lowered = name.to_lowercase();
    let normalized = lowered.trim();

    for &(key, calories, protein, carbs, fat) in NUTRITION_TABLE {
        if normalized == key {
            return Some(LookupMatch {
                calories,
                protein,
                carbs,
                fat,
                confidence: 1.0,
            });
        }
    }

    for &(key, calories, protein, carbs, fat) in NUTRITION_TABLE {
        if normalized.contains(key) || key.contains(normalized) {
            return Some(LookupMatch {
                calories,
                protein,
                carbs,
                fat,
                confidence: 0.8,
            });
        }
    }

    None
}
