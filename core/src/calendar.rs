use chrono::{Datelike, Months, NaiveDate, Weekday};

use crate::models::{DayProgress, Streaks};

pub const WEEKEND_INSIGHT: &str = "You tend to miss your calorie goals on weekends. Consider meal prepping for Saturdays and Sundays!";
pub const SUCCESS_INSIGHT: &str = "Great job! You're hitting your goals more than 70% of the time!";

/// Current and longest runs of consecutive achieved day-records.
///
/// Records are sorted descending by date; `current` counts achieved
/// records from the most recent backward until the first miss, and
/// `longest` is the longest contiguous achieved block anywhere in the
/// sorted list. Runs count records, not calendar days: a day with no
/// record at all does not break a streak.
#[must_use]
pub fn streaks(records: &[DayProgress]) -> Streaks {
    let mut sorted: Vec<&DayProgress> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let current = sorted.iter().take_while(|p| p.achieved).count();

    let mut longest = 0;
    let mut run = 0;
    for day in &sorted {
        if day.achieved {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    Streaks { current, longest }
}

/// Rule-based observations over the recorded history, in a fixed order:
/// more than two missed weekend days first, then a >70% success ratio.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn insights(records: &[DayProgress]) -> Vec<String> {
    let mut out = Vec::new();

    let weekend_misses = records
        .iter()
        .filter(|day| !day.achieved && is_weekend(&day.date))
        .count();
    if weekend_misses > 2 {
        out.push(WEEKEND_INSIGHT.to_string());
    }

    let achieved = records.iter().filter(|day| day.achieved).count();
    if achieved as f64 > records.len() as f64 * 0.7 {
        out.push(SUCCESS_INSIGHT.to_string());
    }

    out
}

/// Records whose date falls within the given month, first to last day
/// inclusive. Records with unparseable dates are skipped.
#[must_use]
pub fn month_records(records: &[DayProgress], year: i32, month: u32) -> Vec<DayProgress> {
    let Some(start) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let Some(end) = start
        .checked_add_months(Months::new(1))
        .and_then(NaiveDate::pred_opt)
    else {
        return Vec::new();
    };

    records
        .iter()
        .filter(|day| {
            NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
                .is_ok_and(|d| d >= start && d <= end)
        })
        .cloned()
        .collect()
}

fn is_weekend(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, achieved: bool) -> DayProgress {
        DayProgress {
            date: date.to_string(),
            achieved,
            calories: 2000.0,
        }
    }

    #[test]
    fn test_streaks_empty() {
        assert_eq!(streaks(&[]), Streaks::default());
    }

    #[test]
    fn test_streaks_broken_run() {
        // Oldest to newest: achieved, achieved, missed, achieved, achieved
        let records = vec![
            day("2024-03-01", true),
            day("2024-03-02", true),
            day("2024-03-03", false),
            day("2024-03-04", true),
            day("2024-03-05", true),
        ];
        let s = streaks(&records);
        assert_eq!(s.current, 2);
        assert_eq!(s.longest, 2);
    }

    #[test]
    fn test_streaks_all_achieved() {
        let records = vec![
            day("2024-03-01", true),
            day("2024-03-02", true),
            day("2024-03-03", true),
        ];
        let s = streaks(&records);
        assert_eq!(s.current, 3);
        assert_eq!(s.longest, 3);
    }

    #[test]
    fn test_streaks_most_recent_missed() {
        let records = vec![
            day("2024-03-01", true),
            day("2024-03-02", true),
            day("2024-03-03", false),
        ];
        let s = streaks(&records);
        assert_eq!(s.current, 0);
        assert_eq!(s.longest, 2);
    }

    #[test]
    fn test_streaks_ignore_insertion_order() {
        let records = vec![
            day("2024-03-05", true),
            day("2024-03-01", true),
            day("2024-03-03", false),
            day("2024-03-04", true),
            day("2024-03-02", true),
        ];
        let s = streaks(&records);
        assert_eq!(s.current, 2);
        assert_eq!(s.longest, 2);
    }

    #[test]
    fn test_streaks_count_records_not_days() {
        // A three-day gap between records does not break the run.
        let records = vec![
            day("2024-03-01", true),
            day("2024-03-05", true),
            day("2024-03-06", true),
        ];
        let s = streaks(&records);
        assert_eq!(s.current, 3);
        assert_eq!(s.longest, 3);
    }

    #[test]
    fn test_insights_empty_history() {
        assert!(insights(&[]).is_empty());
    }

    #[test]
    fn test_insights_weekend_misses() {
        // 2024-03-02/03, 09/10, 16 are Sat/Sun — four weekend misses
        let records = vec![
            day("2024-03-02", false),
            day("2024-03-03", false),
            day("2024-03-09", false),
            day("2024-03-10", false),
            day("2024-03-04", false),
        ];
        let messages = insights(&records);
        assert_eq!(messages, vec![WEEKEND_INSIGHT.to_string()]);
    }

    #[test]
    fn test_insights_two_weekend_misses_not_enough() {
        let records = vec![day("2024-03-02", false), day("2024-03-03", false)];
        assert!(insights(&records).is_empty());
    }

    #[test]
    fn test_insights_weekday_misses_do_not_count() {
        // Mon-Fri misses only
        let records = vec![
            day("2024-03-04", false),
            day("2024-03-05", false),
            day("2024-03-06", false),
            day("2024-03-07", false),
            day("2024-03-08", false),
        ];
        assert!(insights(&records).is_empty());
    }

    #[test]
    fn test_insights_success_ratio() {
        // 4 of 5 achieved = 80%
        let records = vec![
            day("2024-03-04", true),
            day("2024-03-05", true),
            day("2024-03-06", true),
            day("2024-03-07", true),
            day("2024-03-08", false),
        ];
        let messages = insights(&records);
        assert_eq!(messages, vec![SUCCESS_INSIGHT.to_string()]);
    }

    #[test]
    fn test_insights_exact_70_percent_not_enough() {
        // 7 of 10 achieved is not strictly greater than 70%
        let mut records: Vec<DayProgress> = (1..=7)
            .map(|i| day(&format!("2024-03-{i:02}"), true))
            .collect();
        records.extend((8..=10).map(|i| day(&format!("2024-03-{i:02}"), false)));
        assert!(insights(&records).is_empty());
    }

    #[test]
    fn test_insights_order_weekend_before_success() {
        // Trigger both: weekend misses among a mostly-achieved history
        let mut records: Vec<DayProgress> = (1..=20)
            .map(|i| day(&format!("2024-05-{i:02}"), true))
            .collect();
        // 2024-05-25/26 and 2024-06-01 are weekend days
        records.push(day("2024-05-25", false));
        records.push(day("2024-05-26", false));
        records.push(day("2024-06-01", false));
        let messages = insights(&records);
        assert_eq!(
            messages,
            vec![WEEKEND_INSIGHT.to_string(), SUCCESS_INSIGHT.to_string()]
        );
    }

    #[test]
    fn test_month_records_bounds() {
        let records = vec![
            day("2024-01-01", true),
            day("2024-01-31", false),
            day("2024-02-01", true),
            day("2023-12-31", true),
        ];
        let january = month_records(&records, 2024, 1);
        let dates: Vec<&str> = january.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-31"]);
    }

    #[test]
    fn test_month_records_leap_february() {
        let records = vec![day("2024-02-29", true), day("2024-03-01", true)];
        let february = month_records(&records, 2024, 2);
        assert_eq!(february.len(), 1);
        assert_eq!(february[0].date, "2024-02-29");
    }

    #[test]
    fn test_month_records_skips_unparseable_dates() {
        let records = vec![day("garbage", true), day("2024-01-15", true)];
        let january = month_records(&records, 2024, 1);
        assert_eq!(january.len(), 1);
    }

    #[test]
    fn test_month_records_invalid_month() {
        let records = vec![day("2024-01-15", true)];
        assert!(month_records(&records, 2024, 13).is_empty());
    }
}
