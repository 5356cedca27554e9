use anyhow::{Context, Result, bail};
use chrono::{Datelike, Local, NaiveDate};

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday")),
        },
    }
}

/// Parse "YYYY-MM" into (year, month); `None` means the current month.
pub(crate) fn parse_month(month_str: Option<String>) -> Result<(i32, u32)> {
    match month_str {
        None => {
            let today = Local::now().date_naive();
            Ok((today.year(), today.month()))
        }
        Some(s) => {
            let parts: Vec<&str> = s.splitn(2, '-').collect();
            if parts.len() != 2 {
                bail!("Invalid month '{s}'. Use YYYY-MM");
            }
            let year: i32 = parts[0]
                .parse()
                .with_context(|| format!("Invalid month '{s}'. Use YYYY-MM"))?;
            let month: u32 = parts[1]
                .parse()
                .with_context(|| format!("Invalid month '{s}'. Use YYYY-MM"))?;
            if !(1..=12).contains(&month) {
                bail!("Invalid month '{s}'. Month must be between 01 and 12");
            }
            Ok((year, month))
        }
    }
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
