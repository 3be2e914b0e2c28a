//! Lenient date parsing for review timestamps.
//!
//! Review pages print dates in whatever shape the site likes ("Reviewed on
//! March 3, 2024", "03/03/2024", "3 Mar 2024", a `datetime` attribute). The
//! parser scans for the first recognizable date anywhere in the text and
//! ignores the rest.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";

static ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());

static NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4})\b").unwrap());

static MONTH_DAY_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})[a-z]*\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static DAY_MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+(?:of\s+)?({MONTHS})[a-z]*\.?,?\s+(\d{{4}})\b"
    ))
    .unwrap()
});

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b({MONTHS})[a-z]*\.?,?\s+(\d{{4}})\b")).unwrap()
});

static NOISE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:reviewed|on)\b").unwrap());

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .split('|')
        .position(|m| m == prefix)
        .map(|i| i as u32 + 1)
}

fn ymd(year: &str, month: u32, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month, day.parse().ok()?)
}

/// Drop the "Reviewed" and "on" tokens sites put in front of dates
pub fn strip_review_prefix(text: &str) -> String {
    let stripped = NOISE_WORDS.replace_all(text, " ");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find the first recognizable calendar date in free text.
///
/// Numeric dates are read month-first, falling back to day-first when the
/// first field cannot be a month. A month and year without a day resolve
/// to the first of the month.
pub fn parse_fuzzy(text: &str) -> Option<NaiveDate> {
    if let Some(c) = ISO.captures(text) {
        if let Some(date) = ymd(&c[1], c[2].parse().ok()?, &c[3]) {
            return Some(date);
        }
    }

    if let Some(c) = NUMERIC.captures(text) {
        let first: u32 = c[1].parse().ok()?;
        let second: u32 = c[2].parse().ok()?;
        let date = if first <= 12 {
            ymd(&c[3], first, &c[2])
        } else {
            ymd(&c[3], second, &c[1])
        };
        if date.is_some() {
            return date;
        }
    }

    if let Some(c) = MONTH_DAY_YEAR.captures(text) {
        if let Some(date) = ymd(&c[3], month_number(&c[1])?, &c[2]) {
            return Some(date);
        }
    }

    if let Some(c) = DAY_MONTH_YEAR.captures(text) {
        if let Some(date) = ymd(&c[3], month_number(&c[2])?, &c[1]) {
            return Some(date);
        }
    }

    if let Some(c) = MONTH_YEAR.captures(text) {
        return ymd(&c[2], month_number(&c[1])?, "1");
    }

    None
}

/// Parse and format as ISO `YYYY-MM-DD`
pub fn normalize(text: &str) -> Option<String> {
    parse_fuzzy(text).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, day)
    }

    #[test]
    fn test_strip_review_prefix_keeps_month_names() {
        assert_eq!(strip_review_prefix("Reviewed on November 3, 2024"), "November 3, 2024");
        assert_eq!(strip_review_prefix("Reviewed on Monday"), "Monday");
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_fuzzy("2024-03-05"), d(2024, 3, 5));
        assert_eq!(parse_fuzzy("2024-03-05T10:00:00Z"), d(2024, 3, 5));
    }

    #[test]
    fn test_month_name_first() {
        assert_eq!(parse_fuzzy("November 3, 2024"), d(2024, 11, 3));
        assert_eq!(parse_fuzzy("Sept. 21st 2023"), d(2023, 9, 21));
        assert_eq!(parse_fuzzy("posted jan 9 2022 by Sam"), d(2022, 1, 9));
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_fuzzy("3 March 2024"), d(2024, 3, 3));
        assert_eq!(parse_fuzzy("21st of Oct, 2020"), d(2020, 10, 21));
    }

    #[test]
    fn test_numeric_month_first_then_day_first() {
        assert_eq!(parse_fuzzy("03/04/2024"), d(2024, 3, 4));
        assert_eq!(parse_fuzzy("25/12/2023"), d(2023, 12, 25));
    }

    #[test]
    fn test_month_and_year_only() {
        assert_eq!(parse_fuzzy("March 2024"), d(2024, 3, 1));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_fuzzy("a while ago"), None);
        assert_eq!(parse_fuzzy(""), None);
        assert_eq!(parse_fuzzy("2024-13-45"), None);
    }

    #[test]
    fn test_normalize_formats_iso() {
        assert_eq!(normalize("Reviewed on Feb 2, 2021"), Some("2021-02-02".to_string()));
    }
}
