use crate::error::{DashError, Result};
use chrono::{Datelike, Local, Months, NaiveDate};

/// Calendar month shown by the monthly chart.
///
/// Always normalized to the first day of the month, so stepping from the
/// 29th–31st can never skip a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// `month` is 1-based. Returns `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    /// The current local month.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// Parse a `YYYY-MM` string.
    pub fn parse(s: &str) -> Result<Self> {
        let bad = || DashError::Format(format!("invalid month '{s}', expected YYYY-MM"));

        let (year, month) = s.trim().split_once('-').ok_or_else(bad)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(bad());
        }
        let year  = year.parse::<i32>().map_err(|_| bad())?;
        let month = month.parse::<u32>().map_err(|_| bad())?;
        Self::new(year, month).ok_or_else(bad)
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    #[must_use]
    pub fn prev(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    /// Value for the `month=` query parameter, e.g. `"2024-03"`.
    pub fn query_param(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }

    /// Human label, e.g. `"March 2024"`.
    pub fn display(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

impl Default for MonthCursor {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_of_month_steps_back_one_month() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let cursor = MonthCursor::from_date(jan31);
        assert_eq!(cursor.prev().query_param(), "2023-12");
    }

    #[test]
    fn end_of_month_steps_forward_one_month() {
        let jan31 = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(MonthCursor::from_date(jan31).next().query_param(), "2024-02");

        let cursor = MonthCursor::parse("2024-01").unwrap();
        assert_eq!(cursor.next().query_param(), "2024-02");
    }

    #[test]
    fn year_rolls_over_in_both_directions() {
        let dec = MonthCursor::new(2023, 12).unwrap();
        assert_eq!(dec.next().query_param(), "2024-01");
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn query_param_zero_pads() {
        let cursor = MonthCursor::new(987, 3).unwrap();
        assert_eq!(cursor.query_param(), "0987-03");
    }

    #[test]
    fn display_uses_full_month_name() {
        assert_eq!(MonthCursor::new(2024, 3).unwrap().display(), "March 2024");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(MonthCursor::parse("2024-13").is_err());
        assert!(MonthCursor::parse("2024-3").is_err());
        assert!(MonthCursor::parse("march").is_err());
    }
}
