use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Month, NaiveDate, Utc};

/// Inclusive calendar-month window used to filter activity records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Spelled-out month name, e.g. "March"
    pub month_label: String,
    pub year: i32,
    /// Zero-padded month for file names, e.g. "03"
    pub two_digit_month: String,
}

impl DateWindow {
    /// Build the window covering `month` (1-12) of `year`
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            anyhow::bail!("Invalid month {}, expected 1-12", month);
        }

        let start_date = NaiveDate::from_ymd_opt(year, month, 1)
            .with_context(|| format!("Invalid date: {}-{:02}-01", year, month))?;

        // Last day of the month is the day before the 1st of the next month
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end_date = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .with_context(|| format!("Cannot compute end of month for {}-{:02}", year, month))?;

        let month_label = Month::try_from(month as u8)
            .map(|m| m.name().to_string())
            .map_err(|_| anyhow::anyhow!("Invalid month {}", month))?;

        Ok(Self {
            start_date,
            end_date,
            month_label,
            year,
            two_digit_month: format!("{:02}", month),
        })
    }

    /// Window for the calendar month preceding `today`
    pub fn previous_month(today: NaiveDate) -> Result<Self> {
        if today.month() == 1 {
            Self::new(12, today.year() - 1)
        } else {
            Self::new(today.month() - 1, today.year())
        }
    }

    /// Whether the instant's UTC date falls inside the window (both bounds inclusive)
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        let date = instant.date_naive();
        date >= self.start_date && date <= self.end_date
    }
}
