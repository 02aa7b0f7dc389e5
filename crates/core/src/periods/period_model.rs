//! Period keys as they arrive from the aggregated financial ledgers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MONTHS_PER_YEAR;
use crate::errors::{Error, Result, ValidationError};

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// The two period representations a project may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PeriodFormat {
    /// Calendar dates, `YYYY-MM-DD`
    Date,
    /// Project-relative `year.month` tokens, `1.01` being the first month
    YearMonth,
}

/// A single accounting period.
///
/// Keys of the same format order chronologically. Ordering across formats is
/// meaningless; `PeriodIndex::build` rejects projects that mix them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PeriodKey {
    Date(NaiveDate),
    YearMonth { year: u32, month: u32 },
}

impl PeriodKey {
    /// Parses an ISO date or a `year.month` token.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        if trimmed.contains('-') {
            return NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT)
                .map(PeriodKey::Date)
                .map_err(|_| invalid_period(raw));
        }

        let (year_part, month_part) = trimmed.split_once('.').ok_or_else(|| invalid_period(raw))?;
        let year: u32 = year_part.parse().map_err(|_| invalid_period(raw))?;
        let month: u32 = month_part.parse().map_err(|_| invalid_period(raw))?;

        if year == 0 || !(1..=MONTHS_PER_YEAR).contains(&month) {
            return Err(invalid_period(raw));
        }

        Ok(PeriodKey::YearMonth { year, month })
    }

    pub fn format(&self) -> PeriodFormat {
        match self {
            PeriodKey::Date(_) => PeriodFormat::Date,
            PeriodKey::YearMonth { .. } => PeriodFormat::YearMonth,
        }
    }

    /// Canonical text form: `2023-01-01` or `1.01`.
    pub fn label(&self) -> String {
        match self {
            PeriodKey::Date(date) => date.format(ISO_DATE_FORMAT).to_string(),
            PeriodKey::YearMonth { year, month } => format!("{}.{:02}", year, month),
        }
    }

    /// First calendar day covered by the period.
    ///
    /// `year.month` tokens count years from `anchor_year` (token year 1 is the
    /// anchor year). Without an anchor the token year is read as a calendar
    /// year. Returns `None` when the resulting date is out of range.
    pub fn start_date(&self, anchor_year: Option<i32>) -> Option<NaiveDate> {
        match *self {
            PeriodKey::Date(date) => Some(date),
            PeriodKey::YearMonth { year, month } => {
                let year = i32::try_from(year).ok()?;
                let calendar_year = match anchor_year {
                    Some(anchor) => anchor.checked_add(year - 1)?,
                    None => year,
                };
                NaiveDate::from_ymd_opt(calendar_year, month, 1)
            }
        }
    }

    /// Zero-based month offset on the monthly grid.
    ///
    /// Dates count from January of `baseline_year`; tokens count from their
    /// own year 1 and ignore the baseline.
    pub fn month_offset(&self, baseline_year: i32) -> i64 {
        match *self {
            PeriodKey::Date(date) => month_offset_for_date(date, baseline_year),
            PeriodKey::YearMonth { year, month } => {
                (i64::from(year) - 1) * i64::from(MONTHS_PER_YEAR) + (i64::from(month) - 1)
            }
        }
    }
}

/// Raw month offset of `date` from January of `baseline_year`. May be
/// negative or beyond any grid.
pub fn month_offset_for_date(date: NaiveDate, baseline_year: i32) -> i64 {
    (i64::from(date.year()) - i64::from(baseline_year)) * i64::from(MONTHS_PER_YEAR)
        + i64::from(date.month0())
}

fn invalid_period(raw: &str) -> Error {
    Error::Validation(ValidationError::InvalidPeriod(raw.to_string()))
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PeriodKey::parse(s)
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        PeriodKey::parse(&value)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.label()
    }
}
