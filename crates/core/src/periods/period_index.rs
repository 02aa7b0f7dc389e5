//! Chronological index over a project's periods.

use chrono::{Datelike, NaiveDate};
use log::debug;

use super::period_model::{month_offset_for_date, PeriodFormat, PeriodKey};
use crate::errors::{Error, Result, ValidationError};

/// Deduplicated, ascending sequence of period keys. The position of a key is
/// its zero-based index in that sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PeriodIndex {
    keys: Vec<PeriodKey>,
    anchor_year: Option<i32>,
}

impl PeriodIndex {
    /// Builds the index from raw keys in any order.
    ///
    /// Fails with `MixedPeriodFormats` when dates and `year.month` tokens are
    /// combined; there is no meaningful order between the two.
    pub fn build(periods: &[PeriodKey]) -> Result<Self> {
        if let Some(first) = periods.first() {
            if let Some(other) = periods.iter().find(|k| k.format() != first.format()) {
                return Err(Error::Validation(ValidationError::MixedPeriodFormats {
                    first: first.label(),
                    second: other.label(),
                }));
            }
        }

        let mut keys = periods.to_vec();
        keys.sort_unstable();
        keys.dedup();

        debug!(
            "Built period index with {} positions from {} raw periods",
            keys.len(),
            periods.len()
        );

        Ok(Self {
            keys,
            anchor_year: None,
        })
    }

    /// Parses labels and builds the index.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self> {
        let keys = labels
            .iter()
            .map(|label| PeriodKey::parse(label.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::build(&keys)
    }

    /// Calendar year that `year.month` token 1 maps to. Ignored for dates.
    pub fn with_anchor_year(mut self, anchor_year: Option<i32>) -> Self {
        self.anchor_year = anchor_year;
        self
    }

    pub fn anchor_year(&self) -> Option<i32> {
        self.anchor_year
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[PeriodKey] {
        &self.keys
    }

    pub fn format(&self) -> Option<PeriodFormat> {
        self.keys.first().map(PeriodKey::format)
    }

    pub fn first(&self) -> Option<&PeriodKey> {
        self.keys.first()
    }

    pub fn last_position(&self) -> Option<usize> {
        self.keys.len().checked_sub(1)
    }

    pub fn position_of(&self, key: &PeriodKey) -> Option<usize> {
        self.keys.binary_search(key).ok()
    }

    pub fn labels(&self) -> Vec<String> {
        self.keys.iter().map(PeriodKey::label).collect()
    }

    /// Start date of the earliest period, resolved through the anchor year.
    pub fn first_operational_date(&self) -> Option<NaiveDate> {
        self.keys
            .first()
            .and_then(|key| key.start_date(self.anchor_year))
    }

    /// Position of the first period starting on or after `date`.
    ///
    /// Dates past the final period attribute to the last position rather
    /// than being dropped. Returns `None` only for an empty index.
    pub fn locate_period_for_date(&self, date: NaiveDate) -> Option<usize> {
        let last = self.last_position()?;
        let position = self
            .keys
            .iter()
            .position(|key| {
                key.start_date(self.anchor_year)
                    .is_some_and(|start| start >= date)
            })
            .unwrap_or(last);
        Some(position)
    }

    /// Year that month offset 0 refers to on the monthly grid.
    ///
    /// For dated projects this is the earliest record year. Token projects
    /// count from their own year 1, which is the anchor year when one is set.
    pub fn baseline_year(&self) -> Option<i32> {
        match self.format()? {
            PeriodFormat::Date => self
                .keys
                .iter()
                .filter_map(|key| match key {
                    PeriodKey::Date(date) => Some(date.year()),
                    PeriodKey::YearMonth { .. } => None,
                })
                .min(),
            PeriodFormat::YearMonth => self.anchor_year,
        }
    }
}

/// Maps `date` onto a monthly grid of `months_count` buckets starting in
/// January of `baseline_year`. Offsets before the grid clamp to the first
/// bucket and offsets after it to the last.
pub fn month_index_for_date(date: NaiveDate, baseline_year: i32, months_count: usize) -> usize {
    let offset = month_offset_for_date(date, baseline_year);
    let last = months_count.saturating_sub(1);
    if offset < 0 {
        debug!("Date {} precedes the monthly grid; clamped to month 0", date);
        return 0;
    }
    match usize::try_from(offset) {
        Ok(index) if index <= last => index,
        _ => {
            debug!("Date {} is past the monthly grid; clamped to month {}", date, last);
            last
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn keys(labels: &[&str]) -> Vec<PeriodKey> {
        labels.iter().map(|l| PeriodKey::parse(l).unwrap()).collect()
    }

    #[test]
    fn sorted_input_keeps_its_positions() {
        let input = keys(&["2023-01-01", "2023-02-01", "2023-03-01"]);
        let index = PeriodIndex::build(&input).unwrap();
        for (position, key) in input.iter().enumerate() {
            assert_eq!(index.position_of(key), Some(position));
        }
    }

    #[test]
    fn reversed_input_is_reassigned_ascending() {
        let input = keys(&["1.03", "1.02", "1.01"]);
        let index = PeriodIndex::build(&input).unwrap();
        assert_eq!(index.labels(), vec!["1.01", "1.02", "1.03"]);
        assert_eq!(index.position_of(&input[0]), Some(2));
        assert_eq!(index.position_of(&input[2]), Some(0));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let index = PeriodIndex::from_labels(&["2023-02-01", "2023-01-01", "2023-02-01"]).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.labels(), vec!["2023-01-01", "2023-02-01"]);
    }

    #[test]
    fn token_order_is_not_lexicographic() {
        let index = PeriodIndex::from_labels(&["10.01", "2.01", "1.12"]).unwrap();
        assert_eq!(index.labels(), vec!["1.12", "2.01", "10.01"]);
    }

    #[test]
    fn mixed_formats_fail_fast() {
        let err = PeriodIndex::from_labels(&["2023-01-01", "1.02"]).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MixedPeriodFormats { .. })
        ));
    }

    #[test]
    fn empty_index_locates_nothing() {
        let index = PeriodIndex::build(&[]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.locate_period_for_date(date(2023, 1, 1)), None);
        assert_eq!(index.first_operational_date(), None);
        assert_eq!(index.baseline_year(), None);
    }

    #[test]
    fn locates_first_period_on_or_after_date() {
        let index =
            PeriodIndex::from_labels(&["2023-01-01", "2023-02-01", "2023-03-01"]).unwrap();
        assert_eq!(index.locate_period_for_date(date(2022, 6, 1)), Some(0));
        assert_eq!(index.locate_period_for_date(date(2023, 1, 15)), Some(1));
        assert_eq!(index.locate_period_for_date(date(2023, 2, 1)), Some(1));
        assert_eq!(index.locate_period_for_date(date(2023, 2, 2)), Some(2));
    }

    #[test]
    fn late_dates_attribute_to_last_period() {
        let index = PeriodIndex::from_labels(&["2023-01-01", "2023-02-01"]).unwrap();
        assert_eq!(index.locate_period_for_date(date(2030, 1, 1)), Some(1));
    }

    #[test]
    fn tokens_locate_through_anchor_year() {
        let index = PeriodIndex::from_labels(&["1.01", "1.06", "2.01"])
            .unwrap()
            .with_anchor_year(Some(2022));
        assert_eq!(index.first_operational_date(), Some(date(2022, 1, 1)));
        assert_eq!(index.locate_period_for_date(date(2022, 3, 10)), Some(1));
        assert_eq!(index.locate_period_for_date(date(2022, 9, 10)), Some(2));
        assert_eq!(index.baseline_year(), Some(2022));
    }

    #[test]
    fn baseline_year_is_earliest_record_year() {
        let index = PeriodIndex::from_labels(&["2024-03-01", "2022-11-01"]).unwrap();
        assert_eq!(index.baseline_year(), Some(2022));
    }

    #[test]
    fn month_index_clamps_to_grid() {
        assert_eq!(month_index_for_date(date(2023, 3, 5), 2023, 36), 2);
        assert_eq!(month_index_for_date(date(2024, 1, 1), 2023, 36), 12);
        assert_eq!(month_index_for_date(date(2021, 5, 1), 2023, 36), 0);
        assert_eq!(month_index_for_date(date(2030, 5, 1), 2023, 36), 35);
        assert_eq!(month_index_for_date(date(2030, 5, 1), 2023, 0), 0);
    }
}
