//! Monthly chart grid spanning the forecast horizon.

use chrono::Datelike;
use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use super::cash_flows_model::{FinancialPeriodRecord, InvestmentEvent};
use crate::constants::MONTHS_PER_YEAR;
use crate::periods::{month_index_for_date, PeriodIndex};

/// Net revenue and investment per month, `forecast_years * 12` buckets.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MonthlyGrid {
    /// `"{year}.{month:02}"`, year and month both starting at 1
    pub labels: Vec<String>,
    pub revenues: Vec<Decimal>,
    pub investments: Vec<Decimal>,
    pub months_count: usize,
}

pub fn monthly_labels(months_count: usize) -> Vec<String> {
    let months_per_year = MONTHS_PER_YEAR as usize;
    (0..months_count)
        .map(|m| format!("{}.{:02}", m / months_per_year + 1, m % months_per_year + 1))
        .collect()
}

/// Places records and investments on the monthly grid.
///
/// Records outside the grid are dropped. Investments before the first
/// operational period go to month 0; the rest are clamped onto the grid.
pub fn build_monthly_grid(
    records: &[FinancialPeriodRecord],
    investments: &[InvestmentEvent],
    index: &PeriodIndex,
    forecast_years: u32,
) -> MonthlyGrid {
    let months_count = forecast_years as usize * MONTHS_PER_YEAR as usize;
    let mut revenues = vec![Decimal::ZERO; months_count];
    let mut grid_investments = vec![Decimal::ZERO; months_count];

    let first_operational = index.first_operational_date();
    let baseline_year = index
        .baseline_year()
        .or_else(|| first_operational.map(|d| d.year()));

    for record in records {
        let offset = record.period.month_offset(baseline_year.unwrap_or_default());
        match usize::try_from(offset) {
            Ok(month) if month < months_count => revenues[month] += record.net_profit(),
            _ => debug!(
                "Period {} falls outside the {}-month grid; not charted",
                record.period, months_count
            ),
        }
    }

    if months_count > 0 {
        for investment in investments {
            let before_operations =
                first_operational.is_some_and(|first| investment.investment_date < first);

            let month = match (before_operations, baseline_year) {
                (false, Some(year)) => {
                    month_index_for_date(investment.investment_date, year, months_count)
                }
                _ => 0,
            };
            grid_investments[month] += investment.amount;
        }
    }

    MonthlyGrid {
        labels: monthly_labels(months_count),
        revenues,
        investments: grid_investments,
        months_count,
    }
}
