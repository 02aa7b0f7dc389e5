//! Merges per-period profits with dated investments into one cash flow series.

use log::{debug, warn};
use rust_decimal::Decimal;

use super::cash_flows_model::{
    CashFlowBreakdown, CashFlowVector, FinancialPeriodRecord, HorizonPolicy, InvestmentEvent,
};
use crate::constants::MAX_ABS_AMOUNT;
use crate::errors::{CalculatorError, Error, Result, ValidationError};
use crate::periods::PeriodIndex;

/// Rejects investment events with a non-positive or out-of-range amount.
pub fn validate_investments(investments: &[InvestmentEvent]) -> Result<()> {
    if let Some(bad) = investments
        .iter()
        .find(|inv| inv.amount <= Decimal::ZERO || inv.amount > MAX_ABS_AMOUNT)
    {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Investment on {} must be positive and at most {}, got {}",
            bad.investment_date, MAX_ABS_AMOUNT, bad.amount
        ))));
    }
    Ok(())
}

/// Rejects records whose revenue or costs exceed `MAX_ABS_AMOUNT`.
pub fn validate_records(records: &[FinancialPeriodRecord]) -> Result<()> {
    if let Some(bad) = records.iter().find(|r| {
        r.total_revenue.abs() > MAX_ABS_AMOUNT || r.total_costs.abs() > MAX_ABS_AMOUNT
    }) {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Period {} totals must be within ±{} (revenue {}, costs {})",
            bad.period, MAX_ABS_AMOUNT, bad.total_revenue, bad.total_costs
        ))));
    }
    Ok(())
}

/// Logs records with negative revenue or costs. They are still used.
pub fn warn_on_negative_records(records: &[FinancialPeriodRecord]) {
    for record in records {
        if record.total_revenue.is_sign_negative() || record.total_costs.is_sign_negative() {
            warn!(
                "Period {} has negative totals (revenue {}, costs {})",
                record.period, record.total_revenue, record.total_costs
            );
        }
    }
}

/// Splits investments into the initial outlay and per-period amounts, then
/// nets them against each period's profit.
///
/// Investments dated on or before the first operational period fold into
/// the initial investment. Later ones are attributed to the first period
/// starting on or after their date, or to the last period.
pub fn build_cash_flows(
    records: &[FinancialPeriodRecord],
    investments: &[InvestmentEvent],
    index: &PeriodIndex,
) -> Result<CashFlowBreakdown> {
    if index.is_empty() {
        return Err(Error::Calculation(CalculatorError::CashFlow(
            "no operational periods to build cash flows from".to_string(),
        )));
    }

    let period_count = index.len();
    let first_operational = index.first_operational_date();
    if first_operational.is_none() {
        warn!("First operational period has no calendar date; every investment is attributed to a period");
    }

    let mut initial_investment = Decimal::ZERO;
    let mut pending = vec![Decimal::ZERO; period_count];
    let mut attributed = vec![Decimal::ZERO; period_count];

    for investment in investments {
        let is_initial = first_operational
            .is_some_and(|first| investment.investment_date <= first);

        if is_initial {
            initial_investment += investment.amount;
            continue;
        }

        // Non-empty index always yields a position.
        let position = index
            .locate_period_for_date(investment.investment_date)
            .unwrap_or(period_count - 1);
        pending[position] += investment.amount;
        attributed[position] += investment.amount;
    }

    let mut operational_flows = vec![Decimal::ZERO; period_count];
    for record in records {
        let position = index
            .position_of(&record.period)
            .ok_or_else(|| CalculatorError::UnknownPeriod(record.period.label()))?;

        operational_flows[position] += record.net_profit() - pending[position];
        pending[position] = Decimal::ZERO;
    }

    // Positions with investment but no financial record.
    for (position, amount) in pending.iter().enumerate() {
        if !amount.is_zero() {
            debug!(
                "Applying {} of unmatched investment to period position {}",
                amount, position
            );
            operational_flows[position] -= *amount;
        }
    }

    Ok(CashFlowBreakdown {
        initial_investment,
        operational_flows,
        attributed_investments: attributed,
    })
}

/// Arithmetic mean of observed per-period profit. Zero for no records.
pub fn average_net_profit(records: &[FinancialPeriodRecord]) -> Decimal {
    if records.is_empty() {
        return Decimal::ZERO;
    }
    let total: Decimal = records.iter().map(FinancialPeriodRecord::net_profit).sum();
    total / Decimal::from(records.len())
}

/// Produces `[-initial, flow_1, .., flow_n]` with `horizon_periods`
/// operational periods, padding with `fill_value` when fewer were observed.
///
/// Under `HorizonPolicy::KeepObserved` observed periods beyond the horizon
/// are kept instead of dropped.
pub fn assemble_cash_flows(
    breakdown: &CashFlowBreakdown,
    horizon_periods: usize,
    fill_value: Decimal,
    policy: HorizonPolicy,
) -> CashFlowVector {
    let observed = breakdown.operational_flows.len();
    let total_periods = match policy {
        HorizonPolicy::Truncate => horizon_periods,
        HorizonPolicy::KeepObserved => horizon_periods.max(observed),
    };
    let kept = observed.min(total_periods);

    let mut values = Vec::with_capacity(total_periods + 1);
    values.push(if breakdown.initial_investment.is_zero() {
        Decimal::ZERO
    } else {
        -breakdown.initial_investment
    });
    values.extend_from_slice(&breakdown.operational_flows[..kept]);
    values.resize(total_periods + 1, fill_value);

    if observed > kept {
        debug!(
            "Dropped {} observed periods beyond the {}-period horizon",
            observed - kept,
            total_periods
        );
    }
    if total_periods > kept {
        debug!(
            "Extended cash flows with {} synthetic periods of {}",
            total_periods - kept,
            fill_value
        );
    }

    CashFlowVector::new(values, kept)
}
