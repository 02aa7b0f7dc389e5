//! ROI, NPV, payback and break-even calculations.

use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use super::irr_solver::IrrSolver;
use super::metrics_model::{BreakEven, IrrFallback, MetricsResult, PaybackPeriod};

/// Return on investment, in percent. A zero base yields 0.
pub fn calculate_roi(net_profit: Decimal, base: Decimal) -> Decimal {
    if base.is_zero() {
        return Decimal::ZERO;
    }
    net_profit
        .checked_div(base)
        .and_then(|ratio| ratio.checked_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// Discounted sum of `cash_flows`, index `i` discounted by `(1 + rate)^i`.
///
/// Terms whose discount factor overflows or vanishes contribute nothing.
pub fn calculate_npv(cash_flows: &[Decimal], rate: Decimal) -> Decimal {
    let base = Decimal::ONE + rate;
    let mut npv = Decimal::ZERO;

    for (i, cash_flow) in cash_flows.iter().enumerate() {
        let term = base
            .checked_powi(i as i64)
            .and_then(|factor| cash_flow.checked_div(factor));

        match term.and_then(|t| npv.checked_add(t)) {
            Some(sum) => npv = sum,
            None => debug!("Skipping NPV term {} at rate {}: out of range", i, rate),
        }
    }

    npv
}

/// Periods until the running total of `cash_flows` becomes non-negative,
/// interpolated linearly inside the recovering period.
///
/// Requires a negative outlay at index 0; anything else is `Never`.
pub fn calculate_payback_period(cash_flows: &[Decimal]) -> PaybackPeriod {
    match cash_flows.first() {
        Some(initial) if initial.is_sign_negative() && !initial.is_zero() => {}
        _ => return PaybackPeriod::Never,
    }

    let mut cumulative = Decimal::ZERO;
    for (i, flow) in cash_flows.iter().enumerate() {
        let previous = cumulative;
        cumulative += *flow;

        if cumulative >= Decimal::ZERO {
            if i == 0 {
                return PaybackPeriod::Periods(Decimal::ZERO);
            }
            if flow.is_zero() {
                return PaybackPeriod::Periods(Decimal::from(i));
            }
            let fraction = previous.abs() / *flow;
            return PaybackPeriod::Periods(Decimal::from(i - 1) + fraction);
        }
    }

    PaybackPeriod::Never
}

/// Units and revenue needed to cover `fixed_costs`. `None` when the unit
/// margin is zero.
pub fn calculate_break_even(
    fixed_costs: Decimal,
    price_per_unit: Decimal,
    variable_cost_per_unit: Decimal,
) -> Option<BreakEven> {
    let unit_margin = price_per_unit - variable_cost_per_unit;
    if unit_margin.is_zero() {
        return None;
    }
    let units = fixed_costs.checked_div(unit_margin)?;
    let revenue = units.checked_mul(price_per_unit)?;
    Some(BreakEven { units, revenue })
}

/// ROI, NPV, IRR and payback for one cash flow series.
pub fn calculate_metrics(
    cash_flows: &[Decimal],
    discount_rate: Decimal,
    net_profit: Decimal,
    roi_base: Decimal,
    solver: &IrrSolver,
    irr_fallback: IrrFallback,
) -> MetricsResult {
    let irr = solver.solve(cash_flows);

    MetricsResult {
        roi: calculate_roi(net_profit, roi_base),
        npv: calculate_npv(cash_flows, discount_rate),
        irr: irr.reported_rate(irr_fallback),
        irr_status: irr.status,
        payback_period: calculate_payback_period(cash_flows),
    }
}
