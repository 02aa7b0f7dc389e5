//! Internal rate of return search.
//!
//! The search runs in `f64`: rates near the pole at -1 and long series raise
//! discount factors to powers far outside the decimal range. Methods are
//! tried in order (Newton-Raphson over a seed ladder, secant over seed pairs,
//! then bracketed bisection) and the first candidate whose NPV is within
//! `IRR_NPV_TOLERANCE` of zero is accepted. Acceptance is re-checked in
//! decimal arithmetic on the rate that is actually reported.

use log::{debug, warn};
use num_traits::ToPrimitive;
use rust_decimal::Decimal;

use super::metrics_calculator::calculate_npv;
use super::metrics_model::{IrrMethod, IrrOutcome, IrrStatus};
use crate::constants::{DEFAULT_IRR_PRECISION, IRR_NPV_TOLERANCE, RATE_DECIMAL_PRECISION};

const NEWTON_SEEDS: [f64; 10] = [0.1, 0.2, 0.3, 0.05, 0.5, 0.75, 1.0, 0.01, 0.02, 0.03];
const SECANT_SEED_PAIRS: [(f64, f64); 5] =
    [(0.0, 0.1), (0.1, 0.2), (0.5, 0.6), (-0.5, -0.4), (1.0, 2.0)];

const MAX_ITERATIONS_PER_SEED: usize = 100;
const BISECTION_MAX_ITERATIONS: usize = 1000;
const BRACKET_MAX_ADJUSTMENTS: usize = 20;

/// Rate at which every discount factor is zero.
const POLE: f64 = -1.0;
const BISECTION_LOWER: f64 = -0.999;
/// Steps beyond this are treated as divergence and damped.
const RATE_UPPER_BOUND: f64 = 10.0;
const SLOPE_EPSILON: f64 = 1e-10;

/// Layered IRR solver with a fixed convergence precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrSolver {
    precision: f64,
}

impl Default for IrrSolver {
    fn default() -> Self {
        Self {
            precision: DEFAULT_IRR_PRECISION,
        }
    }
}

impl IrrSolver {
    /// Non-positive or non-finite precisions fall back to the default.
    pub fn new(precision: f64) -> Self {
        if precision.is_finite() && precision > 0.0 {
            Self { precision }
        } else {
            warn!(
                "Ignoring IRR precision {}; using {}",
                precision, DEFAULT_IRR_PRECISION
            );
            Self::default()
        }
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    /// Searches for the rate at which the NPV of `cash_flows` is zero.
    ///
    /// Never fails: degenerate inputs and exhausted searches are reported
    /// through the outcome status.
    pub fn solve(&self, cash_flows: &[Decimal]) -> IrrOutcome {
        if cash_flows.len() < 2 {
            return IrrOutcome::failed(IrrStatus::InsufficientData);
        }

        let has_positive = cash_flows.iter().any(|cf| *cf > Decimal::ZERO);
        let has_negative = cash_flows.iter().any(|cf| *cf < Decimal::ZERO);
        if !(has_positive && has_negative) {
            debug!("IRR undefined: cash flows have no sign change");
            return IrrOutcome::failed(IrrStatus::NoSignChange);
        }

        let flows: Vec<f64> = cash_flows
            .iter()
            .map(|cf| cf.to_f64().unwrap_or_default())
            .collect();

        for seed in NEWTON_SEEDS {
            if let Some(rate) = self.newton_raphson(&flows, seed) {
                if let Some(reported) = accept(cash_flows, &flows, rate) {
                    debug!("IRR {} found by Newton-Raphson from seed {}", reported, seed);
                    return IrrOutcome::converged(reported, IrrMethod::NewtonRaphson);
                }
            }
        }

        for (x0, x1) in SECANT_SEED_PAIRS {
            if let Some(rate) = self.secant(&flows, x0, x1) {
                if let Some(reported) = accept(cash_flows, &flows, rate) {
                    debug!("IRR {} found by secant from ({}, {})", reported, x0, x1);
                    return IrrOutcome::converged(reported, IrrMethod::Secant);
                }
            }
        }

        if let Some(rate) = self.bisection(&flows) {
            if let Some(reported) = accept(cash_flows, &flows, rate) {
                debug!("IRR {} found by bisection", reported);
                return IrrOutcome::converged(reported, IrrMethod::Bisection);
            }
        }

        warn!(
            "IRR search exhausted every method for {} cash flows",
            cash_flows.len()
        );
        IrrOutcome::failed(IrrStatus::Exhausted)
    }

    fn newton_raphson(&self, flows: &[f64], seed: f64) -> Option<f64> {
        let mut rate = seed;

        for _ in 0..MAX_ITERATIONS_PER_SEED {
            let npv = npv_at(flows, rate);
            if !npv.is_finite() {
                return None;
            }
            if npv.abs() < self.precision {
                return Some(rate);
            }

            let slope = npv_derivative_at(flows, rate);
            if !slope.is_finite() || slope.abs() < SLOPE_EPSILON {
                return None;
            }

            let next = damp_into_domain(rate, rate - npv / slope)?;
            if (next - rate).abs() < self.precision
                && npv_at(flows, next).abs() < IRR_NPV_TOLERANCE
            {
                return Some(next);
            }
            rate = next;
        }

        None
    }

    fn secant(&self, flows: &[f64], x0: f64, x1: f64) -> Option<f64> {
        let (mut prev_rate, mut rate) = (x0, x1);
        let mut prev_npv = finite(npv_at(flows, prev_rate))?;
        let mut npv = finite(npv_at(flows, rate))?;

        for _ in 0..MAX_ITERATIONS_PER_SEED {
            if npv.abs() < self.precision {
                return Some(rate);
            }

            let denominator = npv - prev_npv;
            if denominator.abs() < SLOPE_EPSILON {
                return None;
            }

            let next = damp_into_domain(rate, rate - npv * (rate - prev_rate) / denominator)?;
            if (next - rate).abs() < self.precision
                && npv_at(flows, next).abs() < IRR_NPV_TOLERANCE
            {
                return Some(next);
            }

            prev_rate = rate;
            prev_npv = npv;
            rate = next;
            npv = finite(npv_at(flows, rate))?;
        }

        None
    }

    fn bisection(&self, flows: &[f64]) -> Option<f64> {
        let mut low = BISECTION_LOWER;
        let mut high = RATE_UPPER_BOUND;
        let mut npv_low = npv_at(flows, low);
        let mut npv_high = npv_at(flows, high);

        let mut adjustments = 0;
        while !brackets_root(npv_low, npv_high) {
            if adjustments == BRACKET_MAX_ADJUSTMENTS {
                debug!("Bisection could not bracket a root in [{}, {}]", low, high);
                return None;
            }
            adjustments += 1;
            low = POLE + (low - POLE) / 2.0;
            high *= 2.0;
            npv_low = npv_at(flows, low);
            npv_high = npv_at(flows, high);
        }

        if npv_low == 0.0 {
            return Some(low);
        }
        if npv_high == 0.0 {
            return Some(high);
        }

        let low_sign = npv_low.signum();
        for _ in 0..BISECTION_MAX_ITERATIONS {
            let mid = (low + high) / 2.0;
            let npv_mid = npv_at(flows, mid);

            if npv_mid == 0.0 {
                return Some(mid);
            }
            if high - low < self.precision && npv_mid.abs() < IRR_NPV_TOLERANCE {
                return Some(mid);
            }
            if high - low <= f64::EPSILON * mid.abs().max(1.0) {
                break;
            }

            if npv_mid.is_nan() {
                high = mid;
            } else if npv_mid.signum() == low_sign {
                low = mid;
            } else {
                high = mid;
            }
        }

        Some((low + high) / 2.0)
    }
}

/// IRR with the default solver precision.
pub fn calculate_irr(cash_flows: &[Decimal]) -> IrrOutcome {
    IrrSolver::default().solve(cash_flows)
}

/// NPV at `rate`; NaN at the pole.
fn npv_at(flows: &[f64], rate: f64) -> f64 {
    let base = 1.0 + rate;
    if base.abs() < SLOPE_EPSILON {
        return f64::NAN;
    }
    flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / base.powi(i as i32))
        .sum()
}

/// d(NPV)/d(rate) = sum over i >= 1 of -i * CF[i] / (1 + rate)^(i + 1)
fn npv_derivative_at(flows: &[f64], rate: f64) -> f64 {
    let base = 1.0 + rate;
    if base.abs() < SLOPE_EPSILON {
        return f64::NAN;
    }
    flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, cf)| -(i as f64) * cf / base.powi(i as i32 + 1))
        .sum()
}

/// Keeps an iterate inside (-1, RATE_UPPER_BOUND] by moving halfway toward
/// the violated bound instead of taking the full step.
fn damp_into_domain(current: f64, proposed: f64) -> Option<f64> {
    if !proposed.is_finite() {
        return None;
    }
    if proposed <= POLE {
        return Some((current + POLE) / 2.0);
    }
    if proposed > RATE_UPPER_BOUND {
        return Some((current + RATE_UPPER_BOUND) / 2.0);
    }
    Some(proposed)
}

fn brackets_root(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return false;
    }
    a == 0.0 || b == 0.0 || a.signum() != b.signum()
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn is_acceptable(flows: &[f64], rate: f64) -> bool {
    rate.is_finite() && rate > POLE && npv_at(flows, rate).abs() < IRR_NPV_TOLERANCE
}

/// Converts an accepted `f64` root into the reported decimal rate.
///
/// The rounded rate is preferred; large flows amplify the rounding error, so
/// the full-precision value is used when only it keeps the decimal NPV
/// within tolerance.
fn accept(cash_flows: &[Decimal], flows: &[f64], rate: f64) -> Option<Decimal> {
    if !is_acceptable(flows, rate) {
        return None;
    }
    let exact = Decimal::from_f64_retain(rate)?;
    let tolerance = Decimal::from_f64_retain(IRR_NPV_TOLERANCE)?;
    let rounded = exact.round_dp(RATE_DECIMAL_PRECISION);

    [rounded, exact].into_iter().find(|candidate| {
        *candidate > -Decimal::ONE && calculate_npv(cash_flows, *candidate).abs() < tolerance
    })
}
