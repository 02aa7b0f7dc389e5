//! Investment metric models.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Root-finding method that produced an accepted IRR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrMethod {
    NewtonRaphson,
    Secant,
    Bisection,
}

/// How the IRR search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "method", rename_all = "snake_case")]
pub enum IrrStatus {
    /// A root with |NPV| under tolerance was found.
    Converged(IrrMethod),
    /// Fewer than two cash flows.
    InsufficientData,
    /// Flows are all non-negative or all non-positive.
    NoSignChange,
    /// Every method ran out of iterations or diverged.
    Exhausted,
}

/// What to report as the IRR when no root was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IrrFallback {
    /// Report 0, the behavior existing report pages expect.
    #[default]
    Zero,
    /// Report no value.
    Undefined,
}

/// Outcome of an IRR search. `rate` is set only when the search converged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrOutcome {
    pub rate: Option<Decimal>,
    pub status: IrrStatus,
}

impl IrrOutcome {
    pub fn converged(rate: Decimal, method: IrrMethod) -> Self {
        Self {
            rate: Some(rate),
            status: IrrStatus::Converged(method),
        }
    }

    pub fn failed(status: IrrStatus) -> Self {
        Self { rate: None, status }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self.status, IrrStatus::Converged(_))
    }

    pub fn method(&self) -> Option<IrrMethod> {
        match self.status {
            IrrStatus::Converged(method) => Some(method),
            _ => None,
        }
    }

    /// The rate to show, applying `fallback` when there is no root.
    pub fn reported_rate(&self, fallback: IrrFallback) -> Option<Decimal> {
        match (self.rate, fallback) {
            (Some(rate), _) => Some(rate),
            (None, IrrFallback::Zero) => Some(Decimal::ZERO),
            (None, IrrFallback::Undefined) => None,
        }
    }
}

/// Periods until cumulative cash flow turns non-negative.
///
/// Serializes as a number; `-1` means the investment is never recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Decimal", from = "Decimal")]
pub enum PaybackPeriod {
    Periods(Decimal),
    Never,
}

impl PaybackPeriod {
    pub const NEVER_SENTINEL: Decimal = dec!(-1);

    pub fn as_decimal(&self) -> Decimal {
        match self {
            PaybackPeriod::Periods(periods) => *periods,
            PaybackPeriod::Never => Self::NEVER_SENTINEL,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, PaybackPeriod::Periods(_))
    }
}

impl From<PaybackPeriod> for Decimal {
    fn from(period: PaybackPeriod) -> Self {
        period.as_decimal()
    }
}

impl From<Decimal> for PaybackPeriod {
    fn from(value: Decimal) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            PaybackPeriod::Never
        } else {
            PaybackPeriod::Periods(value)
        }
    }
}

/// Break-even volume and the revenue it corresponds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BreakEven {
    pub units: Decimal,
    pub revenue: Decimal,
}

/// Core metrics for one cash flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricsResult {
    /// Percent
    pub roi: Decimal,
    pub npv: Decimal,
    /// Ratio, after the configured fallback
    pub irr: Option<Decimal>,
    pub irr_status: IrrStatus,
    pub payback_period: PaybackPeriod,
}
