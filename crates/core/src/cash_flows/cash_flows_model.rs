//! Cash flow domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::periods::PeriodKey;

/// How observed periods relate to the requested forecast horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HorizonPolicy {
    /// Exactly `forecast_years` operational periods. Observed periods past
    /// the horizon are dropped from the series.
    #[default]
    Truncate,
    /// Every observed period is kept; the horizon only extends the series.
    KeepObserved,
}

/// Revenue and costs of one period, already aggregated across production
/// and operational cost ledgers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialPeriodRecord {
    pub period: PeriodKey,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
}

impl FinancialPeriodRecord {
    pub fn new(period: PeriodKey, total_revenue: Decimal, total_costs: Decimal) -> Self {
        Self {
            period,
            total_revenue,
            total_costs,
        }
    }

    pub fn net_profit(&self) -> Decimal {
        self.total_revenue - self.total_costs
    }
}

/// A capital outlay on a given date. Amounts are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentEvent {
    pub amount: Decimal,
    pub investment_date: NaiveDate,
}

impl InvestmentEvent {
    pub fn new(amount: Decimal, investment_date: NaiveDate) -> Self {
        Self {
            amount,
            investment_date,
        }
    }
}

/// Observed cash flows split into the pre-operational outlay and the
/// per-period operational flows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CashFlowBreakdown {
    /// Capital invested before or at the first operational period, positive.
    pub initial_investment: Decimal,
    /// Net flow per index position: profit minus attributed investment.
    pub operational_flows: Vec<Decimal>,
    /// Investment attributed to each index position.
    pub attributed_investments: Vec<Decimal>,
}

/// Ordered signed cash flows. Index 0 is the initial outlay (never
/// positive), indices 1.. are operational periods.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct CashFlowVector {
    values: Vec<Decimal>,
    #[serde(skip)]
    observed_periods: usize,
}

impl CashFlowVector {
    pub(crate) fn new(values: Vec<Decimal>, observed_periods: usize) -> Self {
        Self {
            values,
            observed_periods,
        }
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Decimal> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Operational periods backed by financial records.
    pub fn observed_periods(&self) -> usize {
        self.observed_periods
    }

    /// Operational periods filled with the average historical profit.
    pub fn synthetic_periods(&self) -> usize {
        self.values
            .len()
            .saturating_sub(1)
            .saturating_sub(self.observed_periods)
    }
}

impl AsRef<[Decimal]> for CashFlowVector {
    fn as_ref(&self) -> &[Decimal] {
        &self.values
    }
}
