use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OPTIMISTIC_FACTOR, DEFAULT_PESSIMISTIC_FACTOR};

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RegressionModel {
    pub slope: Decimal,
    pub intercept: Decimal,
    pub r_squared: Decimal,
}

impl RegressionModel {
    /// `None` when the projection leaves the decimal range.
    pub fn predict(&self, x: Decimal) -> Option<Decimal> {
        self.slope.checked_mul(x)?.checked_add(self.intercept)
    }
}

/// Projected values per forecast year under three scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ForecastScenarios {
    pub optimistic: Vec<Decimal>,
    pub base: Vec<Decimal>,
    pub pessimistic: Vec<Decimal>,
}

/// Multipliers applied to the base projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioFactors {
    pub optimistic: Decimal,
    pub pessimistic: Decimal,
}

impl Default for ScenarioFactors {
    fn default() -> Self {
        Self {
            optimistic: DEFAULT_OPTIMISTIC_FACTOR,
            pessimistic: DEFAULT_PESSIMISTIC_FACTOR,
        }
    }
}

/// Which totals a sensitivity step perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SensitivityMode {
    /// Costs move by the percentage, revenue stays fixed.
    #[default]
    CostsOnly,
    /// Revenue and costs both move by the percentage.
    RevenueAndCosts,
}

/// Totals the sensitivity analysis starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SensitivityBaseline {
    pub revenue: Decimal,
    pub costs: Decimal,
    pub investment: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SensitivityRow {
    pub change_percent: Decimal,
    pub revenue: Decimal,
    pub costs: Decimal,
    pub profit: Decimal,
    /// Percent
    pub roi: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfidenceInterval {
    pub forecast: Decimal,
    pub lower_bound: Decimal,
    pub upper_bound: Decimal,
}
