//! Analysis result models.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cash_flows::CashFlowVector;
use crate::errors::INSUFFICIENT_DATA_MESSAGE;
use crate::forecast::{ForecastScenarios, SensitivityRow};
use crate::metrics::{IrrStatus, PaybackPeriod};

/// Everything reported for one project.
///
/// Totals are projected over the forecast horizon. Monthly chart series
/// (`periods`, `period_*_by_period`) hold `months_count` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ProjectAnalysis {
    /// Percent
    pub roi: Decimal,
    pub npv: Decimal,
    /// Ratio; `None` only when the IRR fallback is `Undefined`
    pub irr: Option<Decimal>,
    pub irr_status: IrrStatus,
    pub payback_period: PaybackPeriod,
    pub total_revenue: Decimal,
    pub total_costs: Decimal,
    pub total_profit: Decimal,
    pub total_investment: Decimal,
    pub initial_investment: Decimal,
    pub cash_flows: CashFlowVector,
    pub operational_cash_flows: Vec<Decimal>,
    pub sensitivity_analysis: Vec<SensitivityRow>,
    pub forecast_scenarios: ForecastScenarios,
    pub periods: Vec<String>,
    pub period_investments_by_period: Vec<Decimal>,
    pub period_revenues_by_period: Vec<Decimal>,
    pub months_count: usize,
}

/// Result handed to reporting layers: the analysis, or an error message
/// with no other fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Analysis(Box<ProjectAnalysis>),
    Failed { error: String },
}

impl AnalysisResponse {
    pub fn insufficient_data() -> Self {
        AnalysisResponse::Failed {
            error: INSUFFICIENT_DATA_MESSAGE.to_string(),
        }
    }

    pub fn analysis(&self) -> Option<&ProjectAnalysis> {
        match self {
            AnalysisResponse::Analysis(analysis) => Some(analysis),
            AnalysisResponse::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisResponse::Failed { .. })
    }
}

impl From<ProjectAnalysis> for AnalysisResponse {
    fn from(analysis: ProjectAnalysis) -> Self {
        AnalysisResponse::Analysis(Box::new(analysis))
    }
}
