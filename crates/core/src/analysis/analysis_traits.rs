//! Collaborator and service traits for project analysis.

use rust_decimal::Decimal;

use super::analysis_model::{AnalysisResponse, ProjectAnalysis};
use crate::cash_flows::{FinancialPeriodRecord, InvestmentEvent};
use crate::errors::Result;

/// Data-access collaborator supplying per-project financial data.
///
/// Implementations aggregate production and operational cost ledgers into one
/// record per period before handing them over.
pub trait ProjectDataRepositoryTrait: Send + Sync {
    fn get_project_financial_data(&self, project_id: &str) -> Result<Vec<FinancialPeriodRecord>>;

    /// Investment events, ordered by date.
    fn get_project_investment_data(&self, project_id: &str) -> Result<Vec<InvestmentEvent>>;

    fn list_project_ids(&self) -> Result<Vec<String>>;
}

pub trait ProjectAnalysisServiceTrait: Send + Sync {
    /// Full analysis of one project. Fails with `Error::InsufficientData` when
    /// the project has no financial records.
    fn analyze(
        &self,
        project_id: &str,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<ProjectAnalysis>;

    /// Like `analyze`, but reports missing data as a structured error result.
    fn calculate_project_analysis(
        &self,
        project_id: &str,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<AnalysisResponse>;

    /// Mean ROI over every project that has data. Zero when none do.
    fn calculate_average_profitability(
        &self,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<Decimal>;
}
