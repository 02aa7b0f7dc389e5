use std::sync::Arc;

use chrono::Datelike;
use log::{debug, info, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;

use super::analysis_model::{AnalysisResponse, ProjectAnalysis};
use super::analysis_traits::{ProjectAnalysisServiceTrait, ProjectDataRepositoryTrait};
use crate::cash_flows::{
    assemble_cash_flows, average_net_profit, build_cash_flows, build_monthly_grid,
    validate_investments, validate_records, warn_on_negative_records, CashFlowVector,
    FinancialPeriodRecord, InvestmentEvent,
};
use crate::constants::{DECIMAL_PRECISION, MAX_FORECAST_YEARS};
use crate::errors::{CalculatorError, Error, Result, ValidationError};
use crate::forecast::{generate_scenarios, sensitivity_analysis, SensitivityBaseline};
use crate::metrics::{calculate_metrics, IrrSolver, IrrStatus, PaybackPeriod};
use crate::periods::{PeriodIndex, PeriodKey};
use crate::settings::{AnalysisSettings, RoiBase};

/// Orchestrates period alignment, cash flow assembly, metrics and forecasts
/// for projects served by a data repository.
pub struct ProjectAnalysisService {
    data_repository: Arc<dyn ProjectDataRepositoryTrait>,
    settings: AnalysisSettings,
}

impl ProjectAnalysisService {
    pub fn new(
        data_repository: Arc<dyn ProjectDataRepositoryTrait>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            data_repository,
            settings,
        }
    }

    pub fn with_default_settings(data_repository: Arc<dyn ProjectDataRepositoryTrait>) -> Self {
        Self::new(data_repository, AnalysisSettings::default())
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Analysis using the configured discount rate and forecast horizon.
    pub fn analyze_with_settings(&self, project_id: &str) -> Result<ProjectAnalysis> {
        self.analyze(
            project_id,
            self.settings.discount_rate,
            self.settings.forecast_years,
        )
    }

    fn anchor_year(&self, investments: &[InvestmentEvent]) -> Option<i32> {
        if let Some(year) = self.settings.relative_period_anchor_year {
            return Some(year);
        }
        let earliest = investments
            .iter()
            .map(|inv| inv.investment_date.year())
            .min();
        if let Some(year) = earliest {
            debug!(
                "No anchor year configured; year.month periods count from earliest investment year {}",
                year
            );
        }
        earliest
    }

    fn compute_analysis(
        &self,
        records: &[FinancialPeriodRecord],
        investments: &[InvestmentEvent],
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<ProjectAnalysis> {
        let keys: Vec<PeriodKey> = records.iter().map(|r| r.period).collect();
        let index = PeriodIndex::build(&keys)?.with_anchor_year(self.anchor_year(investments));

        let breakdown = build_cash_flows(records, investments, &index)?;
        let cash_flows = assemble_cash_flows(
            &breakdown,
            forecast_years as usize,
            average_net_profit(records),
            self.settings.horizon_policy,
        );

        // Observed totals, then projected over the synthetic periods.
        let record_count = Decimal::from(records.len());
        let observed_revenue = checked_total(records.iter().map(|r| r.total_revenue), "revenue")?;
        let observed_costs = checked_total(records.iter().map(|r| r.total_costs), "costs")?;
        let total_investment =
            checked_total(investments.iter().map(|inv| inv.amount), "investment")?;

        let synthetic = Decimal::from(cash_flows.synthetic_periods());
        let total_revenue = project_total(observed_revenue, record_count, synthetic)
            .ok_or_else(|| overflow("projected revenue"))?;
        let total_costs = project_total(observed_costs, record_count, synthetic)
            .ok_or_else(|| overflow("projected costs"))?;
        let total_profit = total_revenue
            .checked_sub(total_costs)
            .ok_or_else(|| overflow("projected profit"))?;

        let roi_base = match self.settings.roi_base {
            RoiBase::Costs => total_costs,
            RoiBase::Investment => total_investment,
        };
        let metrics = calculate_metrics(
            cash_flows.values(),
            discount_rate,
            total_profit,
            roi_base,
            &IrrSolver::new(self.settings.irr_precision),
            self.settings.irr_fallback,
        );

        let sensitivity = sensitivity_analysis(
            &SensitivityBaseline {
                revenue: observed_revenue,
                costs: observed_costs,
                investment: total_investment,
            },
            &self.settings.sensitivity_percentages,
            self.settings.sensitivity_mode,
        );

        let mut net_by_period = vec![Decimal::ZERO; index.len()];
        for record in records {
            if let Some(position) = index.position_of(&record.period) {
                net_by_period[position] += record.net_profit();
            }
        }
        let scenarios = generate_scenarios(
            &net_by_period,
            forecast_years,
            &self.settings.scenario_factors(),
        );

        let grid = build_monthly_grid(records, investments, &index, forecast_years);

        let payback_period = match metrics.payback_period {
            PaybackPeriod::Periods(periods) => PaybackPeriod::Periods(round_amount(periods)),
            PaybackPeriod::Never => PaybackPeriod::Never,
        };

        Ok(ProjectAnalysis {
            roi: round_amount(metrics.roi),
            npv: round_amount(metrics.npv),
            irr: metrics.irr,
            irr_status: metrics.irr_status,
            payback_period,
            total_revenue: round_amount(total_revenue),
            total_costs: round_amount(total_costs),
            total_profit: round_amount(total_profit),
            total_investment: round_amount(total_investment),
            initial_investment: round_amount(breakdown.initial_investment),
            cash_flows: CashFlowVector::new(
                round_all(cash_flows.values()),
                cash_flows.observed_periods(),
            ),
            operational_cash_flows: round_all(&breakdown.operational_flows),
            sensitivity_analysis: sensitivity,
            forecast_scenarios: scenarios,
            periods: grid.labels,
            period_investments_by_period: round_all(&grid.investments),
            period_revenues_by_period: round_all(&grid.revenues),
            months_count: grid.months_count,
        })
    }
}

impl ProjectAnalysisServiceTrait for ProjectAnalysisService {
    fn analyze(
        &self,
        project_id: &str,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<ProjectAnalysis> {
        validate_request(discount_rate, forecast_years)?;

        let records = self.data_repository.get_project_financial_data(project_id)?;
        if records.is_empty() {
            return Err(Error::InsufficientData {
                project_id: project_id.to_string(),
            });
        }
        let investments = self
            .data_repository
            .get_project_investment_data(project_id)?;

        validate_records(&records)?;
        validate_investments(&investments)?;
        warn_on_negative_records(&records);

        debug!(
            "Analyzing project {} ({} periods, {} investments, rate {}, {} years)",
            project_id,
            records.len(),
            investments.len(),
            discount_rate,
            forecast_years
        );

        let analysis =
            self.compute_analysis(&records, &investments, discount_rate, forecast_years)?;

        if !matches!(analysis.irr_status, IrrStatus::Converged(_)) {
            warn!(
                "IRR for project {} did not converge ({:?}); reporting {:?}",
                project_id, analysis.irr_status, analysis.irr
            );
        }

        Ok(analysis)
    }

    fn calculate_project_analysis(
        &self,
        project_id: &str,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<AnalysisResponse> {
        match self.analyze(project_id, discount_rate, forecast_years) {
            Ok(analysis) => Ok(analysis.into()),
            Err(e) if e.is_insufficient_data() => {
                info!("Project {} has no financial records", project_id);
                Ok(AnalysisResponse::insufficient_data())
            }
            Err(e) => Err(e),
        }
    }

    fn calculate_average_profitability(
        &self,
        discount_rate: Decimal,
        forecast_years: u32,
    ) -> Result<Decimal> {
        validate_request(discount_rate, forecast_years)?;

        let project_ids = self.data_repository.list_project_ids()?;
        if project_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let rois: Vec<Decimal> = project_ids
            .par_iter()
            .filter_map(
                |project_id| match self.analyze(project_id, discount_rate, forecast_years) {
                    Ok(analysis) => Some(analysis.roi),
                    Err(e) if e.is_insufficient_data() => {
                        debug!("Skipping project {}: no financial records", project_id);
                        None
                    }
                    Err(e) => {
                        warn!("Skipping project {} in average profitability: {}", project_id, e);
                        None
                    }
                },
            )
            .collect();

        if rois.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let total: Decimal = rois.iter().sum();
        Ok(round_amount(total / Decimal::from(rois.len())))
    }
}

fn validate_request(discount_rate: Decimal, forecast_years: u32) -> Result<()> {
    if discount_rate <= -Decimal::ONE {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Discount rate must be greater than -1, got {}",
            discount_rate
        ))));
    }
    if forecast_years == 0 || forecast_years > MAX_FORECAST_YEARS {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Forecast horizon must be between 1 and {} years, got {}",
            MAX_FORECAST_YEARS, forecast_years
        ))));
    }
    Ok(())
}

pub(crate) fn checked_total(values: impl IntoIterator<Item = Decimal>, what: &str) -> Result<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
        .ok_or_else(|| overflow(&format!("total {}", what)))
}

/// `observed + observed / count * synthetic`
pub(crate) fn project_total(observed: Decimal, count: Decimal, synthetic: Decimal) -> Option<Decimal> {
    observed
        .checked_div(count)?
        .checked_mul(synthetic)?
        .checked_add(observed)
}

fn overflow(what: &str) -> Error {
    Error::Calculation(CalculatorError::Overflow(what.to_string()))
}

fn round_amount(value: Decimal) -> Decimal {
    value.round_dp(DECIMAL_PRECISION)
}

fn round_all(values: &[Decimal]) -> Vec<Decimal> {
    values.iter().copied().map(round_amount).collect()
}
