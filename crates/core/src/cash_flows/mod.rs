//! Cash flow construction from financial records and investment events.

mod cash_flow_builder;
mod cash_flows_model;
mod monthly_grid;

pub use cash_flow_builder::{
    assemble_cash_flows, average_net_profit, build_cash_flows, validate_investments,
    validate_records, warn_on_negative_records,
};
pub use cash_flows_model::{
    CashFlowBreakdown, CashFlowVector, FinancialPeriodRecord, HorizonPolicy, InvestmentEvent,
};
pub use monthly_grid::{build_monthly_grid, monthly_labels, MonthlyGrid};
