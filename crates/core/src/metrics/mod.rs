//! Investment metrics: ROI, NPV, IRR, payback period and break-even.

mod irr_solver;
mod metrics_calculator;
mod metrics_model;

pub use irr_solver::{calculate_irr, IrrSolver};
pub use metrics_calculator::{
    calculate_break_even, calculate_metrics, calculate_npv, calculate_payback_period,
    calculate_roi,
};
pub use metrics_model::{
    BreakEven, IrrFallback, IrrMethod, IrrOutcome, IrrStatus, MetricsResult, PaybackPeriod,
};
