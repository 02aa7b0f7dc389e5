//! Regression forecasts, scenarios and sensitivity analysis.

mod forecast_calculator;
mod forecast_model;

pub use forecast_calculator::{
    confidence_interval, generate_scenarios, linear_regression, moving_average,
    sensitivity_analysis,
};
pub use forecast_model::{
    ConfidenceInterval, ForecastScenarios, RegressionModel, ScenarioFactors, SensitivityBaseline,
    SensitivityMode, SensitivityRow,
};
