use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::cash_flows::HorizonPolicy;
use crate::constants::{
    DEFAULT_DISCOUNT_RATE, DEFAULT_FORECAST_YEARS, DEFAULT_IRR_PRECISION,
    DEFAULT_OPTIMISTIC_FACTOR, DEFAULT_PESSIMISTIC_FACTOR, DEFAULT_SENSITIVITY_PERCENTAGES,
    MAX_FORECAST_YEARS,
};
use crate::errors::{Error, Result};
use crate::forecast::{ScenarioFactors, SensitivityMode};
use crate::metrics::IrrFallback;

pub const DISCOUNT_RATE_KEY: &str = "discount_rate";
pub const FORECAST_YEARS_KEY: &str = "forecast_years";
pub const HORIZON_POLICY_KEY: &str = "horizon_policy";
pub const SENSITIVITY_PERCENTAGES_KEY: &str = "sensitivity_percentages";
pub const SENSITIVITY_MODE_KEY: &str = "sensitivity_mode";
pub const ROI_BASE_KEY: &str = "roi_base";
pub const OPTIMISTIC_FACTOR_KEY: &str = "optimistic_factor";
pub const PESSIMISTIC_FACTOR_KEY: &str = "pessimistic_factor";
pub const IRR_PRECISION_KEY: &str = "irr_precision";
pub const IRR_FALLBACK_KEY: &str = "irr_fallback";
pub const RELATIVE_PERIOD_ANCHOR_YEAR_KEY: &str = "relative_period_anchor_year";

/// Denominator used for the headline ROI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoiBase {
    /// Projected total costs.
    #[default]
    Costs,
    /// Total invested capital.
    Investment,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisSettings {
    pub discount_rate: Decimal,
    pub forecast_years: u32,
    pub horizon_policy: HorizonPolicy,
    pub sensitivity_percentages: Vec<Decimal>,
    pub sensitivity_mode: SensitivityMode,
    pub roi_base: RoiBase,
    pub optimistic_factor: Decimal,
    pub pessimistic_factor: Decimal,
    pub irr_precision: f64,
    pub irr_fallback: IrrFallback,
    /// Calendar year that `year.month` period tokens count from.
    pub relative_period_anchor_year: Option<i32>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            discount_rate: DEFAULT_DISCOUNT_RATE,
            forecast_years: DEFAULT_FORECAST_YEARS,
            horizon_policy: HorizonPolicy::default(),
            sensitivity_percentages: DEFAULT_SENSITIVITY_PERCENTAGES
                .iter()
                .map(|p| Decimal::from(*p))
                .collect(),
            sensitivity_mode: SensitivityMode::default(),
            roi_base: RoiBase::default(),
            optimistic_factor: DEFAULT_OPTIMISTIC_FACTOR,
            pessimistic_factor: DEFAULT_PESSIMISTIC_FACTOR,
            irr_precision: DEFAULT_IRR_PRECISION,
            irr_fallback: IrrFallback::default(),
            relative_period_anchor_year: None,
        }
    }
}

impl AnalysisSettings {
    /// Builds settings from a key/value settings store. Missing keys keep
    /// their defaults and unknown keys are ignored.
    pub fn from_key_values(values: &HashMap<String, String>) -> Result<Self> {
        let mut settings = Self::default();

        for (key, raw) in values {
            let value = raw.trim();
            match key.as_str() {
                DISCOUNT_RATE_KEY => settings.discount_rate = parse_decimal(key, value)?,
                FORECAST_YEARS_KEY => settings.forecast_years = parse_number(key, value)?,
                HORIZON_POLICY_KEY => settings.horizon_policy = parse_variant(key, value)?,
                SENSITIVITY_PERCENTAGES_KEY => {
                    settings.sensitivity_percentages = parse_decimal_list(key, value)?
                }
                SENSITIVITY_MODE_KEY => settings.sensitivity_mode = parse_variant(key, value)?,
                ROI_BASE_KEY => settings.roi_base = parse_variant(key, value)?,
                OPTIMISTIC_FACTOR_KEY => {
                    settings.optimistic_factor = parse_decimal(key, value)?
                }
                PESSIMISTIC_FACTOR_KEY => {
                    settings.pessimistic_factor = parse_decimal(key, value)?
                }
                IRR_PRECISION_KEY => settings.irr_precision = parse_number(key, value)?,
                IRR_FALLBACK_KEY => settings.irr_fallback = parse_variant(key, value)?,
                RELATIVE_PERIOD_ANCHOR_YEAR_KEY => {
                    settings.relative_period_anchor_year = if value.is_empty() {
                        None
                    } else {
                        Some(parse_number(key, value)?)
                    }
                }
                _ => {}
            }
        }

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.discount_rate <= -Decimal::ONE {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be greater than -1, got {}",
                DISCOUNT_RATE_KEY, self.discount_rate
            )));
        }
        if self.forecast_years == 0 || self.forecast_years > MAX_FORECAST_YEARS {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be between 1 and {}, got {}",
                FORECAST_YEARS_KEY, MAX_FORECAST_YEARS, self.forecast_years
            )));
        }
        if !(self.irr_precision.is_finite() && self.irr_precision > 0.0) {
            return Err(Error::InvalidConfigValue(format!(
                "{} must be positive, got {}",
                IRR_PRECISION_KEY, self.irr_precision
            )));
        }
        if self.optimistic_factor.is_sign_negative() || self.pessimistic_factor.is_sign_negative()
        {
            return Err(Error::InvalidConfigValue(
                "scenario factors must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn scenario_factors(&self) -> ScenarioFactors {
        ScenarioFactors {
            optimistic: self.optimistic_factor,
            pessimistic: self.pessimistic_factor,
        }
    }
}

fn parse_decimal(key: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| Error::InvalidConfigValue(format!("{}: '{}' ({})", key, value, e)))
}

fn parse_number<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| Error::InvalidConfigValue(format!("{}: '{}' ({})", key, value, e)))
}

/// Decodes a JSON array of numbers, keeping each number's decimal text exact.
fn parse_decimal_list(key: &str, value: &str) -> Result<Vec<Decimal>> {
    let numbers: Vec<serde_json::Number> = serde_json::from_str(value)
        .map_err(|e| Error::InvalidConfigValue(format!("{}: '{}' ({})", key, value, e)))?;
    numbers
        .iter()
        .map(|n| parse_decimal(key, &n.to_string()))
        .collect()
}

/// Decodes a unit enum variant from its serialized name.
fn parse_variant<T: DeserializeOwned>(key: &str, value: &str) -> Result<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|e| Error::InvalidConfigValue(format!("{}: '{}' ({})", key, value, e)))
}
