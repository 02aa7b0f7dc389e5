//! Trend projection and what-if analysis over historical totals.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::forecast_model::{
    ConfidenceInterval, ForecastScenarios, RegressionModel, ScenarioFactors, SensitivityBaseline,
    SensitivityMode, SensitivityRow,
};
use crate::metrics::calculate_roi;

/// Least squares fit of `y` on `x`.
///
/// Fewer than two points, mismatched lengths or sums outside the decimal
/// range give the zero model.
pub fn linear_regression(x: &[Decimal], y: &[Decimal]) -> RegressionModel {
    let n = x.len();
    if n != y.len() || n < 2 {
        return RegressionModel::default();
    }

    fit(x, y).unwrap_or_else(|| {
        warn!("Regression over {} points overflowed; returning zero model", n);
        RegressionModel::default()
    })
}

fn fit(x: &[Decimal], y: &[Decimal]) -> Option<RegressionModel> {
    let count = Decimal::from(x.len());
    let sum_x = checked_sum(x.iter().copied().map(Some))?;
    let sum_y = checked_sum(y.iter().copied().map(Some))?;
    let sum_xy = checked_sum(x.iter().zip(y).map(|(a, b)| a.checked_mul(*b)))?;
    let sum_xx = checked_sum(x.iter().map(|a| a.checked_mul(*a)))?;

    let denominator = count
        .checked_mul(sum_xx)?
        .checked_sub(sum_x.checked_mul(sum_x)?)?;
    let mean_y = sum_y.checked_div(count)?;
    if denominator.is_zero() {
        debug!("Regression over constant x; returning flat model");
        return Some(RegressionModel {
            slope: Decimal::ZERO,
            intercept: mean_y,
            r_squared: Decimal::ZERO,
        });
    }

    let slope = count
        .checked_mul(sum_xy)?
        .checked_sub(sum_x.checked_mul(sum_y)?)?
        .checked_div(denominator)?;
    let intercept = sum_y
        .checked_sub(slope.checked_mul(sum_x)?)?
        .checked_div(count)?;
    let model = RegressionModel {
        slope,
        intercept,
        r_squared: Decimal::ZERO,
    };

    // Deviations are scaled into [-1, 1] before squaring; r² is unchanged.
    let mut actual = Vec::with_capacity(x.len());
    let mut predicted = Vec::with_capacity(x.len());
    for (xi, yi) in x.iter().zip(y) {
        actual.push(yi.checked_sub(mean_y)?);
        predicted.push(model.predict(*xi)?.checked_sub(mean_y)?);
    }
    let scale = actual
        .iter()
        .chain(&predicted)
        .map(|d| d.abs())
        .max()
        .unwrap_or_default();
    if scale.is_zero() {
        return Some(model);
    }

    let sum_of_squares = |devs: &[Decimal]| -> Option<Decimal> {
        checked_sum(devs.iter().map(|d| {
            let unit = d.checked_div(scale)?;
            unit.checked_mul(unit)
        }))
    };
    let ss_tot = sum_of_squares(actual.as_slice())?;
    let ss_reg = sum_of_squares(predicted.as_slice())?;
    let r_squared = if ss_tot.is_zero() {
        Decimal::ZERO
    } else {
        ss_reg.checked_div(ss_tot)?
    };

    Some(RegressionModel { r_squared, ..model })
}

fn checked_sum(values: impl IntoIterator<Item = Option<Decimal>>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value?))
}

/// Projects `forecast_years` values past the end of `historical`, regressing
/// on the series position. Every scenario is floored at zero.
pub fn generate_scenarios(
    historical: &[Decimal],
    forecast_years: u32,
    factors: &ScenarioFactors,
) -> ForecastScenarios {
    let x: Vec<Decimal> = (0..historical.len()).map(Decimal::from).collect();
    let model = linear_regression(&x, historical);
    let last_index = Decimal::from(historical.len()) - Decimal::ONE;

    let mut scenarios = ForecastScenarios::default();
    for year in 1..=forecast_years {
        let base = model.predict(last_index + Decimal::from(year));
        let scaled = |factor: Decimal| base.and_then(|b| b.checked_mul(factor));
        scenarios
            .optimistic
            .push(floor_at_zero(scaled(factors.optimistic)));
        scenarios.base.push(floor_at_zero(base));
        scenarios
            .pessimistic
            .push(floor_at_zero(scaled(factors.pessimistic)));
    }

    scenarios
}

/// Negative or unrepresentable projections are reported as zero.
fn floor_at_zero(value: Option<Decimal>) -> Decimal {
    value.map_or(Decimal::ZERO, |v| v.max(Decimal::ZERO))
}

/// Recomputes profit and ROI with totals moved by each percentage.
pub fn sensitivity_analysis(
    baseline: &SensitivityBaseline,
    change_percentages: &[Decimal],
    mode: SensitivityMode,
) -> Vec<SensitivityRow> {
    change_percentages
        .iter()
        .map(|percent| {
            let multiplier = Decimal::ONE + percent / dec!(100);
            let revenue = match mode {
                SensitivityMode::CostsOnly => baseline.revenue,
                SensitivityMode::RevenueAndCosts => baseline.revenue.saturating_mul(multiplier),
            };
            let costs = baseline.costs.saturating_mul(multiplier);
            let profit = revenue.saturating_sub(costs);

            SensitivityRow {
                change_percent: *percent,
                revenue,
                costs,
                profit,
                roi: calculate_roi(profit, costs),
            }
        })
        .collect()
}

/// Trailing mean over `window` points.
///
/// A series shorter than the window yields only its first value.
pub fn moving_average(data: &[Decimal], window: usize) -> Vec<Decimal> {
    if window == 0 || data.is_empty() {
        return Vec::new();
    }
    if data.len() < window {
        return data[..1].to_vec();
    }

    let size = Decimal::from(window);
    data.windows(window)
        .map(|w| w.iter().sum::<Decimal>() / size)
        .collect()
}

/// Normal-approximation interval around `forecast`.
pub fn confidence_interval(
    forecast: Decimal,
    std_dev: Decimal,
    confidence_level: Decimal,
) -> ConfidenceInterval {
    let z_score = if confidence_level == dec!(0.90) {
        dec!(1.645)
    } else if confidence_level == dec!(0.99) {
        dec!(2.576)
    } else {
        dec!(1.96)
    };
    let margin = z_score * std_dev;

    ConfidenceInterval {
        forecast,
        lower_bound: forecast - margin,
        upper_bound: forecast + margin,
    }
}
