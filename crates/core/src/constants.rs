use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for amounts in analysis results
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for the IRR rate
pub const RATE_DECIMAL_PRECISION: u32 = 10;

/// Default per-period discount rate
pub const DEFAULT_DISCOUNT_RATE: Decimal = dec!(0.1);

/// Default forecast horizon, in years
pub const DEFAULT_FORECAST_YEARS: u32 = 3;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Default cost perturbations for sensitivity analysis, in percent
pub const DEFAULT_SENSITIVITY_PERCENTAGES: [i32; 5] = [-20, -10, 0, 10, 20];

pub const DEFAULT_OPTIMISTIC_FACTOR: Decimal = dec!(1.10);
pub const DEFAULT_PESSIMISTIC_FACTOR: Decimal = dec!(0.90);

/// Default convergence precision for the IRR search
pub const DEFAULT_IRR_PRECISION: f64 = 1e-4;

/// Absolute NPV tolerance a candidate IRR must meet to be accepted
pub const IRR_NPV_TOLERANCE: f64 = 0.1;

/// Longest accepted forecast horizon, in years
pub const MAX_FORECAST_YEARS: u32 = 100;

/// Largest absolute revenue, cost or investment amount accepted per entry
pub const MAX_ABS_AMOUNT: Decimal = dec!(1_000_000_000_000_000_000);
