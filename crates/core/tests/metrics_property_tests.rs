//! Property-based integration tests for cash flow assembly and metrics.
//!
//! These tests verify that universal properties hold across all valid inputs,
//! using the `proptest` crate for random test case generation.

use chrono::NaiveDate;
use proptest::prelude::*;
use projectroi_core::cash_flows::{build_cash_flows, FinancialPeriodRecord, InvestmentEvent};
use projectroi_core::metrics::{
    calculate_irr, calculate_npv, calculate_payback_period, calculate_roi, IrrFallback,
    IrrStatus, PaybackPeriod,
};
use projectroi_core::periods::{PeriodIndex, PeriodKey};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// =============================================================================
// Generators
// =============================================================================

/// First day of a month between 2020 and 2025.
fn arb_period() -> impl Strategy<Value = PeriodKey> {
    (2020i32..=2025, 1u32..=12).prop_map(|(year, month)| {
        PeriodKey::Date(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
    })
}

fn arb_record() -> impl Strategy<Value = FinancialPeriodRecord> {
    (arb_period(), 0i64..100_000, 0i64..100_000).prop_map(|(period, revenue, costs)| {
        FinancialPeriodRecord::new(period, Decimal::from(revenue), Decimal::from(costs))
    })
}

fn arb_investment() -> impl Strategy<Value = InvestmentEvent> {
    (2019i32..=2026, 1u32..=12, 1u32..=28, 1i64..50_000).prop_map(|(y, m, d, amount)| {
        InvestmentEvent::new(
            Decimal::from(amount),
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        )
    })
}

/// One outlay followed by positive flows that at least repay it.
fn arb_conventional_flows() -> impl Strategy<Value = Vec<Decimal>> {
    (100i64..5_000, prop::collection::vec(50i64..2_000, 1..8))
        .prop_filter("flows must repay the outlay", |(outlay, flows)| {
            flows.iter().sum::<i64>() >= *outlay
        })
        .prop_map(|(outlay, flows)| {
            std::iter::once(Decimal::from(-outlay))
                .chain(flows.into_iter().map(Decimal::from))
                .collect()
        })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A single sign change always yields a root, and the NPV at that root
    /// is within the acceptance tolerance of zero.
    #[test]
    fn prop_irr_zeroes_npv(flows in arb_conventional_flows()) {
        let outcome = calculate_irr(&flows);

        prop_assert!(outcome.is_converged(), "no root for {:?}", flows);
        let rate = outcome.rate.unwrap();
        let npv = calculate_npv(&flows, rate);
        prop_assert!(
            npv.abs() < dec!(0.1),
            "NPV at IRR {} was {} for {:?}",
            rate,
            npv,
            flows
        );
    }

    /// The reported rate keeps the decimal NPV within tolerance for flows of
    /// any magnitude, not only the rate the search itself evaluated.
    #[test]
    fn prop_irr_zeroes_npv_at_large_scale(
        flows in arb_conventional_flows(),
        exponent in 0u32..=9
    ) {
        let scale = Decimal::from(10i64.pow(exponent));
        let scaled: Vec<Decimal> = flows.iter().map(|cf| *cf * scale).collect();
        let outcome = calculate_irr(&scaled);

        prop_assert!(outcome.is_converged(), "no root for {:?}", scaled);
        let rate = outcome.rate.unwrap();
        let npv = calculate_npv(&scaled, rate);
        prop_assert!(npv.abs() < dec!(0.1), "NPV at IRR {} was {}", rate, npv);
    }

    /// Flows without both signs never produce a root and never panic.
    #[test]
    fn prop_irr_without_sign_change_is_degenerate(
        values in prop::collection::vec(0i64..10_000, 0..10),
        negate in any::<bool>()
    ) {
        let flows: Vec<Decimal> = values
            .into_iter()
            .map(|v| if negate { Decimal::from(-v) } else { Decimal::from(v) })
            .collect();
        let outcome = calculate_irr(&flows);

        prop_assert!(matches!(
            outcome.status,
            IrrStatus::NoSignChange | IrrStatus::InsufficientData
        ));
        prop_assert_eq!(outcome.reported_rate(IrrFallback::Zero), Some(Decimal::ZERO));
        prop_assert_eq!(outcome.reported_rate(IrrFallback::Undefined), None);
    }

    /// Payback is reached exactly when the running total recovers the outlay,
    /// and lies within the series.
    #[test]
    fn prop_payback_matches_cumulative_recovery(
        outlay in 1i64..10_000,
        flows in prop::collection::vec(-500i64..3_000, 0..10)
    ) {
        let series: Vec<Decimal> = std::iter::once(Decimal::from(-outlay))
            .chain(flows.iter().copied().map(Decimal::from))
            .collect();
        let recovers = flows
            .iter()
            .scan(-outlay, |total, flow| {
                *total += flow;
                Some(*total)
            })
            .any(|total| total >= 0);

        match calculate_payback_period(&series) {
            PaybackPeriod::Periods(periods) => {
                prop_assert!(recovers);
                prop_assert!(periods >= Decimal::ZERO);
                prop_assert!(periods <= Decimal::from(flows.len()));
            }
            PaybackPeriod::Never => prop_assert!(!recovers),
        }
    }

    /// ROI against a zero base is zero, never a division failure.
    #[test]
    fn prop_roi_zero_base(profit in -1_000_000i64..1_000_000) {
        prop_assert_eq!(calculate_roi(Decimal::from(profit), Decimal::ZERO), Decimal::ZERO);
    }

    /// The index is strictly ascending, deduplicated, and stable under
    /// rebuilding from its own keys.
    #[test]
    fn prop_period_index_is_sorted_and_stable(periods in prop::collection::vec(arb_period(), 1..40)) {
        let index = PeriodIndex::build(&periods).unwrap();

        prop_assert!(index.keys().windows(2).all(|pair| pair[0] < pair[1]));
        for period in &periods {
            prop_assert!(index.position_of(period).is_some());
        }

        let rebuilt = PeriodIndex::build(index.keys()).unwrap();
        prop_assert_eq!(rebuilt.keys(), index.keys());

        let mut reversed = index.keys().to_vec();
        reversed.reverse();
        let rebuilt_reversed = PeriodIndex::build(&reversed).unwrap();
        prop_assert_eq!(rebuilt_reversed.keys(), index.keys());
    }

    /// Rebuilding cash flows is deterministic and every invested amount is
    /// accounted for exactly once.
    #[test]
    fn prop_cash_flows_are_deterministic_and_conserve_money(
        records in prop::collection::vec(arb_record(), 1..24),
        investments in prop::collection::vec(arb_investment(), 0..10)
    ) {
        let keys: Vec<PeriodKey> = records.iter().map(|r| r.period).collect();
        let index = PeriodIndex::build(&keys).unwrap();

        let first = build_cash_flows(&records, &investments, &index).unwrap();
        let second = build_cash_flows(&records, &investments, &index).unwrap();
        prop_assert_eq!(&first, &second);

        let invested: Decimal = investments.iter().map(|i| i.amount).sum();
        let attributed: Decimal = first.attributed_investments.iter().sum();
        prop_assert_eq!(first.initial_investment + attributed, invested);

        let profit: Decimal = records.iter().map(FinancialPeriodRecord::net_profit).sum();
        let operational: Decimal = first.operational_flows.iter().sum();
        prop_assert_eq!(operational, profit - attributed);
    }
}
