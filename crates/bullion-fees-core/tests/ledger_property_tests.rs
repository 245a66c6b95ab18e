use bullion_fees_core::configurable;
use bullion_fees_core::fixed_schedule::{self, FixedHorizon};
use bullion_fees_core::ledger::{CalculationResult, LedgerEvent};
use bullion_fees_core::rates::{FeeRateSet, PaymentTiming, RecurringFee};
use bullion_fees_core::FeeError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn rate_sets() -> Vec<FeeRateSet> {
    vec![
        FeeRateSet::zero(),
        FeeRateSet::matching_benchmark(),
        FeeRateSet::matching_benchmark_tiered(),
        FeeRateSet {
            purchase_fee_per_unit: dec!(0.25),
            purchase_fee_pct: dec!(0.0125),
            custody: RecurringFee::flat(dec!(0.0035), PaymentTiming::PayEachPeriod),
            management: RecurringFee::tiered(3, dec!(0.002), dec!(0.006), PaymentTiming::AccrueAndSettle),
            redemption_fee_pct: dec!(0.004),
        },
    ]
}

fn all_results() -> Vec<CalculationResult> {
    let mut results = Vec::new();
    for horizon in [FixedHorizon::Short, FixedHorizon::Long] {
        results.push(
            fixed_schedule::compute_fixed_schedule(dec!(596), dec!(7), horizon).unwrap(),
        );
    }
    for rates in rate_sets() {
        for years in [1u32, 2, 5, 6, 10, 30] {
            results.push(
                configurable::compute_configurable(dec!(612.35), dec!(3), years, &rates).unwrap(),
            );
        }
    }
    results
}

// ===========================================================================
// Ledger cross-check
// ===========================================================================

#[test]
fn test_ledger_sum_equals_total_fees() {
    for result in all_results() {
        assert_eq!(
            result.ledger_total_paid(),
            result.total_fees,
            "Ledger sum must equal total fees for {} ({} years)",
            result.scenario,
            result.horizon_years
        );
        assert_eq!(
            result.total_fees,
            result.total_purchase_fees
                + result.total_custody_paid
                + result.total_management_paid
                + result.redemption_fee
        );
    }
}

#[test]
fn test_everything_accrued_is_paid() {
    for result in all_results() {
        assert_eq!(result.total_accrued(), result.total_recurring_paid);
        let last = result.yearly_records.last().unwrap();
        assert_eq!(last.cumulative_fees_paid, result.total_fees);
        assert_eq!(last.outstanding_accruals, Decimal::ZERO);
    }
}

// ===========================================================================
// Horizon boundary
// ===========================================================================

#[test]
fn test_ledger_shape() {
    for result in all_results() {
        let n = result.horizon_years as usize;
        assert_eq!(result.yearly_records.len(), n + 1);
        for (i, record) in result.yearly_records.iter().enumerate() {
            assert_eq!(record.year as usize, i);
            let expected = if i == 0 {
                LedgerEvent::Purchase
            } else if i == n {
                LedgerEvent::Redeem
            } else {
                LedgerEvent::Hold
            };
            assert_eq!(record.event, expected);
            assert_eq!(record.notional, result.notional);
        }
    }
}

#[test]
fn test_monetary_fields_non_negative() {
    for result in all_results() {
        for r in &result.yearly_records {
            for value in [
                r.purchase_fee_per_unit,
                r.purchase_fee_pct,
                r.custody_accrual,
                r.custody_paid,
                r.management_accrual,
                r.management_paid,
                r.redemption_fee,
                r.fees_paid,
                r.outstanding_accruals,
            ] {
                assert!(value >= Decimal::ZERO);
            }
        }
    }
}

// ===========================================================================
// Timing invariants
// ===========================================================================

#[test]
fn test_timing_equivalence_for_flat_rate() {
    let price = dec!(596);
    let rate = dec!(0.0042);
    for years in [1u32, 4, 9, 25] {
        let settle = FeeRateSet {
            custody: RecurringFee::flat(rate, PaymentTiming::AccrueAndSettle),
            ..FeeRateSet::zero()
        };
        let annual = FeeRateSet {
            custody: RecurringFee::flat(rate, PaymentTiming::PayEachPeriod),
            ..FeeRateSet::zero()
        };
        let a = configurable::compute_configurable(price, dec!(1), years, &settle).unwrap();
        let b = configurable::compute_configurable(price, dec!(1), years, &annual).unwrap();

        let expected = Decimal::from(years) * rate * price;
        assert_eq!(a.total_custody_paid, expected);
        assert_eq!(b.total_custody_paid, expected);
        assert_eq!(a.total_fees, b.total_fees);
    }
}

#[test]
fn test_accrue_and_settle_pays_nothing_while_holding() {
    let rates = FeeRateSet::matching_benchmark_tiered();
    let result = configurable::compute_configurable(dec!(596), dec!(1), 12, &rates).unwrap();
    for r in result
        .yearly_records
        .iter()
        .filter(|r| r.event == LedgerEvent::Hold)
    {
        assert_eq!(r.custody_paid, Decimal::ZERO);
    }
    let redeem = result.yearly_records.last().unwrap();
    let accrued: Decimal = result.yearly_records.iter().map(|r| r.custody_accrual).sum();
    assert_eq!(redeem.custody_paid, accrued);
}

#[test]
fn test_pay_each_period_pays_accrual() {
    let rates = FeeRateSet {
        custody: RecurringFee::flat(dec!(0.003), PaymentTiming::PayEachPeriod),
        management: RecurringFee::flat(dec!(0.001), PaymentTiming::PayEachPeriod),
        ..FeeRateSet::zero()
    };
    let result = configurable::compute_configurable(dec!(596), dec!(2), 6, &rates).unwrap();
    for r in &result.yearly_records[1..] {
        assert_eq!(r.custody_paid, r.custody_accrual);
        assert_eq!(r.management_paid, r.management_accrual);
    }
}

// ===========================================================================
// Linearity and zero configuration
// ===========================================================================

#[test]
fn test_linearity_in_units() {
    for rates in rate_sets() {
        let one = configurable::compute_configurable(dec!(596), dec!(1), 7, &rates).unwrap();
        for n in [2u32, 10, 250] {
            let many =
                configurable::compute_configurable(dec!(596), Decimal::from(n), 7, &rates).unwrap();
            let diff = (many.total_fees - one.total_fees * Decimal::from(n)).abs();
            assert!(diff < dec!(0.0001), "Linearity broken for {n} units: diff {diff}");
        }
    }
    for horizon in [FixedHorizon::Short, FixedHorizon::Long] {
        let one = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), horizon).unwrap();
        let many = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(37), horizon).unwrap();
        assert_eq!(many.total_fees, one.total_fees * dec!(37));
    }
}

#[test]
fn test_zero_configuration_costs_nothing() {
    for years in [1u32, 3, 50, 100] {
        let result =
            configurable::compute_configurable(dec!(1999.99), dec!(13), years, &FeeRateSet::zero())
                .unwrap();
        assert_eq!(result.total_fees, Decimal::ZERO);
        assert_eq!(result.total_fees_pct, Decimal::ZERO);
    }
}

#[test]
fn test_deterministic() {
    let rates = rate_sets().pop().unwrap();
    let a = configurable::compute_configurable(dec!(596), dec!(3), 8, &rates).unwrap();
    let b = configurable::compute_configurable(dec!(596), dec!(3), 8, &rates).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

// ===========================================================================
// Decimal range
// ===========================================================================

fn assert_input_error(result: Result<CalculationResult, FeeError>, expected_field: &str) {
    match result {
        Err(FeeError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        Err(other) => panic!("Expected InvalidInput for {expected_field}, got: {other}"),
        Ok(r) => panic!("Expected an error, got total fees {}", r.total_fees),
    }
}

#[test]
fn test_unrepresentable_notional_rejected_by_fixed_schedule() {
    let result = fixed_schedule::compute_fixed_schedule(Decimal::MAX, dec!(2), FixedHorizon::Short);
    assert_input_error(result, "units");
}

#[test]
fn test_unrepresentable_notional_rejected_by_configurable() {
    let result = configurable::compute_configurable(
        dec!(100000000000000000000),
        dec!(10000000000),
        5,
        &FeeRateSet::matching_benchmark(),
    );
    assert_input_error(result, "units");
}

#[test]
fn test_oversized_rate_is_an_error() {
    let rates = FeeRateSet {
        management: RecurringFee::flat(dec!(100000000000000000000), PaymentTiming::PayEachPeriod),
        ..FeeRateSet::zero()
    };
    let result = configurable::compute_configurable(dec!(10000000000), dec!(1), 3, &rates);
    assert_input_error(result, "management_accrual");
}

#[test]
fn test_totals_overflow_is_an_error() {
    // Each year's accrual fits, but ten of them do not
    let rates = FeeRateSet {
        custody: RecurringFee::flat(dec!(0.5), PaymentTiming::AccrueAndSettle),
        ..FeeRateSet::zero()
    };
    let result = configurable::compute_configurable(Decimal::MAX, dec!(1), 10, &rates);
    assert!(matches!(result, Err(FeeError::InvalidInput { .. })));
}

#[test]
fn test_largest_notional_prices_without_recurring_fees() {
    let result =
        configurable::compute_configurable(Decimal::MAX, dec!(1), 5, &FeeRateSet::zero()).unwrap();
    assert_eq!(result.total_fees, Decimal::ZERO);
    assert_eq!(result.notional, Decimal::MAX);
}
