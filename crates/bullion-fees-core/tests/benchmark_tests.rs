use bullion_fees_core::fixed_schedule::{self, FixedHorizon, FixedScheduleInput};
use bullion_fees_core::ledger::{ledger_rows, EngineKind, LedgerEvent, LEDGER_COLUMNS};
use bullion_fees_core::FeeError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Scenario 1: 5-year hold, 1 unit at 596
// ===========================================================================

#[test]
fn test_short_scenario_purchase_year() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();
    let purchase = &result.yearly_records[0];

    assert_eq!(purchase.event, LedgerEvent::Purchase);
    assert_eq!(purchase.purchase_fee_per_unit, dec!(0.1575));
    assert_eq!(purchase.purchase_fee_pct, dec!(12.516));
    assert_eq!(purchase.fees_paid, dec!(12.6735));
    assert_eq!(result.total_purchase_fees, dec!(12.6735));
    assert_eq!(purchase.notes, "One-time purchase fees paid");
}

#[test]
fn test_short_scenario_totals() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();

    assert_eq!(result.engine, EngineKind::FixedSchedule);
    assert_eq!(result.scenario, "Scenario 1: 5-Year Hold");
    assert_eq!(result.horizon_years, 5);
    assert_eq!(result.total_recurring_paid, dec!(9.387));
    assert_eq!(result.redemption_fee, dec!(3.129));
    assert_eq!(result.total_fees, dec!(25.1895));
    assert!((result.total_fees_pct - dec!(25.1895) / dec!(596)).abs() < dec!(0.0000000001));
}

#[test]
fn test_short_scenario_redemption_year() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();
    let redeem = result.record(5).unwrap();

    assert_eq!(redeem.event, LedgerEvent::Redeem);
    assert!(result.record(6).is_none());
    assert_eq!(redeem.custody_accrual, dec!(1.8774));
    assert_eq!(redeem.custody_paid, dec!(9.387));
    assert_eq!(redeem.redemption_fee, dec!(3.129));
    assert_eq!(redeem.fees_paid, dec!(12.516));
}

// ===========================================================================
// Scenario 2: 10-year hold with custody step-up after year 5
// ===========================================================================

#[test]
fn test_long_scenario_tiered_custody() {
    let result =
        fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Long).unwrap();

    let standard: Decimal = result.yearly_records[1..=5]
        .iter()
        .map(|r| r.custody_accrual)
        .sum();
    let extended: Decimal = result.yearly_records[6..=10]
        .iter()
        .map(|r| r.custody_accrual)
        .sum();

    assert_eq!(standard, dec!(9.387));
    assert_eq!(extended, dec!(31.29));
    assert_eq!(result.total_custody_paid, dec!(40.677));
    assert_eq!(result.total_fees, dec!(56.4795));
    assert_eq!(result.scenario, "Scenario 2: 10-Year Hold");
}

#[test]
fn test_long_scenario_costs_more_than_short() {
    let short = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();
    let long =
        fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Long).unwrap();
    assert!(long.total_fees_pct > short.total_fees_pct);
}

#[test]
fn test_outstanding_custody_builds_until_redemption() {
    let result =
        fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Long).unwrap();
    assert_eq!(result.yearly_records[5].outstanding_accruals, dec!(9.387));
    assert_eq!(
        result.yearly_records[9].outstanding_accruals,
        dec!(9.387) + dec!(6.258) * dec!(4)
    );
    assert_eq!(result.yearly_records[10].outstanding_accruals, Decimal::ZERO);
}

// ===========================================================================
// Scaling
// ===========================================================================

#[test]
fn test_hundred_units() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(100), FixedHorizon::Short)
        .unwrap();
    assert_eq!(result.notional, dec!(59600));
    assert_eq!(result.yearly_records[0].purchase_fee_per_unit, dec!(15.75));
    assert_eq!(result.total_fees, dec!(2518.95));
}

#[test]
fn test_ten_units_is_ten_times_one() {
    let one = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();
    let ten = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(10), FixedHorizon::Short)
        .unwrap();
    assert_eq!(ten.total_fees, one.total_fees * dec!(10));
}

// ===========================================================================
// Validation and envelope
// ===========================================================================

#[test]
fn test_negative_price_rejected() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(-596), dec!(1), FixedHorizon::Short);
    match result.unwrap_err() {
        FeeError::InvalidInput { field, .. } => assert_eq!(field, "unit_price"),
        other => panic!("Expected InvalidInput for unit_price, got: {other}"),
    }
}

#[test]
fn test_zero_units_rejected() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), Decimal::ZERO, FixedHorizon::Long);
    assert!(matches!(result, Err(FeeError::InvalidInput { .. })));
}

#[test]
fn test_input_from_json() {
    let input: FixedScheduleInput =
        serde_json::from_str(r#"{ "unit_price": "596", "units": "1", "horizon": "long" }"#)
            .unwrap();
    let output = fixed_schedule::calculate_fixed_schedule(&input).unwrap();
    assert_eq!(output.result.total_fees, dec!(56.4795));
    assert_eq!(output.metadata.precision, "rust_decimal_128bit");
}

#[test]
fn test_export_has_management_columns() {
    let result = fixed_schedule::compute_fixed_schedule(dec!(596), dec!(1), FixedHorizon::Short)
        .unwrap();
    let rows = ledger_rows(&result);
    assert_eq!(rows.len(), 6);
    for row in &rows {
        let record = row.to_record();
        assert_eq!(record.len(), LEDGER_COLUMNS.len());
        assert_eq!(row.management_accrual, Decimal::ZERO);
        assert_eq!(row.management_paid, Decimal::ZERO);
    }
    assert_eq!(rows[5].to_record()[1], "Redeem");
}
