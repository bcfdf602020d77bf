use emimitra_core::emi::{compute_emi, EmiOutcome, LoanTerms, NotComputedReason};
use emimitra_core::schedule::covers_interest;
use emimitra_core::time_value::monthly_rate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Forward EMI tests
// ===========================================================================

fn computed(terms: &LoanTerms) -> emimitra_core::EmiResult {
    match compute_emi(terms).unwrap() {
        EmiOutcome::Computed(result) => result,
        other => panic!("Expected Computed, got {other:?}"),
    }
}

fn sample_terms() -> Vec<LoanTerms> {
    vec![
        LoanTerms::new(dec!(800_000), dec!(7), 36),
        LoanTerms::new(dec!(2_500_000), dec!(8.5), 240),
        LoanTerms::new(dec!(5_000_000), dec!(9.25), 360),
        LoanTerms::new(dec!(40_000), dec!(12), 12),
        LoanTerms::new(dec!(1000), dec!(1), 1),
        LoanTerms::new(dec!(123_456.78), dec!(19.99), 84),
    ]
}

#[test]
fn test_scenario_800k_at_7_percent_36_months() {
    let result = computed(&LoanTerms::new(dec!(800_000), dec!(7), 36));
    // Standard annuity: 24,701.68 (≈ 24,706 within a few rupees)
    assert_eq!(result.monthly_emi, dec!(24701.68));
    assert!((result.monthly_emi - dec!(24_706)).abs() < dec!(10));
    // 24701.6775 × 36 − 800000 = 89,260.39
    assert_eq!(result.total_interest, dec!(89_260));
    assert_eq!(result.total_amount_payable, dec!(889_260));
}

#[test]
fn test_principal_components_sum_to_principal_within_tolerance() {
    for terms in sample_terms() {
        let result = computed(&terms);
        let tolerance = Decimal::from(terms.tenure_months) * dec!(0.01);
        let drift = (result.schedule.total_principal() - terms.financed_principal()).abs();
        assert!(
            drift <= tolerance,
            "{} months: drift {} exceeds {}",
            terms.tenure_months,
            drift,
            tolerance
        );
    }
}

#[test]
fn test_each_row_splits_emi_exactly_within_a_paisa() {
    for terms in sample_terms() {
        let result = computed(&terms);
        for row in &result.schedule {
            let diff = (row.principal_component + row.interest_component - row.emi).abs();
            assert!(diff <= dec!(0.01), "month {}: {}", row.month, diff);
        }
    }
}

#[test]
fn test_balance_non_increasing_and_length_matches_tenure() {
    for terms in sample_terms() {
        let result = computed(&terms);
        let rate = monthly_rate(terms.annual_rate_percent);
        assert!(covers_interest(terms.financed_principal(), rate, result.monthly_emi));
        assert_eq!(result.schedule.len(), terms.tenure_months as usize);
        for pair in result.schedule.rows().windows(2) {
            assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
        }
        let last = result.schedule.rows().last().unwrap();
        assert!(last.remaining_balance.abs() <= dec!(0.01));
    }
}

#[test]
fn test_thirty_year_schedule_total_interest_consistent() {
    let result = computed(&LoanTerms::new(dec!(5_000_000), dec!(9.25), 360));
    let row_interest = result.schedule.total_interest();
    // Aggregate is rounded to whole rupees; rows carry per-row rounding
    assert!((row_interest - result.total_interest).abs() <= dec!(360) * dec!(0.01) + dec!(1));
}

#[test]
fn test_non_positive_inputs_are_not_computed() {
    let cases = [
        (
            LoanTerms::new(dec!(0), dec!(8), 12),
            NotComputedReason::NonPositivePrincipal,
        ),
        (
            LoanTerms::new(dec!(-5), dec!(8), 12),
            NotComputedReason::NonPositivePrincipal,
        ),
        (
            LoanTerms::new(dec!(1000), dec!(-1), 12),
            NotComputedReason::NonPositiveRate,
        ),
        (
            LoanTerms::new(dec!(1000), dec!(8), 0),
            NotComputedReason::ZeroTenure,
        ),
    ];
    for (terms, expected) in cases {
        assert_eq!(
            compute_emi(&terms).unwrap(),
            EmiOutcome::NotComputed { reason: expected }
        );
    }
}

#[test]
fn test_product_example_from_calculator_page() {
    // ₹50,000 phone, ₹10,000 down, 12% for 12 months, ₹1,000 fee
    let mut terms = LoanTerms::new(dec!(50_000), dec!(12), 12);
    terms.down_payment = Some(dec!(10_000));
    terms.processing_fee = Some(dec!(1000));
    let result = computed(&terms);
    assert_eq!(result.monthly_emi, dec!(3553.95));
    assert_eq!(result.total_interest, dec!(2647));
    assert_eq!(result.total_amount_payable, dec!(43_647));
}
