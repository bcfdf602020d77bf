use emimitra_core::calculators::{self, SalaryBreakupInput};
use emimitra_core::policy::TaxBracket;
use emimitra_core::salary::{compute_salary_breakup, TaxRegime};
use emimitra_core::{CalcError, LendingPolicy};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

// ===========================================================================
// Salary breakup tests
// ===========================================================================

#[test]
fn test_nine_lakh_ctc_new_regime_with_pf() {
    let input = SalaryBreakupInput {
        ctc: dec!(900_000),
        regime: TaxRegime::New,
        include_pf: true,
    };
    let out = calculators::salary_breakup(&input, &LendingPolicy::default()).unwrap();
    let breakup = &out.result.breakup;

    // 75000 monthly CTC, employer PF capped at 1800
    assert_eq!(breakup.gross_monthly, dec!(73_200));
    // (900000 − 50000 − 700000) × 5%
    assert_eq!(breakup.annual_taxable_income, dec!(850_000));
    assert_eq!(breakup.annual_tax, dec!(7500));
    assert_eq!(breakup.monthly_tax, dec!(625));
    // 73200 − 1800 − 200 − 625
    assert_eq!(breakup.in_hand_monthly, dec!(70_575));
    assert_eq!(out.result.suggestion.preferred_regime, TaxRegime::New);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_old_regime_suggested_above_fifteen_lakh() {
    let input = SalaryBreakupInput {
        ctc: dec!(1_800_000),
        regime: TaxRegime::New,
        include_pf: true,
    };
    let out = calculators::salary_breakup(&input, &LendingPolicy::default()).unwrap();
    assert_eq!(out.result.suggestion.preferred_regime, TaxRegime::Old);
    assert!(out.result.suggestion.regime_hint.contains("Old Regime"));
}

#[test]
fn test_custom_bracket_table_from_policy() {
    let mut policy = LendingPolicy::default();
    policy.salary.new_regime_brackets = vec![
        TaxBracket {
            above: dec!(0),
            base_tax: dec!(0),
            rate: dec!(0),
        },
        TaxBracket {
            above: dec!(300_000),
            base_tax: dec!(0),
            rate: dec!(0.1),
        },
    ];
    let breakup = compute_salary_breakup(dec!(600_000), TaxRegime::New, false, &policy).unwrap();
    assert_eq!(breakup.annual_tax, dec!(30_000));
    assert_eq!(breakup.monthly_tax, dec!(2500));
}

#[test]
fn test_negative_ctc_is_invalid_input() {
    let err = compute_salary_breakup(dec!(-1), TaxRegime::New, true, &LendingPolicy::default())
        .unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput { .. }));
}

#[test]
fn test_output_serialises_amounts_as_strings() {
    let input = SalaryBreakupInput {
        ctc: dec!(900_000),
        regime: TaxRegime::Old,
        include_pf: true,
    };
    let out = calculators::salary_breakup(&input, &LendingPolicy::default()).unwrap();
    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(value["result"]["breakup"]["pf_contribution"], "1800");
    assert_eq!(value["assumptions"]["regime"], "Old");
}
