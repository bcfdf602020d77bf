use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::advisory::{
    self, ComparisonRow, CreditImpactAssessment, DownPaymentFeedback, Tip,
};
use crate::eligibility::{compute_eligibility, EligibilityInputs, EligibilityResult};
use crate::emi::{compute_emi, EmiOutcome, LoanTerms};
use crate::policy::LendingPolicy;
use crate::salary::{
    compute_salary_breakup, salary_suggestion, SalaryBreakup, SalarySuggestion, TaxRegime,
};
use crate::schedule::{ScheduleRow, YearSummary};
use crate::types::*;
use crate::CalcResult;

/// Months plotted in the principal/interest chart.
const CHART_MONTHS: usize = 12;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoanInput {
    pub loan_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    pub annual_rate_percent: Percent,
    pub tenure_years: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoanOutput {
    pub emi: EmiOutcome,
    pub yearly_summary: Vec<YearSummary>,
    /// First twelve months, for the principal vs. interest chart.
    pub chart_months: Vec<ScheduleRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLoanInput {
    pub loan_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleLoanOutput {
    pub emi: EmiOutcome,
    /// `None` when no income was supplied or the EMI was not computed.
    pub is_eligible: Option<bool>,
    pub max_affordable_emi: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLoanInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductLoanOutput {
    pub emi: EmiOutcome,
    pub down_payment_percentage: Option<Percent>,
    pub down_payment_feedback: DownPaymentFeedback,
    pub insights: Vec<Tip>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryLoanOutput {
    pub eligibility: EligibilityResult,
    pub comparison: Vec<ComparisonRow>,
    pub tips: Vec<Tip>,
    pub credit_impact: CreditImpactAssessment,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryBreakupInput {
    pub ctc: Money,
    #[serde(default)]
    pub regime: TaxRegime,
    #[serde(default = "default_include_pf")]
    pub include_pf: bool,
}

fn default_include_pf() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryBreakupOutput {
    pub breakup: SalaryBreakup,
    pub suggestion: SalarySuggestion,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Home loan: tenure in years, optional down payment, yearly amortisation.
pub fn home_loan(input: &HomeLoanInput) -> CalcResult<ComputationOutput<HomeLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = LoanTerms {
        principal: input.loan_amount,
        annual_rate_percent: input.annual_rate_percent,
        tenure_months: input.tenure_years.saturating_mul(12),
        down_payment: input.down_payment,
        processing_fee: None,
        first_due_date: input.first_due_date,
    };
    let emi = compute_emi(&terms)?;
    note_not_computed(&emi, &mut warnings);
    note_non_amortising(&emi, &terms, &mut warnings);

    let (yearly_summary, chart_months) = match emi.computed() {
        Some(result) => (
            result.schedule.yearly_summary(),
            result.schedule.first_months(CHART_MONTHS).to_vec(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    let output = HomeLoanOutput {
        emi,
        yearly_summary,
        chart_months,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "tenure_months": terms.tenure_months,
        "financed_principal": terms.financed_principal().to_string(),
        "rounding": "schedule rows to 2 dp; totals to whole units",
    });

    Ok(with_metadata(
        "Home Loan EMI (reducing balance)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Vehicle loan: monthly tenure, processing fee and an optional income check.
pub fn vehicle_loan(
    input: &VehicleLoanInput,
    policy: &LendingPolicy,
) -> CalcResult<ComputationOutput<VehicleLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = LoanTerms {
        principal: input.loan_amount,
        annual_rate_percent: input.annual_rate_percent,
        tenure_months: input.tenure_months,
        down_payment: input.down_payment,
        processing_fee: input.processing_fee,
        first_due_date: None,
    };
    let emi = compute_emi(&terms)?;
    note_not_computed(&emi, &mut warnings);
    note_non_amortising(&emi, &terms, &mut warnings);

    let is_eligible = emi.computed().and_then(|r| {
        advisory::vehicle_affordability(r.monthly_emi, input.monthly_income, &policy.advisory)
    });
    let max_affordable_emi = input
        .monthly_income
        .filter(|i| !i.is_zero())
        .map(|i| round_whole(i * policy.advisory.vehicle_max_emi_ratio));

    if is_eligible == Some(false) {
        warnings.push(format!(
            "EMI exceeds {}% of monthly income; consider a larger down payment or longer tenure.",
            (policy.advisory.vehicle_max_emi_ratio * dec!(100)).normalize()
        ));
    }

    let output = VehicleLoanOutput {
        emi,
        is_eligible,
        max_affordable_emi,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "max_emi_to_income": policy.advisory.vehicle_max_emi_ratio.to_string(),
        "processing_fee": input.processing_fee.unwrap_or(Decimal::ZERO).to_string(),
    });

    Ok(with_metadata(
        "Vehicle Loan EMI with income affordability check",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Product / gadget loan: EMI plus down payment feedback and cost insights.
pub fn product_loan(
    input: &ProductLoanInput,
    policy: &LendingPolicy,
) -> CalcResult<ComputationOutput<ProductLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let terms = LoanTerms {
        principal: input.price,
        annual_rate_percent: input.annual_rate_percent,
        tenure_months: input.tenure_months,
        down_payment: input.down_payment,
        processing_fee: input.processing_fee,
        first_due_date: None,
    };
    let emi = compute_emi(&terms)?;
    note_not_computed(&emi, &mut warnings);

    let down_payment_percentage = match input.down_payment {
        Some(down) if input.price > Decimal::ZERO => Some(down / input.price * dec!(100)),
        _ => None,
    };
    let down_payment_feedback =
        advisory::down_payment_feedback(down_payment_percentage, &policy.advisory);
    let insights = emi
        .computed()
        .map(|r| advisory::smart_emi_insights(input.price, r, &policy.advisory))
        .unwrap_or_default();

    let output = ProductLoanOutput {
        emi,
        down_payment_percentage,
        down_payment_feedback,
        insights,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "product_name": input.product_name,
        "assumed_income_multiple_of_price": policy.advisory.product_assumed_income_multiple.to_string(),
    });

    Ok(with_metadata(
        "Product Loan EMI with down payment and cost insights",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Salary-based eligibility with rate comparison, tips and credit impact.
pub fn salary_loan(
    input: &EligibilityInputs,
    policy: &LendingPolicy,
) -> CalcResult<ComputationOutput<SalaryLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let eligibility = compute_eligibility(input, policy)?;
    if eligibility.emi_capped {
        warnings.push(format!(
            "Desired EMI exceeds {}% of salary; capped at {}.",
            (policy.eligibility.safety_emi_ratio * dec!(100)).normalize(),
            advisory::format_rupees(eligibility.monthly_emi)
        ));
    }

    let comparison = advisory::compare_rates(input, policy)?;
    let tips = advisory::generate_tips(input, &eligibility, policy);
    let credit_impact = advisory::estimate_credit_impact(input, &eligibility, policy);

    let output = SalaryLoanOutput {
        eligibility,
        comparison,
        tips,
        credit_impact,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "safety_emi_ratio": policy.eligibility.safety_emi_ratio.to_string(),
        "comparison_rates": policy
            .eligibility
            .comparison_rates
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>(),
        "down_payment": "informational; not deducted from the eligible amount",
    });

    Ok(with_metadata(
        "Salary-based Loan Eligibility (inverse annuity)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

/// Salary breakup with regime and safe-EMI suggestions.
pub fn salary_breakup(
    input: &SalaryBreakupInput,
    policy: &LendingPolicy,
) -> CalcResult<ComputationOutput<SalaryBreakupOutput>> {
    let start = Instant::now();
    let warnings = vec![
        "Tax figures use simplified illustrative brackets and are not authoritative.".to_string(),
    ];

    let breakup = compute_salary_breakup(input.ctc, input.regime, input.include_pf, policy)?;
    let suggestion = salary_suggestion(input.ctc, &breakup, policy);

    let output = SalaryBreakupOutput {
        breakup,
        suggestion,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "regime": input.regime.label(),
        "include_pf": input.include_pf,
        "pf_monthly_cap": policy.salary.pf_monthly_cap.to_string(),
        "professional_tax_monthly": policy.salary.professional_tax_monthly.to_string(),
        "standard_deduction": policy.salary.standard_deduction.to_string(),
    });

    Ok(with_metadata(
        "Salary Breakup (illustrative tax brackets)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn note_not_computed(outcome: &EmiOutcome, warnings: &mut Vec<String>) {
    if let EmiOutcome::NotComputed { reason } = outcome {
        warnings.push(format!(
            "Inputs do not yet describe a loan ({reason:?}); enter a positive amount, rate and tenure."
        ));
    }
}

fn note_non_amortising(outcome: &EmiOutcome, terms: &LoanTerms, warnings: &mut Vec<String>) {
    if let Some(result) = outcome.computed() {
        let last_balance = result
            .schedule
            .rows()
            .last()
            .map(|r| r.remaining_balance.abs())
            .unwrap_or(Decimal::ZERO);
        // Per-row rounding leaves at most a few paise
        if last_balance > dec!(1) {
            warnings.push(format!(
                "Schedule for {} months does not fully amortise (residual {}).",
                terms.tenure_months, last_balance
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_loan_years_to_months() {
        let input = HomeLoanInput {
            loan_amount: dec!(3_000_000),
            down_payment: Some(dec!(500_000)),
            annual_rate_percent: dec!(8.5),
            tenure_years: 20,
            first_due_date: None,
        };
        let out = home_loan(&input).unwrap();
        let emi = out.result.emi.computed().unwrap();
        assert_eq!(emi.schedule.len(), 240);
        assert_eq!(emi.financed_principal, dec!(2_500_000));
        assert_eq!(out.result.yearly_summary.len(), 20);
        assert_eq!(out.result.chart_months.len(), 12);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_home_loan_not_computed_warns() {
        let input = HomeLoanInput {
            loan_amount: dec!(500_000),
            down_payment: Some(dec!(600_000)),
            annual_rate_percent: dec!(8.5),
            tenure_years: 20,
            first_due_date: None,
        };
        let out = home_loan(&input).unwrap();
        assert!(!out.result.emi.is_computed());
        assert!(out.result.yearly_summary.is_empty());
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_home_loan_tenure_beyond_limit_rejected() {
        let input = HomeLoanInput {
            loan_amount: dec!(500_000),
            down_payment: None,
            annual_rate_percent: dec!(8.5),
            tenure_years: 101,
            first_due_date: None,
        };
        assert!(matches!(
            home_loan(&input).unwrap_err(),
            crate::CalcError::InvalidInput { .. }
        ));
    }

    #[test]
    fn test_vehicle_affordability_verdict() {
        let input = VehicleLoanInput {
            loan_amount: dec!(800_000),
            down_payment: Some(dec!(100_000)),
            annual_rate_percent: dec!(9),
            tenure_months: 60,
            processing_fee: Some(dec!(5000)),
            monthly_income: Some(dec!(25_000)),
        };
        let out = vehicle_loan(&input, &LendingPolicy::default()).unwrap();
        // EMI on 700k at 9% for 60 months ≈ 14,531 > 12,500
        assert_eq!(out.result.is_eligible, Some(false));
        assert_eq!(out.result.max_affordable_emi, Some(dec!(12_500)));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_product_loan_feedback() {
        let input = ProductLoanInput {
            product_name: Some("Smartphone".into()),
            price: dec!(50_000),
            down_payment: Some(dec!(10_000)),
            annual_rate_percent: dec!(12),
            tenure_months: 12,
            processing_fee: Some(dec!(1000)),
        };
        let out = product_loan(&input, &LendingPolicy::default()).unwrap();
        assert_eq!(out.result.down_payment_percentage, Some(dec!(20)));
        assert_eq!(
            out.result.down_payment_feedback.level,
            advisory::DownPaymentLevel::Optimal
        );
        assert_eq!(out.result.insights.len(), 3);
        let emi = out.result.emi.computed().unwrap();
        // 40k at 12% over 12 months ≈ 3,553.95
        assert!((emi.monthly_emi - dec!(3553.95)).abs() < dec!(0.01));
    }

    #[test]
    fn test_salary_loan_capped_warning() {
        let input = EligibilityInputs {
            monthly_salary: dec!(30_000),
            desired_emi: dec!(20_000),
            interest_rate: dec!(11),
            loan_tenure: 3,
            down_payment_percentage: dec!(20),
        };
        let out = salary_loan(&input, &LendingPolicy::default()).unwrap();
        assert_eq!(out.result.eligibility.monthly_emi, dec!(12_000));
        assert_eq!(out.result.comparison.len(), 3);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("₹12,000"));
    }

    #[test]
    fn test_salary_breakup_defaults() {
        let input: SalaryBreakupInput = serde_json::from_str(r#"{ "ctc": 900000 }"#).unwrap();
        assert_eq!(input.regime, TaxRegime::New);
        assert!(input.include_pf);
        let out = salary_breakup(&input, &LendingPolicy::default()).unwrap();
        assert_eq!(out.result.breakup.in_hand_monthly, dec!(70_575));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
