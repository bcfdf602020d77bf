//! Rate comparison and threshold-based advisory messages.
//!
//! Every rule here is a fixed threshold from [`AdvisoryPolicy`]; the output
//! is a pure function of the inputs.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::eligibility::{compute_eligibility, EligibilityInputs, EligibilityResult};
use crate::emi::EmiResult;
use crate::policy::{AdvisoryPolicy, LendingPolicy};
use crate::types::*;
use crate::CalcResult;

/// One rung of the what-if rate ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub interest_rate: Percent,
    pub eligible_loan_amount: Money,
    pub monthly_emi: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    Affordability,
    DownPayment,
    InterestRate,
    Tenure,
    TotalInterest,
    ProcessingFee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub category: TipCategory,
    /// True when the tip flags something to improve.
    pub caution: bool,
    pub message: String,
}

impl Tip {
    fn new(category: TipCategory, caution: bool, message: impl Into<String>) -> Self {
        Self {
            category,
            caution,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditImpact {
    Negative,
    Moderate,
    NeutralOrPositive,
}

impl CreditImpact {
    pub fn message(&self) -> &'static str {
        match self {
            CreditImpact::Negative => {
                "High EMI-to-salary ratio may negatively impact your credit score due to increased debt burden."
            }
            CreditImpact::Moderate => {
                "Moderate EMI-to-salary ratio; maintain timely payments to protect your credit score."
            }
            CreditImpact::NeutralOrPositive => {
                "Low EMI-to-salary ratio, likely to have a positive or neutral impact on your credit score."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditImpactAssessment {
    pub impact: CreditImpact,
    pub emi_to_salary_ratio: Rate,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownPaymentLevel {
    Missing,
    Low,
    Optimal,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownPaymentFeedback {
    pub level: DownPaymentLevel,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Rate comparison
// ---------------------------------------------------------------------------

/// Re-run the eligibility solver at every rate of the policy ladder, keeping
/// all other inputs fixed.
pub fn compare_rates(
    inputs: &EligibilityInputs,
    policy: &LendingPolicy,
) -> CalcResult<Vec<ComparisonRow>> {
    policy
        .eligibility
        .comparison_rates
        .iter()
        .map(|&rate| {
            let candidate = EligibilityInputs {
                interest_rate: rate,
                ..inputs.clone()
            };
            let result = compute_eligibility(&candidate, policy)?;
            Ok(ComparisonRow {
                interest_rate: rate,
                eligible_loan_amount: result.eligible_loan_amount,
                monthly_emi: result.monthly_emi,
                total_interest: result.total_interest,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Salary-based loan advice
// ---------------------------------------------------------------------------

fn emi_to_salary_ratio(inputs: &EligibilityInputs, result: &EligibilityResult) -> Rate {
    if inputs.monthly_salary.is_zero() {
        return Decimal::ZERO;
    }
    result.monthly_emi / inputs.monthly_salary
}

/// Tenure (years) at which the EMI would take the suggested share of salary,
/// if it differs from the current tenure and stays within the policy limit.
pub fn suggested_tenure(
    inputs: &EligibilityInputs,
    result: &EligibilityResult,
    policy: &AdvisoryPolicy,
) -> Option<u32> {
    if inputs.loan_tenure == 0 || result.monthly_emi.is_zero() {
        return None;
    }
    let emi_per_year_of_tenure = result.monthly_emi / Decimal::from(inputs.loan_tenure);
    let years = (inputs.monthly_salary * policy.suggested_emi_ratio / emi_per_year_of_tenure)
        .ceil()
        .to_u32()?;

    (years != inputs.loan_tenure && years <= policy.max_suggested_tenure_years).then_some(years)
}

/// Affordability, down payment, rate and tenure tips for a salary-based loan.
pub fn generate_tips(
    inputs: &EligibilityInputs,
    result: &EligibilityResult,
    policy: &LendingPolicy,
) -> Vec<Tip> {
    let advisory = &policy.advisory;
    let mut tips = Vec::with_capacity(4);

    if emi_to_salary_ratio(inputs, result) > advisory.caution_emi_ratio {
        tips.push(Tip::new(
            TipCategory::Affordability,
            true,
            "Your EMI is high relative to your salary. Consider reducing the loan amount or extending the tenure to lower monthly payments.",
        ));
    } else {
        tips.push(Tip::new(
            TipCategory::Affordability,
            false,
            "Your EMI is within safe financial limits, ensuring comfortable repayment.",
        ));
    }

    if inputs.down_payment_percentage < advisory.min_down_payment_pct {
        tips.push(Tip::new(
            TipCategory::DownPayment,
            true,
            "A higher down payment (20-30%) can reduce your loan amount and total interest paid.",
        ));
    } else {
        tips.push(Tip::new(
            TipCategory::DownPayment,
            false,
            "Your down payment is optimal, minimizing interest costs effectively.",
        ));
    }

    if inputs.interest_rate > advisory.high_rate_pct {
        tips.push(Tip::new(
            TipCategory::InterestRate,
            true,
            "Your interest rate is relatively high. Check your credit score or compare offers from multiple lenders to secure a better rate.",
        ));
    } else {
        tips.push(Tip::new(
            TipCategory::InterestRate,
            false,
            "Your interest rate is competitive, which helps keep your total interest low.",
        ));
    }

    if let Some(years) = suggested_tenure(inputs, result, advisory) {
        tips.push(Tip::new(
            TipCategory::Tenure,
            false,
            format!(
                "Based on your inputs, a tenure of {years} years could optimize your EMI for better affordability."
            ),
        ));
    }

    tips
}

/// Coarse credit-score impact keyed by the EMI-to-salary ratio.
pub fn estimate_credit_impact(
    inputs: &EligibilityInputs,
    result: &EligibilityResult,
    policy: &LendingPolicy,
) -> CreditImpactAssessment {
    let ratio = emi_to_salary_ratio(inputs, result);
    let impact = if ratio > policy.advisory.credit_negative_ratio {
        CreditImpact::Negative
    } else if ratio > policy.advisory.credit_moderate_ratio {
        CreditImpact::Moderate
    } else {
        CreditImpact::NeutralOrPositive
    };
    CreditImpactAssessment {
        impact,
        emi_to_salary_ratio: ratio,
        message: impact.message().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Vehicle and product loans
// ---------------------------------------------------------------------------

/// `Some(true)` when the EMI fits within the policy share of income,
/// `None` when no income was given.
pub fn vehicle_affordability(
    monthly_emi: Money,
    monthly_income: Option<Money>,
    policy: &AdvisoryPolicy,
) -> Option<bool> {
    let income = monthly_income.filter(|i| !i.is_zero())?;
    Some(monthly_emi <= income * policy.vehicle_max_emi_ratio)
}

pub fn down_payment_feedback(
    down_payment_pct: Option<Percent>,
    policy: &AdvisoryPolicy,
) -> DownPaymentFeedback {
    let pct = match down_payment_pct.filter(|p| !p.is_zero()) {
        Some(p) => p,
        None => {
            return DownPaymentFeedback {
                level: DownPaymentLevel::Missing,
                message: "Enter a down payment to see recommendations.".into(),
            }
        }
    };

    let shown = pct.round_dp(1);
    let (level, message) = if pct < policy.min_down_payment_pct {
        (
            DownPaymentLevel::Low,
            format!("Your down payment of {shown}% is low. Increase to 20–30% to improve EMI affordability and reduce interest."),
        )
    } else if pct <= policy.optimal_down_payment_max_pct {
        (
            DownPaymentLevel::Optimal,
            format!("Great choice! Your down payment of {shown}% is optimal, balancing affordability and interest savings."),
        )
    } else {
        (
            DownPaymentLevel::Excellent,
            format!("Excellent! Your down payment of {shown}% significantly lowers EMI and interest, maximizing savings."),
        )
    };
    DownPaymentFeedback { level, message }
}

/// Affordability, interest and fee insights for a product purchase. Income
/// is not asked for on this calculator, so it is assumed from the price.
pub fn smart_emi_insights(price: Money, emi: &EmiResult, policy: &AdvisoryPolicy) -> Vec<Tip> {
    let mut insights = Vec::with_capacity(3);
    let assumed_income = price * policy.product_assumed_income_multiple;
    let principal = emi.financed_principal;

    let emi_text = format_rupees(emi.monthly_emi);
    let emi_to_income = ratio(emi.monthly_emi, assumed_income);
    if emi_to_income > policy.product_emi_income_ratio {
        insights.push(Tip::new(
            TipCategory::Affordability,
            true,
            format!("Your monthly EMI ({emi_text}) may be high relative to estimated income. Consider increasing tenure or down payment."),
        ));
    } else {
        insights.push(Tip::new(
            TipCategory::Affordability,
            false,
            format!("Your monthly EMI ({emi_text}) is within a comfortable range of estimated income."),
        ));
    }

    let interest_text = format_rupees(emi.total_interest);
    if ratio(emi.total_interest, principal) > policy.product_interest_principal_ratio {
        insights.push(Tip::new(
            TipCategory::TotalInterest,
            true,
            format!("High interest ({interest_text}) relative to principal. Shorten tenure to save on interest, if possible."),
        ));
    } else {
        insights.push(Tip::new(
            TipCategory::TotalInterest,
            false,
            format!("Reasonable interest ({interest_text}) for your tenure."),
        ));
    }

    let fee_text = format_rupees(emi.total_processing_fee);
    if ratio(emi.total_processing_fee, principal) > policy.product_fee_principal_ratio {
        insights.push(Tip::new(
            TipCategory::ProcessingFee,
            true,
            format!("Processing fee ({fee_text}) is significant relative to principal. Compare lenders for lower fees."),
        ));
    } else {
        insights.push(Tip::new(
            TipCategory::ProcessingFee,
            false,
            format!("Processing fee ({fee_text}) is reasonable."),
        ));
    }

    insights
}

fn ratio(numerator: Money, denominator: Money) -> Rate {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Whole rupees with Indian digit grouping, e.g. `₹12,34,567`.
pub fn format_rupees(amount: Money) -> String {
    let whole = round_whole(amount);
    let digits = whole.abs().trunc().to_string();
    let sign = if whole.is_sign_negative() && !whole.is_zero() {
        "-"
    } else {
        ""
    };

    if digits.len() <= 3 {
        return format!("{sign}₹{digits}");
    }

    let (head, last3) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{sign}₹{},{last3}", groups.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn inputs() -> EligibilityInputs {
        EligibilityInputs {
            monthly_salary: dec!(30_000),
            desired_emi: dec!(8000),
            interest_rate: dec!(11),
            loan_tenure: 3,
            down_payment_percentage: dec!(20),
        }
    }

    fn result_for(i: &EligibilityInputs) -> EligibilityResult {
        compute_eligibility(i, &LendingPolicy::default()).unwrap()
    }

    #[test]
    fn test_comparison_uses_default_ladder() {
        let rows = compare_rates(&inputs(), &LendingPolicy::default()).unwrap();
        let rates: Vec<_> = rows.iter().map(|r| r.interest_rate).collect();
        assert_eq!(rates, vec![dec!(8), dec!(10), dec!(12)]);
        // Same EMI buys less loan at higher rates
        assert!(rows[0].eligible_loan_amount > rows[1].eligible_loan_amount);
        assert!(rows[1].eligible_loan_amount > rows[2].eligible_loan_amount);
        assert!(rows.iter().all(|r| r.monthly_emi == dec!(8000)));
    }

    #[test]
    fn test_comparison_row_matches_direct_eligibility() {
        let rows = compare_rates(&inputs(), &LendingPolicy::default()).unwrap();
        let mut at_ten = inputs();
        at_ten.interest_rate = dec!(10);
        let direct = result_for(&at_ten);
        assert_eq!(rows[1].eligible_loan_amount, direct.eligible_loan_amount);
        assert_eq!(rows[1].total_interest, direct.total_interest);
    }

    #[test]
    fn test_tips_for_comfortable_loan() {
        let i = inputs();
        let tips = generate_tips(&i, &result_for(&i), &LendingPolicy::default());
        assert!(!tips[0].caution, "EMI 8000 of 30000 is below 40%");
        assert!(!tips[1].caution, "20% down payment is not below 20%");
        assert!(!tips[2].caution, "11% is not above 12%");
    }

    #[test]
    fn test_tips_flag_low_down_payment_and_high_rate() {
        let mut i = inputs();
        i.down_payment_percentage = dec!(10);
        i.interest_rate = dec!(14);
        let tips = generate_tips(&i, &result_for(&i), &LendingPolicy::default());
        assert_eq!(tips[1].category, TipCategory::DownPayment);
        assert!(tips[1].caution);
        assert_eq!(tips[2].category, TipCategory::InterestRate);
        assert!(tips[2].caution);
    }

    #[test]
    fn test_suggested_tenure() {
        // ceil(30000 × 0.3 / (8000 / 3)) = ceil(3.375) = 4
        let i = inputs();
        let r = result_for(&i);
        let policy = LendingPolicy::default();
        assert_eq!(suggested_tenure(&i, &r, &policy.advisory), Some(4));
        let tips = generate_tips(&i, &r, &policy);
        assert_eq!(tips.len(), 4);
        assert!(tips[3].message.contains("4 years"));
    }

    #[test]
    fn test_suggested_tenure_suppressed_above_limit() {
        // ceil(100000 × 0.3 / (500 / 1)) = 60 years
        let i = EligibilityInputs {
            monthly_salary: dec!(100_000),
            desired_emi: dec!(500),
            interest_rate: dec!(10),
            loan_tenure: 1,
            down_payment_percentage: dec!(0),
        };
        let r = result_for(&i);
        assert_eq!(suggested_tenure(&i, &r, &LendingPolicy::default().advisory), None);
        assert_eq!(generate_tips(&i, &r, &LendingPolicy::default()).len(), 3);
    }

    #[test]
    fn test_credit_impact_bands() {
        let policy = LendingPolicy::default();

        let low = inputs();
        let low_impact = estimate_credit_impact(&low, &result_for(&low), &policy);
        // 8000 / 30000 ≈ 0.267
        assert_eq!(low_impact.impact, CreditImpact::NeutralOrPositive);

        let mut capped = inputs();
        capped.desired_emi = dec!(20_000);
        let moderate = estimate_credit_impact(&capped, &result_for(&capped), &policy);
        // capped at 12000 / 30000 = 0.4
        assert_eq!(moderate.impact, CreditImpact::Moderate);
        assert_eq!(moderate.emi_to_salary_ratio, dec!(0.4));
    }

    #[test]
    fn test_credit_impact_negative_with_loose_policy() {
        let mut policy = LendingPolicy::default();
        policy.eligibility.safety_emi_ratio = dec!(0.6);
        let mut i = inputs();
        i.desired_emi = dec!(18_000);
        let r = compute_eligibility(&i, &policy).unwrap();
        assert_eq!(
            estimate_credit_impact(&i, &r, &policy).impact,
            CreditImpact::Negative
        );
    }

    #[test]
    fn test_vehicle_affordability() {
        let policy = AdvisoryPolicy::default();
        assert_eq!(vehicle_affordability(dec!(10_000), None, &policy), None);
        assert_eq!(vehicle_affordability(dec!(10_000), Some(dec!(0)), &policy), None);
        assert_eq!(vehicle_affordability(dec!(10_000), Some(dec!(20_000)), &policy), Some(true));
        assert_eq!(vehicle_affordability(dec!(10_001), Some(dec!(20_000)), &policy), Some(false));
    }

    #[test]
    fn test_down_payment_feedback_levels() {
        let policy = AdvisoryPolicy::default();
        assert_eq!(down_payment_feedback(None, &policy).level, DownPaymentLevel::Missing);
        assert_eq!(
            down_payment_feedback(Some(dec!(12.5)), &policy).level,
            DownPaymentLevel::Low
        );
        assert_eq!(
            down_payment_feedback(Some(dec!(30)), &policy).level,
            DownPaymentLevel::Optimal
        );
        let excellent = down_payment_feedback(Some(dec!(40)), &policy);
        assert_eq!(excellent.level, DownPaymentLevel::Excellent);
        assert!(excellent.message.contains("40%"));
    }

    #[test]
    fn test_format_rupees_indian_grouping() {
        assert_eq!(format_rupees(dec!(999)), "₹999");
        assert_eq!(format_rupees(dec!(3691.4)), "₹3,691");
        assert_eq!(format_rupees(dec!(244359)), "₹2,44,359");
        assert_eq!(format_rupees(dec!(12345678)), "₹1,23,45,678");
        assert_eq!(format_rupees(dec!(-1500)), "-₹1,500");
    }
}
