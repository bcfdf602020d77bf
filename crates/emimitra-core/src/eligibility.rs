use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::LendingPolicy;
use crate::schedule::{generate_schedule, AmortizationSchedule};
use crate::time_value;
use crate::types::*;
use crate::validation::validate_inputs;
use crate::CalcResult;

/// Inputs of the salary-based eligibility calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityInputs {
    pub monthly_salary: Money,
    /// EMI the borrower would like to pay.
    pub desired_emi: Money,
    /// Nominal annual rate in percent.
    pub interest_rate: Percent,
    /// Tenure in years.
    pub loan_tenure: u32,
    pub down_payment_percentage: Percent,
}

impl EligibilityInputs {
    pub fn tenure_months(&self) -> u32 {
        self.loan_tenure * 12
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub eligible_loan_amount: Money,
    /// Informational: a share of the eligible amount, not subtracted from it.
    pub down_payment: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub monthly_emi: Money,
    /// True when the desired EMI exceeded the salary cap and was clamped.
    pub emi_capped: bool,
    pub emi_schedule: AmortizationSchedule,
}

/// EMI actually used for back-solving: the desired EMI, capped at the
/// policy share of monthly salary.
pub fn effective_emi(inputs: &EligibilityInputs, policy: &LendingPolicy) -> Money {
    let max_safe_emi = inputs.monthly_salary * policy.eligibility.safety_emi_ratio;
    inputs.desired_emi.min(max_safe_emi)
}

/// Largest loan the (capped) desired EMI can repay.
///
/// Returns [`crate::CalcError::Validation`] when any input is outside its
/// band; callers that want the nullable form can use `.ok()`.
///
/// The down payment is reported as an extra figure and is deliberately not
/// subtracted from the solved principal.
pub fn compute_eligibility(
    inputs: &EligibilityInputs,
    policy: &LendingPolicy,
) -> CalcResult<EligibilityResult> {
    let errors = validate_inputs(inputs);
    if !errors.is_empty() {
        tracing::debug!(%errors, "eligibility inputs rejected");
        return Err(errors.into());
    }

    let rate = time_value::monthly_rate(inputs.interest_rate);
    let months = inputs.tenure_months();
    let emi = effective_emi(inputs, policy);

    let loan_amount = time_value::principal_for_emi(emi, rate, months)?;
    let total_payable = emi * Decimal::from(months);
    let total_interest = total_payable - loan_amount;
    let down_payment = loan_amount * (inputs.down_payment_percentage / dec!(100));

    let emi_schedule = generate_schedule(loan_amount, rate, emi, months, None);

    let result = EligibilityResult {
        eligible_loan_amount: round_whole(loan_amount),
        down_payment: round_whole(down_payment),
        total_interest: round_whole(total_interest),
        total_payable: round_whole(total_payable),
        monthly_emi: round_whole(emi),
        emi_capped: emi < inputs.desired_emi,
        emi_schedule,
    };

    tracing::debug!(
        eligible_loan_amount = %result.eligible_loan_amount,
        monthly_emi = %result.monthly_emi,
        capped = result.emi_capped,
        "eligibility computed"
    );

    Ok(result)
}
