use clap::Args;
use serde_json::Value;

use emimitra_core::advisory;
use emimitra_core::calculators;
use emimitra_core::input::RawEligibilityInputs;
use emimitra_core::{validate_inputs, EligibilityInputs, LendingPolicy};

use crate::input::{self, required};

/// Arguments shared by the salary-based commands
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EligibilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly salary
    #[arg(long)]
    pub salary: Option<String>,

    /// EMI you would like to pay each month
    #[arg(long)]
    pub desired_emi: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Tenure in years
    #[arg(long)]
    pub years: Option<String>,

    /// Down payment as a percentage of the loan
    #[arg(long)]
    pub down_payment_pct: Option<String>,
}

fn eligibility_inputs(args: EligibilityArgs) -> Result<EligibilityInputs, Box<dyn std::error::Error>> {
    if let Some(inputs) = input::read_input(args.input.as_deref())? {
        return Ok(inputs);
    }
    let raw = RawEligibilityInputs {
        monthly_salary: required(args.salary, "salary")?,
        desired_emi: required(args.desired_emi, "desired-emi")?,
        interest_rate: required(args.rate, "rate")?,
        loan_tenure: required(args.years, "years")?,
        down_payment_percentage: args.down_payment_pct.unwrap_or_default(),
    };
    Ok(EligibilityInputs::try_from(&raw)?)
}

pub fn run_eligibility(
    args: EligibilityArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = eligibility_inputs(args)?;
    let result = calculators::salary_loan(&inputs, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: EligibilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = eligibility_inputs(args)?;
    let errors = validate_inputs(&inputs);
    Ok(serde_json::json!({
        "result": {
            "valid": errors.is_empty(),
            "errors": errors,
        }
    }))
}

pub fn run_compare_rates(
    args: EligibilityArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = eligibility_inputs(args)?;
    let rows = advisory::compare_rates(&inputs, policy)?;
    Ok(serde_json::to_value(rows)?)
}
