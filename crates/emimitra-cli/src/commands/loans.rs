use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;
use std::time::Instant;

use emimitra_core::calculators::{self, HomeLoanInput, ProductLoanInput, VehicleLoanInput};
use emimitra_core::emi::{compute_emi, EmiOutcome, LoanTerms};
use emimitra_core::input::{parse_count, parse_money, parse_optional_money, parse_percent, RawLoanTerms};
use emimitra_core::types::with_metadata;
use emimitra_core::LendingPolicy;

use crate::input::{self, required};

/// Arguments for a plain EMI calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount before down payment, e.g. 8,00,000
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent, e.g. 8.5
    #[arg(long, alias = "annual-rate")]
    pub rate: Option<String>,

    /// Tenure in months
    #[arg(long, alias = "tenure")]
    pub months: Option<String>,

    /// Down payment, deducted from the principal
    #[arg(long)]
    pub down_payment: Option<String>,

    /// One-off processing fee, added to the total payable
    #[arg(long)]
    pub processing_fee: Option<String>,

    /// Due date of the first instalment (YYYY-MM-DD)
    #[arg(long)]
    pub first_due_date: Option<NaiveDate>,
}

/// Arguments for the home loan report
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct HomeLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount before down payment
    #[arg(long)]
    pub loan_amount: Option<String>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Tenure in years
    #[arg(long)]
    pub years: Option<String>,

    /// Due date of the first instalment (YYYY-MM-DD)
    #[arg(long)]
    pub first_due_date: Option<NaiveDate>,
}

/// Arguments for the vehicle loan report
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct VehicleLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price or loan amount before down payment
    #[arg(long)]
    pub loan_amount: Option<String>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Tenure in months
    #[arg(long)]
    pub months: Option<String>,

    /// Processing fee
    #[arg(long)]
    pub processing_fee: Option<String>,

    /// Monthly income, enables the affordability check
    #[arg(long)]
    pub monthly_income: Option<String>,
}

/// Arguments for the product loan report
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ProductLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Product name, echoed in the assumptions
    #[arg(long)]
    pub product: Option<String>,

    /// Product price
    #[arg(long)]
    pub price: Option<String>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<String>,

    /// Tenure in months
    #[arg(long)]
    pub months: Option<String>,

    /// Processing fee
    #[arg(long)]
    pub processing_fee: Option<String>,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = match input::read_input(args.input.as_deref())? {
        Some(terms) => terms,
        None => {
            let raw = RawLoanTerms {
                principal: required(args.principal, "principal")?,
                annual_rate_percent: required(args.rate, "rate")?,
                tenure_months: required(args.months, "months")?,
                down_payment: args.down_payment.unwrap_or_default(),
                processing_fee: args.processing_fee.unwrap_or_default(),
            };
            let mut terms = LoanTerms::try_from(&raw)?;
            terms.first_due_date = args.first_due_date;
            terms
        }
    };

    let start = Instant::now();
    let outcome = compute_emi(&terms)?;
    let mut warnings = Vec::new();
    if let EmiOutcome::NotComputed { reason } = &outcome {
        warnings.push(format!(
            "EMI not computed ({reason:?}); principal, rate and tenure must all be positive."
        ));
    }
    let elapsed = start.elapsed().as_micros() as u64;

    let assumptions = serde_json::json!({
        "method": "reducing balance, monthly compounding",
        "financed_principal": terms.financed_principal().to_string(),
    });
    let output = with_metadata(
        "Equated Monthly Instalment",
        &assumptions,
        warnings,
        elapsed,
        outcome,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_home_loan(args: HomeLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let home_input: HomeLoanInput = match input::read_input(args.input.as_deref())? {
        Some(home_input) => home_input,
        None => HomeLoanInput {
            loan_amount: parse_money("loan_amount", &required(args.loan_amount, "loan-amount")?)?,
            down_payment: parse_optional_money(
                "down_payment",
                &args.down_payment.unwrap_or_default(),
            )?,
            annual_rate_percent: parse_percent("rate", &required(args.rate, "rate")?)?,
            tenure_years: parse_count("years", &required(args.years, "years")?)?,
            first_due_date: args.first_due_date,
        },
    };
    let result = calculators::home_loan(&home_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_vehicle_loan(
    args: VehicleLoanArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let vehicle_input: VehicleLoanInput = match input::read_input(args.input.as_deref())? {
        Some(vehicle_input) => vehicle_input,
        None => VehicleLoanInput {
            loan_amount: parse_money("loan_amount", &required(args.loan_amount, "loan-amount")?)?,
            down_payment: parse_optional_money(
                "down_payment",
                &args.down_payment.unwrap_or_default(),
            )?,
            annual_rate_percent: parse_percent("rate", &required(args.rate, "rate")?)?,
            tenure_months: parse_count("months", &required(args.months, "months")?)?,
            processing_fee: parse_optional_money(
                "processing_fee",
                &args.processing_fee.unwrap_or_default(),
            )?,
            monthly_income: parse_optional_money(
                "monthly_income",
                &args.monthly_income.unwrap_or_default(),
            )?,
        },
    };
    let result = calculators::vehicle_loan(&vehicle_input, policy)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_product_loan(
    args: ProductLoanArgs,
    policy: &LendingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let product_input: ProductLoanInput = match input::read_input(args.input.as_deref())? {
        Some(product_input) => product_input,
        None => ProductLoanInput {
            product_name: args.product,
            price: parse_money("price", &required(args.price, "price")?)?,
            down_payment: parse_optional_money(
                "down_payment",
                &args.down_payment.unwrap_or_default(),
            )?,
            annual_rate_percent: parse_percent("rate", &required(args.rate, "rate")?)?,
            tenure_months: parse_count("months", &required(args.months, "months")?)?,
            processing_fee: parse_optional_money(
                "processing_fee",
                &args.processing_fee.unwrap_or_default(),
            )?,
        },
    };
    let result = calculators::product_loan(&product_input, policy)?;
    Ok(serde_json::to_value(result)?)
}
