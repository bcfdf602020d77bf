use napi::Result as NapiResult;
use napi_derive::napi;

use emimitra_core::LendingPolicy;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse an optional policy document; missing keys keep their defaults.
fn policy_from(policy_json: Option<String>) -> NapiResult<LendingPolicy> {
    let Some(json) = policy_json else {
        return Ok(LendingPolicy::default());
    };
    LendingPolicy::from_json(&json).map_err(to_napi_error)
}

#[napi]
pub fn default_policy() -> NapiResult<String> {
    serde_json::to_string(&LendingPolicy::default()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_emi(input_json: String) -> NapiResult<String> {
    let input: emimitra_core::emi::LoanTerms =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emimitra_core::emi::compute_emi(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_eligibility(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::eligibility::EligibilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output = emimitra_core::eligibility::compute_eligibility(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn validate_inputs(input_json: String) -> NapiResult<String> {
    let input: emimitra_core::eligibility::EligibilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let errors = emimitra_core::validation::validate_inputs(&input);
    serde_json::to_string(&errors).map_err(to_napi_error)
}

#[napi]
pub fn compare_rates(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::eligibility::EligibilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output =
        emimitra_core::advisory::compare_rates(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_salary_breakup(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::calculators::SalaryBreakupInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output = emimitra_core::salary::compute_salary_breakup(
        input.ctc,
        input.regime,
        input.include_pf,
        &policy,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Calculator reports
// ---------------------------------------------------------------------------

#[napi]
pub fn home_loan(input_json: String) -> NapiResult<String> {
    let input: emimitra_core::calculators::HomeLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emimitra_core::calculators::home_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn vehicle_loan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::calculators::VehicleLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output =
        emimitra_core::calculators::vehicle_loan(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn product_loan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::calculators::ProductLoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output =
        emimitra_core::calculators::product_loan(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn salary_loan(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::eligibility::EligibilityInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output =
        emimitra_core::calculators::salary_loan(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn salary_breakup(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: emimitra_core::calculators::SalaryBreakupInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy = policy_from(policy_json)?;
    let output =
        emimitra_core::calculators::salary_breakup(&input, &policy).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
