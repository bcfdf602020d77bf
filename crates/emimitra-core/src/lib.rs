pub mod advisory;
pub mod eligibility;
pub mod emi;
pub mod error;
pub mod input;
pub mod policy;
pub mod schedule;
pub mod time_value;
pub mod types;
pub mod validation;

#[cfg(feature = "salary")]
pub mod salary;

#[cfg(feature = "calculators")]
pub mod calculators;

pub use eligibility::{compute_eligibility, EligibilityInputs, EligibilityResult};
pub use emi::{compute_emi, EmiOutcome, EmiResult, LoanTerms};
pub use error::CalcError;
pub use policy::LendingPolicy;
pub use types::*;
pub use validation::{validate_inputs, ValidationErrors};

/// Standard result type for all engine operations
pub type CalcResult<T> = Result<T, CalcError>;
