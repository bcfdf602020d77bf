use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::eligibility::EligibilityInputs;
use crate::types::{Money, Percent};

pub const MIN_MONTHLY_SALARY: Money = dec!(1000);
pub const MIN_INTEREST_RATE: Percent = dec!(1);
pub const MAX_INTEREST_RATE: Percent = dec!(20);
pub const MIN_DESIRED_EMI: Money = dec!(500);
pub const MIN_TENURE_YEARS: u32 = 1;
pub const MAX_TENURE_YEARS: u32 = 10;
pub const MAX_DOWN_PAYMENT_PCT: Percent = dec!(50);

/// Field names used as keys in [`ValidationErrors`].
pub mod field {
    pub const MONTHLY_SALARY: &str = "monthly_salary";
    pub const INTEREST_RATE: &str = "interest_rate";
    pub const DESIRED_EMI: &str = "desired_emi";
    pub const LOAN_TENURE: &str = "loan_tenure";
    pub const DOWN_PAYMENT_PERCENTAGE: &str = "down_payment_percentage";
}

/// Field name → user-facing message. Empty means the inputs are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Check salary-based eligibility inputs against their accepted bands.
pub fn validate_inputs(inputs: &EligibilityInputs) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if inputs.monthly_salary < MIN_MONTHLY_SALARY {
        errors.insert(field::MONTHLY_SALARY, "Salary must be at least ₹1,000.");
    }
    if inputs.interest_rate < MIN_INTEREST_RATE || inputs.interest_rate > MAX_INTEREST_RATE {
        errors.insert(
            field::INTEREST_RATE,
            "Interest rate must be between 1% and 20%.",
        );
    }
    if inputs.desired_emi < MIN_DESIRED_EMI {
        errors.insert(field::DESIRED_EMI, "EMI must be at least ₹500.");
    }
    if !(MIN_TENURE_YEARS..=MAX_TENURE_YEARS).contains(&inputs.loan_tenure) {
        errors.insert(
            field::LOAN_TENURE,
            "Tenure must be between 1 and 10 years.",
        );
    }
    if inputs.down_payment_percentage < Decimal::ZERO
        || inputs.down_payment_percentage > MAX_DOWN_PAYMENT_PCT
    {
        errors.insert(
            field::DOWN_PAYMENT_PERCENTAGE,
            "Down payment must be between 0% and 50%.",
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> EligibilityInputs {
        EligibilityInputs {
            monthly_salary: dec!(30_000),
            interest_rate: dec!(11),
            desired_emi: dec!(8000),
            loan_tenure: 3,
            down_payment_percentage: dec!(20),
        }
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_inputs(&defaults()).is_empty());
    }

    #[test]
    fn test_low_salary_rejected() {
        let mut inputs = defaults();
        inputs.monthly_salary = dec!(500);
        let errors = validate_inputs(&inputs);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(field::MONTHLY_SALARY),
            Some("Salary must be at least ₹1,000.")
        );
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let inputs = EligibilityInputs {
            monthly_salary: dec!(1000),
            interest_rate: dec!(20),
            desired_emi: dec!(500),
            loan_tenure: 10,
            down_payment_percentage: dec!(50),
        };
        assert!(validate_inputs(&inputs).is_empty());
    }

    #[test]
    fn test_every_field_reported() {
        let inputs = EligibilityInputs {
            monthly_salary: dec!(0),
            interest_rate: dec!(25),
            desired_emi: dec!(100),
            loan_tenure: 0,
            down_payment_percentage: dec!(-1),
        };
        let errors = validate_inputs(&inputs);
        assert_eq!(errors.len(), 5);
        for f in [
            field::MONTHLY_SALARY,
            field::INTEREST_RATE,
            field::DESIRED_EMI,
            field::LOAN_TENURE,
            field::DOWN_PAYMENT_PERCENTAGE,
        ] {
            assert!(errors.contains(f), "missing {f}");
        }
    }

    #[test]
    fn test_display_joins_messages() {
        let mut inputs = defaults();
        inputs.loan_tenure = 11;
        let text = validate_inputs(&inputs).to_string();
        assert_eq!(text, "loan_tenure: Tenure must be between 1 and 10 years.");
    }
}
