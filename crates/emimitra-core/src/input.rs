//! Parse-or-reject conversion of raw form strings into typed inputs.
//!
//! Unparseable text is an error, never a silent zero. Optional fields
//! treat blank text as absent.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::eligibility::EligibilityInputs;
use crate::emi::LoanTerms;
use crate::types::{Money, Percent};
use crate::{CalcError, CalcResult};

fn clean(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('₹')
        .or_else(|| trimmed.strip_prefix("Rs."))
        .or_else(|| trimmed.strip_prefix("Rs"))
        .unwrap_or(trimmed);
    trimmed
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect()
}

fn parse_error(field: &str, raw: &str) -> CalcError {
    CalcError::Parse {
        field: field.to_string(),
        value: raw.to_string(),
    }
}

/// Parse an amount such as `"8,00,000"`, `"₹ 50_000"` or `"1200.50"`.
pub fn parse_money(field: &str, raw: &str) -> CalcResult<Money> {
    let cleaned = clean(raw);
    if cleaned.is_empty() {
        return Err(parse_error(field, raw));
    }
    Decimal::from_str(&cleaned).map_err(|_| parse_error(field, raw))
}

/// Like [`parse_money`], but blank input means "not given".
pub fn parse_optional_money(field: &str, raw: &str) -> CalcResult<Option<Money>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_money(field, raw).map(Some)
}

/// Parse a percentage such as `"8.5"` or `"8.5%"`.
pub fn parse_percent(field: &str, raw: &str) -> CalcResult<Percent> {
    let trimmed = raw.trim();
    let without_sign = trimmed.strip_suffix('%').unwrap_or(trimmed);
    parse_money(field, without_sign).map_err(|_| parse_error(field, raw))
}

/// Parse a whole, non-negative count such as a tenure. `"36.0"` is accepted,
/// `"36.5"` is not.
pub fn parse_count(field: &str, raw: &str) -> CalcResult<u32> {
    let value = parse_money(field, raw)?;
    if value.fract() != Decimal::ZERO {
        return Err(parse_error(field, raw));
    }
    value.to_u32().ok_or_else(|| parse_error(field, raw))
}

/// Forward-calculator form fields as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLoanTerms {
    pub principal: String,
    pub annual_rate_percent: String,
    pub tenure_months: String,
    pub down_payment: String,
    pub processing_fee: String,
}

impl TryFrom<&RawLoanTerms> for LoanTerms {
    type Error = CalcError;

    fn try_from(raw: &RawLoanTerms) -> CalcResult<Self> {
        Ok(LoanTerms {
            principal: parse_money("principal", &raw.principal)?,
            annual_rate_percent: parse_percent("annual_rate_percent", &raw.annual_rate_percent)?,
            tenure_months: parse_count("tenure_months", &raw.tenure_months)?,
            down_payment: parse_optional_money("down_payment", &raw.down_payment)?,
            processing_fee: parse_optional_money("processing_fee", &raw.processing_fee)?,
            first_due_date: None,
        })
    }
}

/// Salary-based calculator form fields as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEligibilityInputs {
    pub monthly_salary: String,
    pub desired_emi: String,
    pub interest_rate: String,
    pub loan_tenure: String,
    pub down_payment_percentage: String,
}

impl TryFrom<&RawEligibilityInputs> for EligibilityInputs {
    type Error = CalcError;

    fn try_from(raw: &RawEligibilityInputs) -> CalcResult<Self> {
        let down_payment_percentage =
            parse_optional_money("down_payment_percentage", &raw.down_payment_percentage)?
                .unwrap_or(Decimal::ZERO);
        Ok(EligibilityInputs {
            monthly_salary: parse_money("monthly_salary", &raw.monthly_salary)?,
            desired_emi: parse_money("desired_emi", &raw.desired_emi)?,
            interest_rate: parse_percent("interest_rate", &raw.interest_rate)?,
            loan_tenure: parse_count("loan_tenure", &raw.loan_tenure)?,
            down_payment_percentage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grouped_amounts() {
        assert_eq!(parse_money("p", "8,00,000").unwrap(), dec!(800_000));
        assert_eq!(parse_money("p", " ₹ 50_000 ").unwrap(), dec!(50_000));
        assert_eq!(parse_money("p", "Rs. 1200.50").unwrap(), dec!(1200.50));
    }

    #[test]
    fn test_garbage_is_an_error_not_zero() {
        match parse_money("principal", "abc").unwrap_err() {
            CalcError::Parse { field, value } => {
                assert_eq!(field, "principal");
                assert_eq!(value, "abc");
            }
            other => panic!("Expected Parse, got {other:?}"),
        }
        assert!(parse_money("principal", "   ").is_err());
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(parse_optional_money("fee", "").unwrap(), None);
        assert_eq!(parse_optional_money("fee", "1000").unwrap(), Some(dec!(1000)));
        assert!(parse_optional_money("fee", "ten").is_err());
    }

    #[test]
    fn test_percent_suffix() {
        assert_eq!(parse_percent("rate", "8.5%").unwrap(), dec!(8.5));
        assert_eq!(parse_percent("rate", "7").unwrap(), dec!(7));
    }

    #[test]
    fn test_count_must_be_whole() {
        assert_eq!(parse_count("tenure", "36").unwrap(), 36);
        assert_eq!(parse_count("tenure", "36.0").unwrap(), 36);
        assert!(parse_count("tenure", "36.5").is_err());
        assert!(parse_count("tenure", "-3").is_err());
    }

    #[test]
    fn test_raw_loan_terms() {
        let raw = RawLoanTerms {
            principal: "10,00,000".into(),
            annual_rate_percent: "7%".into(),
            tenure_months: "36".into(),
            down_payment: "2,00,000".into(),
            processing_fee: "".into(),
        };
        let terms = LoanTerms::try_from(&raw).unwrap();
        assert_eq!(terms.financed_principal(), dec!(800_000));
        assert_eq!(terms.processing_fee, None);
    }

    #[test]
    fn test_raw_eligibility_reports_bad_field() {
        let raw = RawEligibilityInputs {
            monthly_salary: "30000".into(),
            desired_emi: "8k".into(),
            interest_rate: "11".into(),
            loan_tenure: "3".into(),
            down_payment_percentage: "".into(),
        };
        match EligibilityInputs::try_from(&raw).unwrap_err() {
            CalcError::Parse { field, .. } => assert_eq!(field, "desired_emi"),
            other => panic!("Expected Parse, got {other:?}"),
        }
    }
}
