//! Policy constants shared by every calculator.
//!
//! The reference values live in the `Default` impls. Every struct is
//! `#[serde(default)]`, so a partial YAML/JSON document only overrides the
//! keys it names.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};
use crate::{CalcError, CalcResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendingPolicy {
    pub eligibility: EligibilityPolicy,
    pub advisory: AdvisoryPolicy,
    pub salary: SalaryPolicy,
}

/// Reverse-solver policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityPolicy {
    /// Maximum EMI as a fraction of monthly salary. Fixed at 40%; policy
    /// documents cannot override it.
    #[serde(skip_deserializing)]
    pub safety_emi_ratio: Rate,
    /// Annual rates (percent) used for the what-if comparison.
    pub comparison_rates: Vec<Percent>,
}

/// Thresholds for the deterministic advisory rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryPolicy {
    pub caution_emi_ratio: Rate,
    pub min_down_payment_pct: Percent,
    pub optimal_down_payment_max_pct: Percent,
    pub high_rate_pct: Percent,
    /// Share of salary the alternative-tenure suggestion aims for.
    pub suggested_emi_ratio: Rate,
    pub max_suggested_tenure_years: u32,
    pub credit_negative_ratio: Rate,
    pub credit_moderate_ratio: Rate,
    /// Vehicle loans: EMI must not exceed this share of monthly income.
    pub vehicle_max_emi_ratio: Rate,
    /// Product loans: monthly income is assumed to be price × this multiple.
    pub product_assumed_income_multiple: Decimal,
    pub product_emi_income_ratio: Rate,
    pub product_interest_principal_ratio: Rate,
    pub product_fee_principal_ratio: Rate,
}

/// One slab of a progressive tax table. Income above `above` is taxed at
/// `rate` on top of the fixed `base_tax`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub above: Money,
    pub base_tax: Money,
    pub rate: Rate,
}

/// Illustrative salary and tax constants. Not a compliant tax engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryPolicy {
    pub pf_rate: Rate,
    pub pf_monthly_cap: Money,
    pub professional_tax_monthly: Money,
    /// Deducted from CTC before tax when PF is included.
    pub standard_deduction: Money,
    pub new_regime_brackets: Vec<TaxBracket>,
    pub old_regime_brackets: Vec<TaxBracket>,
    /// Above this CTC the old regime is suggested.
    pub old_regime_hint_ctc: Money,
    pub safe_emi_ratio: Rate,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            eligibility: EligibilityPolicy::default(),
            advisory: AdvisoryPolicy::default(),
            salary: SalaryPolicy::default(),
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            safety_emi_ratio: dec!(0.4),
            comparison_rates: vec![dec!(8), dec!(10), dec!(12)],
        }
    }
}

impl Default for AdvisoryPolicy {
    fn default() -> Self {
        Self {
            caution_emi_ratio: dec!(0.4),
            min_down_payment_pct: dec!(20),
            optimal_down_payment_max_pct: dec!(30),
            high_rate_pct: dec!(12),
            suggested_emi_ratio: dec!(0.3),
            max_suggested_tenure_years: 10,
            credit_negative_ratio: dec!(0.5),
            credit_moderate_ratio: dec!(0.3),
            vehicle_max_emi_ratio: dec!(0.5),
            product_assumed_income_multiple: dec!(2),
            product_emi_income_ratio: dec!(0.3),
            product_interest_principal_ratio: dec!(0.3),
            product_fee_principal_ratio: dec!(0.05),
        }
    }
}

impl Default for SalaryPolicy {
    fn default() -> Self {
        Self {
            pf_rate: dec!(0.12),
            pf_monthly_cap: dec!(1800),
            professional_tax_monthly: dec!(200),
            standard_deduction: dec!(50_000),
            new_regime_brackets: vec![
                bracket(dec!(0), dec!(0), dec!(0)),
                bracket(dec!(700_000), dec!(0), dec!(0.05)),
                bracket(dec!(900_000), dec!(10_000), dec!(0.10)),
                bracket(dec!(1_200_000), dec!(25_000), dec!(0.15)),
            ],
            old_regime_brackets: vec![
                bracket(dec!(0), dec!(0), dec!(0)),
                bracket(dec!(500_000), dec!(0), dec!(0.20)),
                bracket(dec!(1_000_000), dec!(100_000), dec!(0.30)),
            ],
            old_regime_hint_ctc: dec!(1_500_000),
            safe_emi_ratio: dec!(0.4),
        }
    }
}

fn bracket(above: Money, base_tax: Money, rate: Rate) -> TaxBracket {
    TaxBracket {
        above,
        base_tax,
        rate,
    }
}

impl LendingPolicy {
    /// Parse a JSON policy document and validate it.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let policy: LendingPolicy = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Reject policies the calculators cannot work with, e.g. after loading
    /// overrides from a file.
    pub fn validate(&self) -> CalcResult<()> {
        let ratios = [
            ("eligibility.safety_emi_ratio", self.eligibility.safety_emi_ratio),
            ("advisory.suggested_emi_ratio", self.advisory.suggested_emi_ratio),
            ("advisory.vehicle_max_emi_ratio", self.advisory.vehicle_max_emi_ratio),
            ("salary.pf_rate", self.salary.pf_rate),
            ("salary.safe_emi_ratio", self.salary.safe_emi_ratio),
        ];
        for (field, ratio) in ratios {
            if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
                return Err(CalcError::InvalidInput {
                    field: field.into(),
                    reason: "Ratio must be in (0, 1].".into(),
                });
            }
        }

        if self.eligibility.comparison_rates.is_empty() {
            return Err(CalcError::InvalidInput {
                field: "eligibility.comparison_rates".into(),
                reason: "At least one comparison rate is required.".into(),
            });
        }
        if self
            .eligibility
            .comparison_rates
            .iter()
            .any(|r| *r <= Decimal::ZERO)
        {
            return Err(CalcError::InvalidInput {
                field: "eligibility.comparison_rates".into(),
                reason: "Comparison rates must be positive.".into(),
            });
        }

        validate_brackets("salary.new_regime_brackets", &self.salary.new_regime_brackets)?;
        validate_brackets("salary.old_regime_brackets", &self.salary.old_regime_brackets)?;
        Ok(())
    }
}

fn validate_brackets(field: &str, brackets: &[TaxBracket]) -> CalcResult<()> {
    if brackets.is_empty() {
        return Err(CalcError::InvalidInput {
            field: field.into(),
            reason: "Tax table needs at least one bracket.".into(),
        });
    }
    if brackets.windows(2).any(|w| w[1].above <= w[0].above) {
        return Err(CalcError::InvalidInput {
            field: field.into(),
            reason: "Bracket thresholds must be strictly ascending.".into(),
        });
    }
    if brackets
        .iter()
        .any(|b| b.rate < Decimal::ZERO || b.base_tax < Decimal::ZERO)
    {
        return Err(CalcError::InvalidInput {
            field: field.into(),
            reason: "Bracket rates and base amounts cannot be negative.".into(),
        });
    }
    Ok(())
}
