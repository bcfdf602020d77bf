//! Salary breakup and simplified income-tax estimate.
//!
//! The bracket tables are illustrative constants, not a compliant tax
//! engine. Each bracket carries its own base amount so tables need not be
//! continuous at the thresholds.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::{LendingPolicy, SalaryPolicy, TaxBracket};
use crate::types::*;
use crate::{CalcError, CalcResult};

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    #[default]
    New,
    Old,
}

impl TaxRegime {
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::New => "New",
            TaxRegime::Old => "Old",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryBreakup {
    pub gross_monthly: Money,
    pub in_hand_monthly: Money,
    pub annual_tax: Money,
    pub monthly_tax: Money,
    /// Employee PF contribution per month.
    pub pf_contribution: Money,
    pub employer_pf: Money,
    pub professional_tax: Money,
    pub annual_taxable_income: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySuggestion {
    pub preferred_regime: TaxRegime,
    pub regime_hint: String,
    /// Highest EMI that keeps repayments comfortable on this in-hand pay.
    pub safe_emi_ceiling: Money,
    pub emi_hint: String,
}

/// Tax on `taxable` income under a bracket table. Income at or below the
/// first threshold above zero pays the first bracket's base.
pub fn tax_for_income(taxable: Money, brackets: &[TaxBracket]) -> Money {
    if taxable <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    brackets
        .iter()
        .rev()
        .find(|b| taxable > b.above)
        .or_else(|| brackets.first())
        .map(|b| b.base_tax + (taxable - b.above).max(Decimal::ZERO) * b.rate)
        .unwrap_or(Decimal::ZERO)
}

fn brackets_for(regime: TaxRegime, policy: &SalaryPolicy) -> &[TaxBracket] {
    match regime {
        TaxRegime::New => &policy.new_regime_brackets,
        TaxRegime::Old => &policy.old_regime_brackets,
    }
}

/// Gross, in-hand and tax figures for an annual CTC.
pub fn compute_salary_breakup(
    ctc: Money,
    regime: TaxRegime,
    include_pf: bool,
    policy: &LendingPolicy,
) -> CalcResult<SalaryBreakup> {
    if ctc <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "ctc".into(),
            reason: "Annual CTC must be positive.".into(),
        });
    }
    let sp = &policy.salary;

    let monthly_ctc = ctc / MONTHS_PER_YEAR;
    let pf_contribution = if include_pf {
        (monthly_ctc * sp.pf_rate).min(sp.pf_monthly_cap)
    } else {
        Decimal::ZERO
    };
    let employer_pf = pf_contribution;
    let gross_monthly = monthly_ctc - employer_pf;

    let annual_taxable = if include_pf {
        ctc - sp.standard_deduction
    } else {
        ctc
    };
    let annual_tax = tax_for_income(annual_taxable, brackets_for(regime, sp));
    let monthly_tax = annual_tax / MONTHS_PER_YEAR;

    let in_hand_monthly =
        gross_monthly - pf_contribution - sp.professional_tax_monthly - monthly_tax;

    tracing::debug!(%ctc, ?regime, include_pf, %annual_tax, "salary breakup computed");

    Ok(SalaryBreakup {
        gross_monthly: round_whole(gross_monthly),
        in_hand_monthly: round_whole(in_hand_monthly),
        annual_tax: round_whole(annual_tax),
        monthly_tax: round_whole(monthly_tax),
        pf_contribution: round_whole(pf_contribution),
        employer_pf: round_whole(employer_pf),
        professional_tax: round_whole(sp.professional_tax_monthly),
        annual_taxable_income: round_whole(annual_taxable.max(Decimal::ZERO)),
    })
}

/// Regime hint and safe-EMI ceiling shown next to the breakup.
pub fn salary_suggestion(
    ctc: Money,
    breakup: &SalaryBreakup,
    policy: &LendingPolicy,
) -> SalarySuggestion {
    let sp = &policy.salary;
    let (preferred_regime, regime_hint) = if ctc > sp.old_regime_hint_ctc {
        (
            TaxRegime::Old,
            "Consider Old Regime if you have significant deductions (e.g., HRA, 80C).",
        )
    } else {
        (
            TaxRegime::New,
            "New Regime is likely better for simplicity and lower rates.",
        )
    };
    let safe_emi_ceiling = round_whole(breakup.in_hand_monthly * sp.safe_emi_ratio);

    SalarySuggestion {
        preferred_regime,
        regime_hint: regime_hint.to_string(),
        safe_emi_ceiling,
        emi_hint: format!(
            "Keep EMI below {}/month for financial stability.",
            crate::advisory::format_rupees(safe_emi_ceiling)
        ),
    }
}
