use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::{generate_schedule, AmortizationSchedule};
use crate::time_value;
use crate::types::*;
use crate::{CalcError, CalcResult};

/// Longest tenure accepted by [`compute_emi`]: 100 years.
pub const MAX_TENURE_MONTHS: u32 = 1200;

/// Terms of a forward EMI calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount before any down payment.
    pub principal: Money,
    /// Nominal annual rate in percent, e.g. 8.5.
    pub annual_rate_percent: Percent,
    pub tenure_months: u32,
    /// Paid upfront; reduces the interest-bearing principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    /// Added to the total payable but never to the principal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_fee: Option<Money>,
    /// When set, each schedule row carries its due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_due_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate_percent: Percent, tenure_months: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            tenure_months,
            down_payment: None,
            processing_fee: None,
            first_due_date: None,
        }
    }

    /// Principal after the down payment.
    pub fn financed_principal(&self) -> Money {
        self.principal - self.down_payment.unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiResult {
    /// Rounded to two decimals.
    pub monthly_emi: Money,
    pub financed_principal: Money,
    pub total_interest: Money,
    /// Instalments plus processing fee.
    pub total_amount_payable: Money,
    pub total_processing_fee: Money,
    pub schedule: AmortizationSchedule,
}

/// Why the inputs did not yet describe a computable loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotComputedReason {
    NonPositivePrincipal,
    NonPositiveRate,
    ZeroTenure,
}

/// Forward EMI outcome. `NotComputed` means "insufficient input", never
/// "the loan costs nothing".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmiOutcome {
    NotComputed { reason: NotComputedReason },
    Computed(EmiResult),
}

impl EmiOutcome {
    pub fn is_computed(&self) -> bool {
        matches!(self, EmiOutcome::Computed(_))
    }

    pub fn computed(&self) -> Option<&EmiResult> {
        match self {
            EmiOutcome::Computed(result) => Some(result),
            EmiOutcome::NotComputed { .. } => None,
        }
    }

    pub fn into_computed(self) -> Option<EmiResult> {
        match self {
            EmiOutcome::Computed(result) => Some(result),
            EmiOutcome::NotComputed { .. } => None,
        }
    }
}

/// Compute the EMI, totals and full schedule for a reducing-balance loan.
///
/// Non-positive financed principal or rate, or a zero tenure, yield
/// [`EmiOutcome::NotComputed`]. Negative fees or down payments and tenures
/// above [`MAX_TENURE_MONTHS`] are malformed input and return an error.
pub fn compute_emi(terms: &LoanTerms) -> CalcResult<EmiOutcome> {
    validate_terms(terms)?;

    let principal = terms.financed_principal();
    let rate = time_value::monthly_rate(terms.annual_rate_percent);
    let months = terms.tenure_months;

    let reason = if principal <= Decimal::ZERO {
        Some(NotComputedReason::NonPositivePrincipal)
    } else if rate <= Decimal::ZERO {
        Some(NotComputedReason::NonPositiveRate)
    } else if months == 0 {
        Some(NotComputedReason::ZeroTenure)
    } else {
        None
    };
    if let Some(reason) = reason {
        tracing::debug!(?reason, "EMI not computed");
        return Ok(EmiOutcome::NotComputed { reason });
    }

    let monthly_emi = time_value::emi(principal, rate, months)?;
    let schedule = generate_schedule(principal, rate, monthly_emi, months, terms.first_due_date);

    let processing_fee = terms.processing_fee.unwrap_or(Decimal::ZERO);
    let total_instalments = monthly_emi * Decimal::from(months);
    let total_interest = total_instalments - principal;

    let result = EmiResult {
        monthly_emi: round_paise(monthly_emi),
        financed_principal: principal,
        total_interest: round_whole(total_interest),
        total_amount_payable: round_whole(total_instalments + processing_fee),
        total_processing_fee: round_whole(processing_fee),
        schedule,
    };

    tracing::debug!(
        %principal,
        months,
        monthly_emi = %result.monthly_emi,
        total_interest = %result.total_interest,
        "EMI computed"
    );

    Ok(EmiOutcome::Computed(result))
}

fn validate_terms(terms: &LoanTerms) -> CalcResult<()> {
    if terms.tenure_months > MAX_TENURE_MONTHS {
        return Err(CalcError::InvalidInput {
            field: "tenure_months".into(),
            reason: format!("Tenure cannot exceed {MAX_TENURE_MONTHS} months."),
        });
    }
    if let Some(down) = terms.down_payment {
        if down < Decimal::ZERO {
            return Err(CalcError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot be negative.".into(),
            });
        }
    }
    if let Some(fee) = terms.processing_fee {
        if fee < Decimal::ZERO {
            return Err(CalcError::InvalidInput {
                field: "processing_fee".into(),
                reason: "Processing fee cannot be negative.".into(),
            });
        }
    }
    Ok(())
}
