use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{round_paise, Money, Rate};

const MONTHS_PER_YEAR: usize = 12;

/// One month of a reducing-balance repayment plan. Monetary fields are
/// rounded to two decimals independently of each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub emi: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
}

/// Principal and interest repaid in one loan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

/// Fully materialised month-by-month schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmortizationSchedule {
    rows: Vec<ScheduleRow>,
}

impl AmortizationSchedule {
    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScheduleRow> {
        self.rows.iter()
    }

    /// Display prefix, e.g. the first twelve months the charts plot.
    pub fn first_months(&self, count: usize) -> &[ScheduleRow] {
        &self.rows[..count.min(self.rows.len())]
    }

    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_component).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest_component).sum()
    }

    /// Fold the rows into loan years. A trailing partial year is kept.
    pub fn yearly_summary(&self) -> Vec<YearSummary> {
        self.rows
            .chunks(MONTHS_PER_YEAR)
            .enumerate()
            .map(|(i, chunk)| YearSummary {
                year: i as u32 + 1,
                principal_paid: chunk.iter().map(|r| r.principal_component).sum(),
                interest_paid: chunk.iter().map(|r| r.interest_component).sum(),
                closing_balance: chunk
                    .last()
                    .map(|r| r.remaining_balance)
                    .unwrap_or(Decimal::ZERO),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a AmortizationSchedule {
    type Item = &'a ScheduleRow;
    type IntoIter = std::slice::Iter<'a, ScheduleRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Does `emi` at least pay the first month's interest? When it does not, the
/// balance grows every month and the schedule never converges.
pub fn covers_interest(principal: Money, monthly_rate: Rate, emi: Money) -> bool {
    emi > principal * monthly_rate
}

/// Build the month-by-month schedule for a fixed instalment.
///
/// Always produces exactly `months` rows. Termination is by count, not by
/// balance, so an instalment below the interest-only payment yields a rising
/// balance rather than an error; check [`covers_interest`] first if that
/// matters to the caller.
pub fn generate_schedule(
    principal: Money,
    monthly_rate: Rate,
    emi: Money,
    months: u32,
    first_due_date: Option<NaiveDate>,
) -> AmortizationSchedule {
    if !covers_interest(principal, monthly_rate, emi) {
        tracing::warn!(
            %principal,
            %emi,
            "instalment does not cover monthly interest; balance will grow"
        );
    }

    let mut rows = Vec::with_capacity(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = balance * monthly_rate;
        let principal_component = emi - interest;
        balance -= principal_component;

        let due_date = first_due_date.and_then(|d| d.checked_add_months(Months::new(month - 1)));

        rows.push(ScheduleRow {
            month,
            due_date,
            emi: round_paise(emi),
            principal_component: round_paise(principal_component),
            interest_component: round_paise(interest),
            remaining_balance: normalise_zero(round_paise(balance)),
        });
    }

    AmortizationSchedule { rows }
}

// Rounding a tiny negative residual would otherwise print as "-0.00".
fn normalise_zero(value: Money) -> Money {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}
