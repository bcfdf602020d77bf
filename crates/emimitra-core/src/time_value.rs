use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::CalcError;
use crate::types::{Money, Percent, Rate};
use crate::CalcResult;

const MONTHS_PER_YEAR_PERCENT: Decimal = dec!(1200);

/// Convert a nominal annual rate in percent (8.5) to the monthly decimal
/// rate used by the reducing-balance formulas (0.0070833...).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR_PERCENT
}

/// (1 + r)^n
pub fn compound_factor(rate: Rate, nper: u32) -> CalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| CalcError::Overflow {
            context: format!("compounding {rate} over {nper} periods"),
        })
}

/// Equated monthly instalment for a reducing-balance loan:
/// `P × r × (1+r)^n / ((1+r)^n − 1)`.
pub fn emi(principal: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    check_rate_and_periods(rate, nper)?;

    let factor = compound_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(CalcError::InvalidInput {
            field: "rate".into(),
            reason: "Rate too small to amortise over the given periods".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| CalcError::Overflow {
            context: "EMI numerator".into(),
        })
}

/// Principal that a fixed instalment repays over `nper` periods:
/// `EMI × ((1+r)^n − 1) / (r × (1+r)^n)`. The algebraic inverse of [`emi`].
pub fn principal_for_emi(instalment: Money, rate: Rate, nper: u32) -> CalcResult<Money> {
    check_rate_and_periods(rate, nper)?;

    let factor = compound_factor(rate, nper)?;
    let denominator = rate * factor;
    if denominator.is_zero() {
        return Err(CalcError::InvalidInput {
            field: "rate".into(),
            reason: "Rate too small to discount the instalment".into(),
        });
    }

    instalment
        .checked_mul(factor - Decimal::ONE)
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| CalcError::Overflow {
            context: "present value of instalments".into(),
        })
}

fn check_rate_and_periods(rate: Rate, nper: u32) -> CalcResult<()> {
    if rate <= Decimal::ZERO {
        return Err(CalcError::InvalidInput {
            field: "rate".into(),
            reason: "Monthly rate must be > 0".into(),
        });
    }
    if nper == 0 {
        return Err(CalcError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
    }

    #[test]
    fn test_emi_known_answer() {
        // 800k at 7% over 36 months ≈ 24,701.68
        let result = emi(dec!(800_000), monthly_rate(dec!(7)), 36).unwrap();
        assert!((result - dec!(24701.68)).abs() < dec!(0.01));
    }

    #[test]
    fn test_single_period_emi_is_principal_plus_interest() {
        let result = emi(dec!(1000), dec!(0.01), 1).unwrap();
        assert!((result - dec!(1010)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_principal_for_emi_inverts_emi() {
        let r = monthly_rate(dec!(11));
        let instalment = emi(dec!(250_000), r, 36).unwrap();
        let principal = principal_for_emi(instalment, r, 36).unwrap();
        assert!((principal - dec!(250_000)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_zero_rate_rejected() {
        let err = emi(dec!(1000), Decimal::ZERO, 12).unwrap_err();
        match err {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_periods_rejected() {
        assert!(principal_for_emi(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_emi_quotient_overflow_is_typed_error() {
        // Numerator fits, the quotient exceeds Decimal::MAX
        let err = emi(dec!(78000000000000000000000000000), monthly_rate(dec!(20)), 1).unwrap_err();
        assert!(matches!(err, CalcError::Overflow { .. }));
    }

    #[test]
    fn test_present_value_overflow_is_typed_error() {
        let err = principal_for_emi(dec!(70000000000000000000000000000), dec!(0.0001), 2)
            .unwrap_err();
        assert!(matches!(err, CalcError::Overflow { .. }));
    }
}
