//! Level-payment arithmetic for fixed-rate, monthly-pay loans.
//!
//! Covers:
//! 1. **Rate and term conversion** -- annual percent to monthly decimal rate,
//!    years to a whole number of monthly payments.
//! 2. **Monthly payment** -- closed-form annuity formula with a straight-line
//!    branch for zero-rate loans.
//! 3. **Totals** -- total amount paid and total interest over the full term.
//! 4. **Loan summary** -- the headline figures wrapped in the standard envelope.
//!
//! All arithmetic uses `rust_decimal::Decimal`. No `f64`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizationError;
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Percent, Rate, Years};
use crate::AmortizationResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Longest supported schedule: 100 years of monthly payments.
pub const MAX_PAYMENTS: u32 = 1200;

/// Annual rate above which a summary carries a warning.
const HIGH_RATE_PERCENT: Decimal = dec!(30);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Headline figures for a fixed-rate loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    pub number_of_payments: u32,
    /// Monthly decimal rate applied to the outstanding balance.
    pub monthly_rate: Rate,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert a nominal annual percentage (5.5 = 5.5%) into a monthly decimal rate.
pub fn monthly_rate(annual_interest_rate_percent: Percent) -> Rate {
    annual_interest_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Number of monthly payments in a term of `term_years`.
pub fn payment_count(term_years: Years) -> AmortizationResult<u32> {
    let months = term_years * MONTHS_PER_YEAR;
    if months <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term must be greater than zero".into(),
        });
    }
    if !months.fract().is_zero() {
        return Err(AmortizationError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Loan term of {term_years} years is not a whole number of months"),
        });
    }
    if months > Decimal::from(MAX_PAYMENTS) {
        return Err(AmortizationError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Loan term cannot exceed {MAX_PAYMENTS} monthly payments"),
        });
    }
    months.to_u32().ok_or_else(|| AmortizationError::InvalidInput {
        field: "term_years".into(),
        reason: "Loan term is out of range".into(),
    })
}

/// (1 + rate)^periods by repeated multiplication.
/// Returns `None` once the factor no longer fits in a Decimal.
pub(crate) fn compound_factor(rate: Rate, periods: u32) -> Option<Decimal> {
    let base = Decimal::ONE + rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor.checked_mul(base)?;
    }
    Some(factor)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly payment that retires `loan_amount` over `term_years`.
///
/// `payment = L * r * (1+r)^n / ((1+r)^n - 1)`, evaluated as
/// `L * r / (1 - (1+r)^-n)`. A zero rate gives `L / n` exactly.
pub fn monthly_payment(
    loan_amount: Money,
    annual_interest_rate_percent: Percent,
    term_years: Years,
) -> AmortizationResult<Money> {
    let n = payment_count(term_years)?;
    let r = monthly_rate(annual_interest_rate_percent);

    if r.is_zero() {
        return Ok(loan_amount / Decimal::from(n));
    }

    // An overflowing growth factor means (1+r)^-n has vanished: interest-only limit.
    let discount = match compound_factor(r, n) {
        Some(factor) if factor.is_zero() => {
            return Err(AmortizationError::DivisionByZero {
                context: "monthly payment growth factor".into(),
            });
        }
        Some(factor) => Decimal::ONE / factor,
        None => Decimal::ZERO,
    };

    let annuity_denominator = Decimal::ONE - discount;
    if annuity_denominator.is_zero() {
        return Err(AmortizationError::DivisionByZero {
            context: "monthly payment annuity factor".into(),
        });
    }

    loan_amount
        .checked_mul(r)
        .and_then(|interest| interest.checked_div(annuity_denominator))
        .ok_or_else(|| overflow("monthly payment"))
}

/// Everything paid over the full term. No validation beyond overflow.
pub fn total_payment(monthly_payment: Money, term_years: Years) -> AmortizationResult<Money> {
    monthly_payment
        .checked_mul(term_years)
        .and_then(|p| p.checked_mul(MONTHS_PER_YEAR))
        .ok_or_else(|| overflow("total payment"))
}

/// Interest component of `total_payment`. No validation.
pub fn total_interest(total_payment: Money, loan_amount: Money) -> Money {
    total_payment - loan_amount
}

/// Headline figures for a loan: payment, totals, and payment count.
pub fn analyze_loan(input: &LoanParameters) -> AmortizationResult<ComputationOutput<LoanSummary>> {
    let start = Instant::now();
    validate_loan(input)?;

    let mut warnings: Vec<String> = Vec::new();
    if input.annual_interest_rate_percent > HIGH_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            input.annual_interest_rate_percent
        ));
    }

    let summary = summarize(input)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate level-payment amortization",
        input,
        warnings,
        elapsed,
        summary,
    ))
}

pub(crate) fn summarize(input: &LoanParameters) -> AmortizationResult<LoanSummary> {
    let number_of_payments = payment_count(input.term_years)?;
    let payment = monthly_payment(
        input.loan_amount,
        input.annual_interest_rate_percent,
        input.term_years,
    )?;
    let paid = total_payment(payment, input.term_years)?;

    Ok(LoanSummary {
        loan_amount: input.loan_amount,
        monthly_payment: payment,
        total_payment: paid,
        total_interest: total_interest(paid, input.loan_amount),
        number_of_payments,
        monthly_rate: monthly_rate(input.annual_interest_rate_percent),
    })
}

pub(crate) fn overflow(context: &str) -> AmortizationError {
    AmortizationError::Overflow {
        context: context.into(),
    }
}

pub(crate) fn validate_loan(input: &LoanParameters) -> AmortizationResult<()> {
    if input.loan_amount <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if input.annual_interest_rate_percent < Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "annual_interest_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    payment_count(input.term_years)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
