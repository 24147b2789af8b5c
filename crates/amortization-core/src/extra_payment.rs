//! Effect of paying a constant amount of extra principal every month.
//!
//! The baseline is the level-payment loan. The accelerated loan is simulated
//! month by month with `payment + extra` until the balance is retired or a
//! safety bound of twice the original term is reached.

use log::{debug, trace, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizationError;
use crate::payment::{
    monthly_payment, monthly_rate, overflow, payment_count, total_interest, total_payment,
};
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Rate};
use crate::AmortizationResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Input for extra-payment analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraPaymentInput {
    #[serde(flatten)]
    pub loan: LoanParameters,
    /// Additional principal paid every month on top of the level payment.
    pub extra_monthly_payment: Money,
}

/// Comparison of the standard loan against the accelerated one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraPaymentImpact {
    /// Months needed to retire the loan with the extra payment.
    pub new_loan_term_months: u32,
    pub months_saved: u32,
    pub interest_saved: Money,
    pub total_interest_standard: Money,
    pub total_interest_with_extra: Money,
    pub standard_monthly_payment: Money,
    /// Level payment plus the extra principal.
    pub accelerated_monthly_payment: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare total interest and term with and without the extra monthly payment.
pub fn calculate_extra_payment_impact(
    input: &ExtraPaymentInput,
) -> AmortizationResult<ComputationOutput<ExtraPaymentImpact>> {
    let start = Instant::now();
    validate_extra_payment(input)?;

    let loan = &input.loan;
    debug!(
        "extra payment: {} on {} at {}% over {} years",
        input.extra_monthly_payment,
        loan.loan_amount,
        loan.annual_interest_rate_percent,
        loan.term_years
    );
    let n = payment_count(loan.term_years)?;
    let standard_payment = monthly_payment(
        loan.loan_amount,
        loan.annual_interest_rate_percent,
        loan.term_years,
    )?;
    let total_interest_standard = total_interest(
        total_payment(standard_payment, loan.term_years)?,
        loan.loan_amount,
    );

    let mut warnings: Vec<String> = Vec::new();

    let impact = if input.extra_monthly_payment.is_zero() {
        ExtraPaymentImpact {
            new_loan_term_months: n,
            months_saved: 0,
            interest_saved: Decimal::ZERO,
            total_interest_standard,
            total_interest_with_extra: total_interest_standard,
            standard_monthly_payment: standard_payment,
            accelerated_monthly_payment: standard_payment,
        }
    } else {
        let accelerated = standard_payment
            .checked_add(input.extra_monthly_payment)
            .ok_or_else(|| overflow("accelerated monthly payment"))?;
        let max_months = n.saturating_mul(2);
        let paydown = simulate_paydown(
            loan.loan_amount,
            monthly_rate(loan.annual_interest_rate_percent),
            accelerated,
            max_months,
        )?;

        if paydown.remaining_balance > Decimal::ZERO {
            warnings.push(format!(
                "Safety bound of {} months reached with {} still outstanding",
                max_months,
                paydown.remaining_balance.round_dp(2)
            ));
        }

        ExtraPaymentImpact {
            new_loan_term_months: paydown.months,
            months_saved: n.saturating_sub(paydown.months),
            interest_saved: total_interest_standard - paydown.total_interest,
            total_interest_standard,
            total_interest_with_extra: paydown.total_interest,
            standard_monthly_payment: standard_payment,
            accelerated_monthly_payment: accelerated,
        }
    };

    for w in &warnings {
        warn!("extra payment: {w}");
    }
    debug!(
        "extra payment: retired in {} months, {} months saved",
        impact.new_loan_term_months, impact.months_saved
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization with constant extra principal",
        input,
        warnings,
        elapsed,
        impact,
    ))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

struct Paydown {
    months: u32,
    total_interest: Money,
    remaining_balance: Money,
}

fn simulate_paydown(
    principal: Money,
    rate: Rate,
    payment: Money,
    max_months: u32,
) -> AmortizationResult<Paydown> {
    let mut balance = principal;
    let mut months = 0u32;
    let mut accrued = Decimal::ZERO;

    while balance > Decimal::ZERO && months < max_months {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| overflow("accelerated interest"))?;
        accrued = accrued
            .checked_add(interest)
            .ok_or_else(|| overflow("accelerated interest"))?;
        balance = payment
            .checked_sub(interest)
            .and_then(|principal_paid| balance.checked_sub(principal_paid))
            .ok_or_else(|| overflow("accelerated balance"))?;
        months += 1;

        // Final payment overshoots: back out interest on the overpaid amount,
        // never more than the month actually charged.
        if balance < Decimal::ZERO {
            let back_out = balance
                .abs()
                .checked_mul(rate)
                .map_or(interest, |excess| excess.min(interest));
            accrued -= back_out;
            balance = Decimal::ZERO;
        }

        trace!("month {months}: interest {interest}, balance {balance}");
    }

    Ok(Paydown {
        months,
        total_interest: accrued,
        remaining_balance: balance,
    })
}

fn validate_extra_payment(input: &ExtraPaymentInput) -> AmortizationResult<()> {
    let loan = &input.loan;
    if loan.loan_amount <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount must be positive".into(),
        });
    }
    if loan.annual_interest_rate_percent < Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "annual_interest_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if loan.term_years <= Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "term_years".into(),
            reason: "Loan term must be greater than zero".into(),
        });
    }
    if input.extra_monthly_payment < Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "extra_monthly_payment".into(),
            reason: "Extra payment cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn input(amount: Decimal, rate: Decimal, years: Decimal, extra: Decimal) -> ExtraPaymentInput {
        ExtraPaymentInput {
            loan: LoanParameters {
                loan_amount: amount,
                annual_interest_rate_percent: rate,
                term_years: years,
            },
            extra_monthly_payment: extra,
        }
    }

    fn invalid_field(result: AmortizationResult<ComputationOutput<ExtraPaymentImpact>>) -> String {
        match result {
            Err(AmortizationError::InvalidInput { field, .. }) => field,
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.result)),
        }
    }

    #[test]
    fn test_zero_extra_returns_baseline() {
        let out = calculate_extra_payment_impact(&input(dec!(200_000), dec!(5.5), dec!(30), dec!(0)))
            .unwrap();
        let r = &out.result;
        assert_eq!(r.months_saved, 0);
        assert_eq!(r.interest_saved, Decimal::ZERO);
        assert_eq!(r.new_loan_term_months, 360);
        assert_eq!(r.total_interest_standard, r.total_interest_with_extra);
        assert_eq!(r.standard_monthly_payment, r.accelerated_monthly_payment);
    }

    #[test]
    fn test_extra_200_on_300k_4_5pct() {
        let out = calculate_extra_payment_impact(&input(dec!(300_000), dec!(4.5), dec!(30), dec!(200)))
            .unwrap();
        let r = &out.result;
        assert_eq!(r.new_loan_term_months, 284);
        assert_eq!(r.months_saved, 76);
        assert!(r.interest_saved > dec!(59_000) && r.interest_saved < dec!(60_000));
        assert!(r.total_interest_with_extra < r.total_interest_standard);
        assert_eq!(r.accelerated_monthly_payment.round_dp(2), dec!(1720.06));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_extra_payment_zero_rate() {
        // 12,000 over 1 year at 0%: 1,000/month, with +500 retires in 8 months.
        let out = calculate_extra_payment_impact(&input(dec!(12_000), dec!(0), dec!(1), dec!(500)))
            .unwrap();
        let r = &out.result;
        assert_eq!(r.new_loan_term_months, 8);
        assert_eq!(r.months_saved, 4);
        assert_eq!(r.total_interest_with_extra, Decimal::ZERO);
    }

    #[test]
    fn test_extra_payment_retiring_in_first_month() {
        let out = calculate_extra_payment_impact(&input(dec!(1_000), dec!(12), dec!(1), dec!(5_000)))
            .unwrap();
        let r = &out.result;
        assert_eq!(r.new_loan_term_months, 1);
        assert_eq!(r.months_saved, 11);
        // The overshoot (~4,079) is far larger than the 1,000 owed, so the
        // back-out is capped at the month's 10 of interest.
        assert_eq!(r.total_interest_with_extra, Decimal::ZERO);
        assert!(r.interest_saved <= r.total_interest_standard);
        assert_eq!(r.interest_saved, r.total_interest_standard);
    }

    #[test]
    fn test_overshoot_back_out_never_goes_negative() {
        for extra in [dec!(100), dec!(950), dec!(2_000), dec!(50_000)] {
            let out = calculate_extra_payment_impact(&input(dec!(1_000), dec!(12), dec!(1), extra))
                .unwrap();
            let r = &out.result;
            assert!(r.total_interest_with_extra >= Decimal::ZERO, "extra {extra}");
            assert!(r.interest_saved <= r.total_interest_standard, "extra {extra}");
        }
    }

    #[test]
    fn test_final_month_back_out() {
        // 1,000 at 1%/month paid 600: 10 + 4.10 charged, overshoot of 185.90
        // backs out 1.859.
        let paydown = simulate_paydown(dec!(1_000), dec!(0.01), dec!(600), 24).unwrap();
        assert_eq!(paydown.months, 2);
        assert_eq!(paydown.total_interest, dec!(12.241));
        assert_eq!(paydown.remaining_balance, Decimal::ZERO);

        // Paid 1,000: month two charges 0.10 but overshoots by 989.90, so the
        // back-out stops at the 0.10 charged.
        let paydown = simulate_paydown(dec!(1_000), dec!(0.01), dec!(1_000), 24).unwrap();
        assert_eq!(paydown.months, 2);
        assert_eq!(paydown.total_interest, dec!(10));
    }

    #[test]
    fn test_simulation_respects_safety_bound() {
        // Payment equal to the monthly interest never reduces the balance.
        let paydown = simulate_paydown(dec!(1_000), dec!(0.01), dec!(10), 24).unwrap();
        assert_eq!(paydown.months, 24);
        assert_eq!(paydown.remaining_balance, dec!(1_000));
        assert_eq!(paydown.total_interest, dec!(240));
    }

    #[test]
    fn test_rejects_invalid_inputs() {
        let cases = [
            (input(dec!(0), dec!(5), dec!(30), dec!(100)), "loan_amount"),
            (input(dec!(200_000), dec!(-1), dec!(30), dec!(100)), "annual_interest_rate_percent"),
            (input(dec!(200_000), dec!(5), dec!(0), dec!(100)), "term_years"),
            (input(dec!(200_000), dec!(5), dec!(30), dec!(-50)), "extra_monthly_payment"),
        ];
        for (case, field) in cases {
            assert_eq!(invalid_field(calculate_extra_payment_impact(&case)), field);
        }
    }
}
