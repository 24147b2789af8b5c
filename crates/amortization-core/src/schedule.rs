//! Payment-by-payment amortization schedules.
//!
//! Each period charges interest on the opening balance, applies the rest of
//! the payment to principal, and clamps the closing balance at zero. The
//! clamp is kept; `build_schedule` reports it in its warnings whenever it
//! hides more than a cent of over-payment.

use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::payment::{monthly_payment, monthly_rate, overflow, payment_count, validate_loan};
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Percent, Rate, Years};
use crate::AmortizationResult;

/// Over-payment the balance clamp may absorb before it is reported.
const CLAMP_TOLERANCE: Decimal = dec!(0.01);

/// Closing balance at or above which a schedule is reported as under-amortizing.
const RESIDUAL_TOLERANCE: Decimal = dec!(1);

/// Default number of leading payments in a sampled view.
pub const DEFAULT_SAMPLE_HEAD: usize = 12;

/// Default spacing, in payments, of the sampled rows after the head.
pub const DEFAULT_SAMPLE_STRIDE: u32 = 12;

/// One row of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentScheduleEntry {
    /// 1-based payment number.
    pub payment_number: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    /// Balance after this payment, never below zero.
    pub remaining_balance: Money,
}

/// Input for a schedule. Leave `monthly_payment` unset to use the level payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    #[serde(flatten)]
    pub loan: LoanParameters,
    /// Override for the scheduled payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<Money>,
}

/// A full schedule plus its column totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub entries: Vec<PaymentScheduleEntry>,
}

struct ScheduleRun {
    entries: Vec<PaymentScheduleEntry>,
    /// Largest amount by which the unclamped balance went below zero.
    max_clamp: Money,
    first_clamped: Option<u32>,
}

/// Generate the full schedule for `monthly_payment` over `term_years`.
///
/// Returns exactly `term_years * 12` entries. Fails when the term is not a
/// positive whole number of months, or when a payment too small to cover the
/// interest lets the balance grow past what a Decimal can hold.
pub fn generate_amortization_schedule(
    loan_amount: Money,
    monthly_payment: Money,
    annual_interest_rate_percent: Percent,
    term_years: Years,
) -> AmortizationResult<Vec<PaymentScheduleEntry>> {
    let n = payment_count(term_years)?;
    let run = amortize(
        loan_amount,
        monthly_payment,
        monthly_rate(annual_interest_rate_percent),
        n,
    )?;
    Ok(run.entries)
}

/// Build a schedule with totals and warnings for clamped or residual balances.
pub fn build_schedule(
    input: &ScheduleInput,
) -> AmortizationResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let loan = &input.loan;
    validate_loan(loan)?;
    debug!(
        "schedule: {} at {}% over {} years",
        loan.loan_amount, loan.annual_interest_rate_percent, loan.term_years
    );

    let payment = match input.monthly_payment {
        Some(p) => p,
        None => monthly_payment(
            loan.loan_amount,
            loan.annual_interest_rate_percent,
            loan.term_years,
        )?,
    };
    let n = payment_count(loan.term_years)?;
    let run = amortize(
        loan.loan_amount,
        payment,
        monthly_rate(loan.annual_interest_rate_percent),
        n,
    )?;

    let mut warnings: Vec<String> = Vec::new();
    if run.max_clamp > CLAMP_TOLERANCE {
        warnings.push(format!(
            "Balance clamped at zero from payment {}; up to {} of over-payment hidden",
            run.first_clamped.unwrap_or(n),
            run.max_clamp.round_dp(2)
        ));
    }
    let final_balance = run
        .entries
        .last()
        .map(|e| e.remaining_balance)
        .unwrap_or(Decimal::ZERO);
    if final_balance >= RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Balance of {} remains after {} payments; payment does not amortize the loan",
            final_balance.round_dp(2),
            n
        ));
    }
    for w in &warnings {
        warn!("schedule: {w}");
    }

    let total_principal = checked_sum(run.entries.iter().map(|e| e.principal), "total principal")?;
    let total_interest = checked_sum(run.entries.iter().map(|e| e.interest), "total interest")?;
    let total_paid = total_principal
        .checked_add(total_interest)
        .ok_or_else(|| overflow("total paid"))?;
    debug!("schedule: {} payments, total interest {}", n, total_interest.round_dp(2));

    let schedule = AmortizationSchedule {
        monthly_payment: payment,
        total_paid,
        total_principal,
        total_interest,
        entries: run.entries,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization schedule (closing balance clamped at zero)",
        input,
        warnings,
        elapsed,
        schedule,
    ))
}

/// Partial view of a schedule: the first `head` payments, every payment
/// whose number is a multiple of `stride`, and the final payment.
pub fn sample_schedule(
    entries: &[PaymentScheduleEntry],
    head: usize,
    stride: u32,
) -> Vec<PaymentScheduleEntry> {
    let last = entries.last().map(|e| e.payment_number);
    entries
        .iter()
        .filter(|e| {
            (e.payment_number as usize) <= head
                || (stride > 0 && e.payment_number % stride == 0)
                || Some(e.payment_number) == last
        })
        .cloned()
        .collect()
}

fn checked_sum(mut values: impl Iterator<Item = Money>, context: &str) -> AmortizationResult<Money> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| overflow(context))
    })
}

fn amortize(
    loan_amount: Money,
    payment: Money,
    rate: Rate,
    periods: u32,
) -> AmortizationResult<ScheduleRun> {
    let mut entries = Vec::with_capacity(periods as usize);
    let mut balance = loan_amount;
    let mut max_clamp = Decimal::ZERO;
    let mut first_clamped = None;

    for payment_number in 1..=periods {
        // An under-paying schedule grows the balance every period.
        let step = balance.checked_mul(rate).and_then(|interest| {
            let principal = payment.checked_sub(interest)?;
            let unclamped = balance.checked_sub(principal)?;
            Some((interest, principal, unclamped))
        });
        let (interest, principal, unclamped) =
            step.ok_or_else(|| overflow(&format!("schedule balance at payment {payment_number}")))?;

        balance = if unclamped < Decimal::ZERO {
            let overshoot = -unclamped;
            if overshoot > max_clamp {
                max_clamp = overshoot;
            }
            if overshoot > CLAMP_TOLERANCE && first_clamped.is_none() {
                first_clamped = Some(payment_number);
            }
            Decimal::ZERO
        } else {
            unclamped
        };

        entries.push(PaymentScheduleEntry {
            payment_number,
            payment,
            principal,
            interest,
            remaining_balance: balance,
        });
    }

    Ok(ScheduleRun {
        entries,
        max_clamp,
        first_clamped,
    })
}
