use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use amortization_core::extra_payment::{self, ExtraPaymentInput};
use amortization_core::financing::{self, PurchaseInput};
use amortization_core::payment;
use amortization_core::schedule::{self, ScheduleInput};
use amortization_core::LoanParameters;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Schedule request: loan terms plus an optional sampled view.
#[derive(Deserialize)]
struct ScheduleRequest {
    #[serde(flatten)]
    input: ScheduleInput,
    #[serde(default)]
    sample: Option<SampleView>,
}

#[derive(Deserialize)]
struct SampleView {
    head: usize,
    stride: u32,
}

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

#[napi]
pub fn loan_summary(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = payment::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn purchase_summary(input_json: String) -> NapiResult<String> {
    let input: PurchaseInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = financing::analyze_purchase(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Level monthly payment as a decimal string.
#[napi]
pub fn monthly_payment(
    loan_amount: String,
    annual_interest_rate_percent: String,
    term_years: String,
) -> NapiResult<String> {
    let amount: Decimal = loan_amount.parse().map_err(to_napi_error)?;
    let rate: Decimal = annual_interest_rate_percent.parse().map_err(to_napi_error)?;
    let years: Decimal = term_years.parse().map_err(to_napi_error)?;
    let pmt = payment::monthly_payment(amount, rate, years).map_err(to_napi_error)?;
    Ok(pmt.to_string())
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let request: ScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let mut output = schedule::build_schedule(&request.input).map_err(to_napi_error)?;
    if let Some(view) = request.sample {
        output.result.entries =
            schedule::sample_schedule(&output.result.entries, view.head, view.stride);
    }
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Extra payments
// ---------------------------------------------------------------------------

#[napi]
pub fn extra_payment_impact(input_json: String) -> NapiResult<String> {
    let input: ExtraPaymentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        extra_payment::calculate_extra_payment_impact(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
