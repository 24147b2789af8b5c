pub mod extra_payment;
pub mod schedule;
pub mod summary;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use amortization_core::financing::PurchaseInput;
use amortization_core::{AmortizationResult, LoanParameters};

use crate::input;

/// Loan terms shared by every subcommand
#[derive(Args)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long, conflicts_with = "property_price")]
    pub loan_amount: Option<Decimal>,

    /// Property price; the loan is the price less the down payment
    #[arg(long)]
    pub property_price: Option<Decimal>,

    /// Down payment against the property price
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Annual interest rate in percent (e.g. 5.5 for 5.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Where the loan amount comes from.
pub enum LoanSource {
    Loan(LoanParameters),
    Purchase(PurchaseInput),
}

impl LoanSource {
    /// A document with `property_price` describes a purchase; anything else a loan.
    pub fn from_document(doc: &Value) -> Result<Self, Box<dyn std::error::Error>> {
        if doc.get("property_price").is_some() {
            Ok(LoanSource::Purchase(serde_json::from_value(doc.clone())?))
        } else {
            Ok(LoanSource::Loan(serde_json::from_value(doc.clone())?))
        }
    }

    pub fn into_loan(self) -> AmortizationResult<LoanParameters> {
        match self {
            LoanSource::Loan(loan) => Ok(loan),
            LoanSource::Purchase(purchase) => purchase.to_loan_parameters(),
        }
    }
}

impl LoanArgs {
    /// JSON document from `--input` or piped stdin, if either was given.
    pub fn document(&self) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return Ok(Some(input::file::read_json_value(path)?));
        }
        input::stdin::read_stdin()
    }

    /// Resolve the loan from a document when present, otherwise from flags.
    pub fn source(&self, doc: Option<&Value>) -> Result<LoanSource, Box<dyn std::error::Error>> {
        if let Some(doc) = doc {
            return LoanSource::from_document(doc);
        }

        let rate = self
            .rate
            .ok_or("--rate is required (or provide --input)")?;
        let term = self
            .term
            .ok_or("--term is required (or provide --input)")?;

        match (self.loan_amount, self.property_price) {
            (Some(loan_amount), _) => Ok(LoanSource::Loan(LoanParameters {
                loan_amount,
                annual_interest_rate_percent: rate,
                term_years: term,
            })),
            (None, Some(property_price)) => Ok(LoanSource::Purchase(PurchaseInput {
                property_price,
                down_payment: self.down_payment,
                annual_interest_rate_percent: rate,
                term_years: term,
            })),
            (None, None) => Err(
                "--loan-amount or --property-price is required (or provide --input)".into(),
            ),
        }
    }
}

/// Optional decimal field of an input document.
pub fn decimal_field(
    doc: Option<&Value>,
    key: &str,
) -> Result<Option<Decimal>, Box<dyn std::error::Error>> {
    match doc.and_then(|d| d.get(key)) {
        Some(Value::Null) | None => Ok(None),
        Some(v) => Ok(Some(
            serde_json::from_value(v.clone())
                .map_err(|e| format!("Invalid '{}': {}", key, e))?,
        )),
    }
}
