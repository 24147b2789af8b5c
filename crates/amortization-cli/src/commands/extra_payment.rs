use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use amortization_core::extra_payment::{self, ExtraPaymentInput};

use super::{decimal_field, LoanArgs};

/// Arguments for extra-payment analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ExtraPaymentArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Extra principal paid every month
    #[arg(long)]
    pub extra: Option<Decimal>,
}

pub fn run_extra_payment(args: ExtraPaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = args.loan.document()?;
    let loan = args.loan.source(doc.as_ref())?.into_loan()?;
    let extra_monthly_payment = match args.extra {
        Some(extra) => extra,
        None => decimal_field(doc.as_ref(), "extra_monthly_payment")?
            .ok_or("--extra is required (or provide extra_monthly_payment in --input)")?,
    };

    let result = extra_payment::calculate_extra_payment_impact(&ExtraPaymentInput {
        loan,
        extra_monthly_payment,
    })?;
    Ok(serde_json::to_value(result)?)
}
