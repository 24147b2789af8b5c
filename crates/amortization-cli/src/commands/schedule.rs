use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use amortization_core::schedule::{self, ScheduleInput, DEFAULT_SAMPLE_HEAD, DEFAULT_SAMPLE_STRIDE};

use super::{decimal_field, LoanArgs};

/// Arguments for the amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Scheduled payment to use instead of the level payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Print every payment instead of the sampled view
    #[arg(long)]
    pub full: bool,

    /// Leading payments shown in the sampled view
    #[arg(long, default_value_t = DEFAULT_SAMPLE_HEAD)]
    pub head: usize,

    /// Show every Nth payment after the leading ones
    #[arg(long, default_value_t = DEFAULT_SAMPLE_STRIDE)]
    pub stride: u32,
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = args.loan.document()?;
    let loan = args.loan.source(doc.as_ref())?.into_loan()?;
    let monthly_payment = match args.payment {
        Some(p) => Some(p),
        None => decimal_field(doc.as_ref(), "monthly_payment")?,
    };

    let mut result = schedule::build_schedule(&ScheduleInput {
        loan,
        monthly_payment,
    })?;
    if !args.full {
        result.result.entries =
            schedule::sample_schedule(&result.result.entries, args.head, args.stride);
    }
    Ok(serde_json::to_value(result)?)
}
