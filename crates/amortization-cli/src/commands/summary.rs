use clap::Args;
use serde_json::Value;

use amortization_core::financing;
use amortization_core::payment;

use super::{LoanArgs, LoanSource};

/// Arguments for the loan summary
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub loan: LoanArgs,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let doc = args.loan.document()?;
    match args.loan.source(doc.as_ref())? {
        LoanSource::Purchase(purchase) => {
            let result = financing::analyze_purchase(&purchase)?;
            Ok(serde_json::to_value(result)?)
        }
        LoanSource::Loan(loan) => {
            let result = payment::analyze_loan(&loan)?;
            Ok(serde_json::to_value(result)?)
        }
    }
}
