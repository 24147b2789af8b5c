//! Property purchase financing: turn a price and down payment into a loan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizationError;
use crate::payment::{summarize, LoanSummary};
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Percent, Years};
use crate::AmortizationResult;

/// A property purchase financed by a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub property_price: Money,
    #[serde(default)]
    pub down_payment: Money,
    pub annual_interest_rate_percent: Percent,
    pub term_years: Years,
}

/// Loan figures for a purchase, with the equity split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseSummary {
    pub property_price: Money,
    pub down_payment: Money,
    pub down_payment_percent: Percent,
    pub loan_to_value_percent: Percent,
    pub loan: LoanSummary,
}

impl PurchaseInput {
    /// Loan parameters for the financed part of the price.
    pub fn to_loan_parameters(&self) -> AmortizationResult<LoanParameters> {
        if self.property_price <= Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "property_price".into(),
                reason: "Property price must be positive".into(),
            });
        }
        if self.term_years <= Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "term_years".into(),
                reason: "Loan term must be greater than zero".into(),
            });
        }
        if self.down_payment < Decimal::ZERO {
            return Err(AmortizationError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot be negative".into(),
            });
        }
        if self.down_payment > self.property_price {
            return Err(AmortizationError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment cannot exceed the property price".into(),
            });
        }
        let loan_amount = self.property_price - self.down_payment;
        if loan_amount.is_zero() {
            return Err(AmortizationError::InvalidInput {
                field: "down_payment".into(),
                reason: "Down payment covers the full price; nothing to finance".into(),
            });
        }

        Ok(LoanParameters {
            loan_amount,
            annual_interest_rate_percent: self.annual_interest_rate_percent,
            term_years: self.term_years,
        })
    }
}

/// Headline loan figures for a purchase.
pub fn analyze_purchase(
    input: &PurchaseInput,
) -> AmortizationResult<ComputationOutput<PurchaseSummary>> {
    let start = Instant::now();
    let params = input.to_loan_parameters()?;
    if params.annual_interest_rate_percent < Decimal::ZERO {
        return Err(AmortizationError::InvalidInput {
            field: "annual_interest_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }

    let loan = summarize(&params)?;
    let down_payment_percent = input.down_payment / input.property_price * dec!(100);
    let summary = PurchaseSummary {
        property_price: input.property_price,
        down_payment: input.down_payment,
        down_payment_percent,
        loan_to_value_percent: dec!(100) - down_payment_percent,
        loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Purchase price less down payment, fixed-rate level-payment amortization",
        input,
        Vec::new(),
        elapsed,
        summary,
    ))
}
