pub mod error;
pub mod extra_payment;
pub mod financing;
pub mod payment;
pub mod schedule;
pub mod types;

pub use error::AmortizationError;
pub use types::*;

/// Standard result type for all amortization operations
pub type AmortizationResult<T> = Result<T, AmortizationError>;
