use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortizationError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortizationError {
    fn from(e: serde_json::Error) -> Self {
        AmortizationError::SerializationError(e.to_string())
    }
}
