use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavSimError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid frequency '{0}': expected monthly, quarterly or yearly")]
    InvalidFrequency(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Numeric overflow in {context}")]
    NumericOverflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl NavSimError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        NavSimError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for NavSimError {
    fn from(e: serde_json::Error) -> Self {
        NavSimError::SerializationError(e.to_string())
    }
}
