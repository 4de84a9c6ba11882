use thiserror::Error;

/// Error type for the edges of the parser: configuration, I/O and payload validation.
///
/// The text pipeline itself never produces these; it always returns a
/// (possibly empty) list of records.
#[derive(Error, Debug)]
pub enum TravelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No destinations could be extracted from the recommendation")]
    NoDestinations,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TravelError>;

impl TravelError {
    /// Whether asking the LLM again could plausibly fix this
    pub fn is_retryable(&self) -> bool {
        matches!(self, TravelError::NoDestinations | TravelError::Validation(_))
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            TravelError::Config(_) => "CONFIG_ERROR",
            TravelError::Io(_) => "IO_ERROR",
            TravelError::Serialization(_) => "SERIALIZATION_ERROR",
            TravelError::Validation(_) => "VALIDATION_ERROR",
            TravelError::NoDestinations => "NO_DESTINATIONS",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
