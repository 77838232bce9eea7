//! Errors that reject a carrier policy configuration.

/// Why a carrier configuration was rejected. Any of these discards the whole
/// configuration in favour of the built-in defaults.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("malformed policy configuration: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("apn {apn:?}, policy #{index}: {violation}")]
    InvalidPolicy {
        apn: String,
        index: usize,
        violation: PolicyViolation,
    },
}

impl ConfigError {
    /// The structural violation, when the input was well-formed JSON.
    pub fn violation(&self) -> Option<&PolicyViolation> {
        match self {
            ConfigError::Malformed(_) => None,
            ConfigError::InvalidPolicy { violation, .. } => Some(violation),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("empty ApnName")]
    EmptyApnName,
    #[error("unknown ErrorType {0:?}")]
    UnknownErrorType(String),
    #[error("empty ErrorDetails")]
    EmptyDetails,
    #[error("invalid error detail {0:?}")]
    InvalidDetail(String),
    #[error("invalid range {0:?}")]
    InvalidRange(String),
    #[error("ErrorType \"*\" only accepts \"*\" details, got {0:?}")]
    WildcardTypeWithDetail(String),
    #[error("empty RetryArray")]
    EmptyRetryArray,
    #[error("invalid RetryArray entry {0:?}")]
    InvalidRetryEntry(String),
    #[error("\"-1\" must be the last RetryArray entry and follow a delay")]
    MisplacedRepeatSentinel,
    #[error("unknown UnthrottlingEvents entry {0:?}")]
    UnknownEvent(String),
    #[error("{field} must be a positive integer, got {value:?}")]
    InvalidCount { field: &'static str, value: String },
    #[error("HandoverAttemptCount is only allowed on specific IKE_PROTOCOL_ERROR_TYPE entries")]
    HandoverCountNotAllowed,
}
