use thiserror::Error;

/// Validation and contract errors exposed by `fundflow-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("scheme code cannot be empty")]
    EmptySchemeCode,
    #[error("scheme code length {len} exceeds max {max}")]
    SchemeCodeTooLong { len: usize, max: usize },
    #[error("scheme code must be numeric, found '{ch}' at index {index}")]
    SchemeCodeNotNumeric { ch: char, index: usize },

    #[error("invalid date '{value}', expected {expected}")]
    InvalidDate {
        value: String,
        expected: &'static str,
    },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },

    #[error("observation {index} is dated before its predecessor")]
    UnorderedSeries { index: usize },

    #[error("invalid source '{value}', expected one of mfapi, file")]
    InvalidSource { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

