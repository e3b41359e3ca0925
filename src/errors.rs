use std::fmt::Display;

use serde_json::Value;
use thiserror::Error; // Import the `Error` derive macro from the `thiserror` crate

// Every variant is fatal to the running decode; nothing is retried
#[derive(Debug, Error)]
pub enum DecodeError {
    // The decode target is not a record (or is an empty optional record)
    #[error("invalid target: `{0}` is not a record")]
    InvalidTarget(&'static str),

    // Raised by a value provider, passed through untouched
    #[error("provider error: {0}")]
    Provider(String),

    // Raised while coercing a loose value into a typed field
    #[error("cannot convert {value} into `{type_name}`: {reason}")]
    Conversion {
        type_name: &'static str,
        value: String,
        reason: String,
    },

    // Malformed JSON in a structured default literal
    #[error("invalid default literal: {0}")]
    LiteralParse(#[from] serde_json::Error),

    // A flatten marker on a field that holds no record, under FlattenPolicy::Reject
    #[error("field `{field}` is flattened but `{type_name}` is not a record")]
    Flatten {
        field: String,
        type_name: &'static str,
    },
}

impl DecodeError {
    pub(crate) fn conversion(type_name: &'static str, value: &Value, reason: impl Display) -> Self {
        DecodeError::Conversion {
            type_name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

// Type alias for results that use `DecodeError` as the error type
pub type Result<T> = std::result::Result<T, DecodeError>;
