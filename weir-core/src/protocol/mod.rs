//! Inbound order-entry protocol
//!
//! A message arrives as delimiter-separated `tag=value` tokens in the
//! FIX style (`35=D|55=AAPL|54=1|...`). The tokenizer turns it into a
//! tag map, the validator turns the map into the closed [`Message`]
//! enum. Downstream code pattern-matches over that fixed set instead of
//! probing optional keys.

pub mod parser;
pub mod tags;
pub mod validator;

pub use parser::{parse, RawMessage, DEFAULT_DELIMITER};
pub use validator::{validate, Message};

use std::fmt;

/// Validation failure for an inbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Message could not be tokenized into tag=value pairs
    MalformedMessage { detail: String },
    /// A tag required for the message kind is absent
    MissingField { tag: u32, name: &'static str },
    /// A tag is present but its value is outside the allowed domain
    InvalidField {
        tag: u32,
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MalformedMessage { detail } => {
                write!(f, "malformed message: {}", detail)
            }
            ValidationError::MissingField { tag, name } => {
                write!(f, "missing required tag {} ({})", tag, name)
            }
            ValidationError::InvalidField {
                tag,
                name,
                value,
                expected,
            } => {
                write!(
                    f,
                    "invalid value '{}' for tag {} ({}): expected {}",
                    value, tag, name, expected
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
