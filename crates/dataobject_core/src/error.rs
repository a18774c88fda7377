//! Error contracts for data object operations.
//!
//! # Invariants
//! - `NoHandler` is the only failure a well-formed call chain can produce.
//! - Errors always surface to the caller of the top-level facade operation;
//!   nothing is retried or recovered internally.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DataObjectResult<T> = Result<T, DataObjectError>;

/// Errors produced by the data object facade and its handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataObjectError {
    /// Type has neither a registered handler nor declared properties.
    NoHandler { type_key: String },
    /// A handler received a value whose runtime type it cannot operate on.
    TypeMismatch { expected: String, found: String },
    /// A handler is already registered for this type.
    DuplicateHandler(String),
    /// Type key does not follow the identifier grammar.
    InvalidTypeKey(String),
    /// Declared schema is malformed.
    InvalidSchema { type_key: String, reason: String },
}

impl Display for DataObjectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHandler { type_key } => {
                write!(f, "no type handler registered for type `{type_key}`")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected `{expected}`, found `{found}`")
            }
            Self::DuplicateHandler(type_key) => {
                write!(f, "type handler already registered: {type_key}")
            }
            Self::InvalidTypeKey(value) => write!(f, "type key is invalid: {value}"),
            Self::InvalidSchema { type_key, reason } => {
                write!(f, "invalid schema for `{type_key}`: {reason}")
            }
        }
    }
}

impl Error for DataObjectError {}
