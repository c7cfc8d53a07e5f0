//! Error types for pathsieve.
//!
//! This module defines all error types used throughout the pathsieve crate.
//! Structural and unsupported-operation errors describe a caller-side contract
//! violation and abort the filtering pass; downstream I/O errors are passed
//! through unchanged.

use thiserror::Error;

use crate::token::ContainerKind;

/// The main error type for pathsieve operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Structural Errors ===
    /// An end token did not match the innermost open container.
    #[error("mismatched end of {found}: innermost open container is an {expected}")]
    UnbalancedEnd {
        /// Kind of the innermost open container.
        expected: ContainerKind,
        /// Kind of the end token that was written.
        found: ContainerKind,
    },

    /// An end token was written while no container was open.
    #[error("extra end of {found}: no container is open")]
    UnexpectedEnd {
        /// Kind of the end token that was written.
        found: ContainerKind,
    },

    /// The pass finished while containers were still open.
    #[error("{open} container(s) left open at end of document")]
    UnclosedContainers {
        /// Number of containers still open.
        open: usize,
    },

    /// A field name was written while another one was still waiting for its value.
    #[error("field name written without a following value")]
    DanglingFieldName,

    /// A value was written inside an object without a field name first.
    #[error("value written inside an object without a field name")]
    MissingFieldName,

    /// A decimal scalar did not hold a usable JSON number.
    #[error("invalid decimal '{text}': {reason}")]
    InvalidDecimal {
        /// The decimal text as written.
        text: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A field name was written outside of an object.
    #[error("field name '{name}' written outside of an object")]
    FieldNameOutsideObject {
        /// The offending field name.
        name: String,
    },

    // === Unsupported Operations ===
    /// Raw, pre-serialized content cannot be filtered.
    #[error("raw content cannot be filtered; write it as structured tokens instead")]
    RawContent,

    // === Rule Errors ===
    /// A rule path could not be normalized.
    #[error("invalid rule '{rule}': {reason}")]
    InvalidRule {
        /// The rule as supplied by the caller.
        rule: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A JSON pointer could not be parsed.
    #[error("invalid JSON pointer '{pointer}': {reason}")]
    InvalidPointer {
        /// The pointer as supplied by the caller.
        pointer: String,
        /// Why it was rejected.
        reason: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Writing to the underlying sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for pathsieve operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid rule error.
    #[must_use]
    pub fn invalid_rule(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid pointer error.
    #[must_use]
    pub fn invalid_pointer(pointer: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPointer {
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid decimal error.
    #[must_use]
    pub fn invalid_decimal(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDecimal {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a caller-side violation of the token contract.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnbalancedEnd { .. }
                | Self::UnexpectedEnd { .. }
                | Self::UnclosedContainers { .. }
                | Self::DanglingFieldName
                | Self::MissingFieldName
                | Self::FieldNameOutsideObject { .. }
                | Self::InvalidDecimal { .. }
        )
    }

    /// Check if this error rejects content the filter cannot see into.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::RawContent)
    }
}
