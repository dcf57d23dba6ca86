//! Error types for the compensation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions the engine surfaces to its callers. A missing
//! market benchmark is not an error: lookups return `Option` instead.

use thiserror::Error;

/// The main error type for the compensation engine.
///
/// All fallible operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use comp_engine::error::EngineError;
///
/// let error = EngineError::UnmatchedTier { fte: 0.3 };
/// assert_eq!(error.to_string(), "No FTE tier covers provider FTE 0.3");
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Caller-supplied configuration is self-contradictory or out of range.
    ///
    /// Always raised before any arithmetic runs.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field (or dotted path) that failed validation.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An FTE-adjusted model has no tier covering the provider's FTE.
    #[error("No FTE tier covers provider FTE {fte}")]
    UnmatchedTier {
        /// The provider FTE that no tier covered.
        fte: f64,
    },

    /// The inputs make the requested calculation undefined (e.g. division by zero).
    #[error("Degenerate input: {message}")]
    DegenerateInput {
        /// A description of the degenerate condition.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
