//! Zone error types.

use addressing_types::ValidationError;
use thiserror::Error;

/// Errors raised while parsing a postal code pattern.
#[derive(Error, Debug, Clone)]
pub enum PatternError {
    /// The body of a `/.../` pattern is not a valid regular expression.
    #[error("Invalid postal code regex '{pattern}': {source}")]
    InvalidRegex {
        /// The pattern as written, delimiters included.
        pattern: String,
        /// The regex compilation error.
        source: regex::Error,
    },

    /// A range token is missing one of its bounds.
    #[error("Invalid postal code range '{token}' (expected start:end)")]
    InvalidRange {
        /// The offending token.
        token: String,
    },
}

/// Errors raised while building a zone or territory.
#[derive(Error, Debug, Clone)]
pub enum ZoneError {
    /// A required field is missing.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A postal code pattern could not be parsed.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The zone has no territories.
    #[error("Zone '{zone}' must have at least one territory")]
    EmptyTerritories {
        /// The zone id.
        zone: String,
    },
}

/// Result type for zone construction.
pub type ZoneResult<T> = Result<T, ZoneError>;
