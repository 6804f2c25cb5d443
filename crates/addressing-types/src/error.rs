//! Validation errors raised while constructing domain entities.

/// Error returned when an entity is built from incomplete or inconsistent data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was missing or empty.
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },
    /// A subdivision was attached to a parent from another country.
    CountryMismatch {
        /// Country code of the parent subdivision.
        parent: String,
        /// Country code of the child subdivision.
        child: String,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "missing required property '{}'", field),
            Self::CountryMismatch { parent, child } => write!(
                f,
                "subdivision country '{}' does not match parent country '{}'",
                child, parent
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
