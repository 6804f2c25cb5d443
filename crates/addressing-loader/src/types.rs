//! Loader-specific error and configuration types.

use addressing_types::ValidationError;
use thiserror::Error;

/// Errors that can occur while loading subdivision definitions.
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// I/O error reading a definition group.
    #[error("IO error reading definitions for group '{group_id}': {source}")]
    Io {
        /// The group being read.
        group_id: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A definition group could not be parsed.
    #[error("Invalid JSON in definitions for group '{group_id}': {source}")]
    Json {
        /// The group being parsed.
        group_id: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A subdivision definition is missing required data.
    ///
    /// The whole group is rejected; no partial sibling set is cached.
    #[error("Invalid subdivision '{code}' in group '{group_id}': {source}")]
    InvalidDefinition {
        /// The group containing the invalid entry.
        group_id: String,
        /// The code of the invalid entry.
        code: String,
        /// What was wrong with it.
        source: ValidationError,
    },

    /// A definition group declares parents other than the path it was loaded for.
    #[error("Definitions for group '{group_id}' declare parents {declared:?}, expected {requested:?}")]
    ParentMismatch {
        /// The group being loaded.
        group_id: String,
        /// The parents declared by the definition.
        declared: Vec<String>,
        /// The canonical path the group was requested for.
        requested: Vec<String>,
    },

    /// The parent path was empty; it must at least contain a country code.
    #[error("Parent path must contain at least a country code")]
    EmptyParents,

    /// Error reported by a custom definition source.
    #[error("Definition source error: {0}")]
    Source(String),
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Configuration for a subdivision repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryConfig {
    /// Maximum length of a parent path that may hold subdivisions.
    ///
    /// A path of length 1 (the country code) addresses administrative areas,
    /// length 2 localities, length 3 dependent localities. Deeper requests
    /// return empty results without touching the definition source.
    /// `None` relies only on the `has_children` flags of the definitions.
    pub max_depth: Option<usize>,
}

impl RepositoryConfig {
    /// Creates a config without a depth limit.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Creates a config limited to `max_depth` subdivision levels.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Returns true if a parent path of the given length may hold subdivisions.
    pub fn allows_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }
}
