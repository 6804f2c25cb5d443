//! # addressing-loader
//!
//! Lazy, cached loading of hierarchical country subdivisions.
//!
//! Subdivision definitions are stored in groups: one group per level of
//! siblings (the states of a country, the localities of a state, ...). The
//! [`SubdivisionRepository`] reads a group from its [`DefinitionSource`] the
//! first time it is needed, builds every subdivision in it, and keeps the
//! result for the lifetime of the repository.
//!
//! ## Features
//!
//! - `parallel` (default): Loads the paths passed to
//!   [`SubdivisionRepository::preload`] concurrently via rayon.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use addressing_loader::{JsonDirectorySource, SubdivisionRepository};
//!
//! let repository = SubdivisionRepository::new(JsonDirectorySource::new("resources/subdivision"));
//!
//! // States of Brazil
//! for (code, name) in repository.get_list(&["BR"])? {
//!     println!("{code}: {name}");
//! }
//!
//! // A municipality of Santa Catarina
//! let city = repository.get("Florianópolis", &["BR", "SC"])?;
//! ```

#![warn(missing_docs)]

mod definition;
mod group;
pub mod locale;
mod repository;
mod source;
mod types;

// Re-export addressing-types for convenience
pub use addressing_types;

pub use definition::{GroupDefinition, SubdivisionRecord};
pub use group::{group_id, is_valid_group_id, parent_digest, DIGEST_LENGTH};
pub use repository::SubdivisionRepository;
pub use source::{DefinitionSource, JsonDirectorySource, MemorySource};
pub use types::{RepositoryConfig, RepositoryError, RepositoryResult};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_types_are_exported() {
        let _config = RepositoryConfig::default();
        let _source = MemorySource::new();
        let _record = SubdivisionRecord::default();
        assert_eq!(group_id(&["BR"]).unwrap(), "BR");
    }

    #[test]
    fn test_repository_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SubdivisionRepository<MemorySource>>();
        assert_send_sync::<SubdivisionRepository<Arc<dyn DefinitionSource>>>();
    }
}
