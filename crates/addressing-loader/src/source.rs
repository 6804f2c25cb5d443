//! Definition sources.
//!
//! The repository reads definition groups through the [`DefinitionSource`]
//! trait. Two implementations are provided: a directory of JSON files named
//! `<group id>.json`, and an in-memory map.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::definition::GroupDefinition;
use crate::group::{group_id, is_valid_group_id};
use crate::types::{RepositoryError, RepositoryResult};

/// Trait for stores that hold subdivision definition groups.
///
/// Implement this trait to load definitions from a custom location.
pub trait DefinitionSource: Send + Sync {
    /// Returns true if a definition group exists for `group_id`.
    fn has_data(&self, group_id: &str) -> bool;

    /// Loads the definition group for `group_id`.
    ///
    /// Only called after [`has_data`](Self::has_data) returned true. Returns
    /// `Ok(None)` when the source holds no such group. Failures to read or
    /// parse a group are errors, including a group that disappeared after
    /// `has_data` reported it.
    fn load_definitions(&self, group_id: &str) -> RepositoryResult<Option<GroupDefinition>>;
}

impl<T: DefinitionSource + ?Sized> DefinitionSource for Arc<T> {
    fn has_data(&self, group_id: &str) -> bool {
        (**self).has_data(group_id)
    }

    fn load_definitions(&self, group_id: &str) -> RepositoryResult<Option<GroupDefinition>> {
        (**self).load_definitions(group_id)
    }
}

impl<T: DefinitionSource + ?Sized> DefinitionSource for Box<T> {
    fn has_data(&self, group_id: &str) -> bool {
        (**self).has_data(group_id)
    }

    fn load_definitions(&self, group_id: &str) -> RepositoryResult<Option<GroupDefinition>> {
        (**self).load_definitions(group_id)
    }
}

/// Reads definition groups from `<directory>/<group id>.json`.
///
/// A missing file is reported by [`has_data`](DefinitionSource::has_data).
/// Once it has been reported present, failing to read it is an I/O error.
///
/// # Example
///
/// ```ignore
/// use addressing_loader::{JsonDirectorySource, SubdivisionRepository};
///
/// let repository = SubdivisionRepository::new(JsonDirectorySource::new("resources/subdivision"));
/// let states = repository.get_all(&["BR"])?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    path: PathBuf,
}

impl JsonDirectorySource {
    /// Creates a source reading from the given directory.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Returns the definition directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file holding the given group.
    pub fn file_path(&self, group_id: &str) -> PathBuf {
        self.path.join(format!("{}.json", group_id))
    }
}

impl DefinitionSource for JsonDirectorySource {
    fn has_data(&self, group_id: &str) -> bool {
        is_valid_group_id(group_id) && self.file_path(group_id).is_file()
    }

    fn load_definitions(&self, group_id: &str) -> RepositoryResult<Option<GroupDefinition>> {
        if !is_valid_group_id(group_id) {
            return Ok(None);
        }

        let json =
            fs::read_to_string(self.file_path(group_id)).map_err(|source| RepositoryError::Io {
                group_id: group_id.to_string(),
                source,
            })?;

        GroupDefinition::from_json_str(group_id, &json).map(Some)
    }
}

/// Holds definition groups in memory.
///
/// # Examples
///
/// ```
/// use addressing_loader::{DefinitionSource, MemorySource};
///
/// let mut source = MemorySource::new();
/// let id = source
///     .insert_json(r#"{"country_code": "BR", "subdivisions": {"SC": {"name": "Santa Catarina"}}}"#)
///     .unwrap();
///
/// assert_eq!(id, "BR");
/// assert!(source.has_data("BR"));
/// assert!(!source.has_data("AR"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    groups: HashMap<String, GroupDefinition>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source from definition groups, naming each from its parent path.
    pub fn from_groups(groups: impl IntoIterator<Item = GroupDefinition>) -> RepositoryResult<Self> {
        let mut source = Self::new();
        for group in groups {
            source.insert_group(group)?;
        }
        Ok(source)
    }

    /// Inserts a group under an explicit identifier.
    pub fn insert(&mut self, group_id: impl Into<String>, group: GroupDefinition) {
        self.groups.insert(group_id.into(), group);
    }

    /// Inserts a group, deriving its identifier from its parent path.
    ///
    /// Returns the identifier used.
    pub fn insert_group(&mut self, group: GroupDefinition) -> RepositoryResult<String> {
        let id = group_id(&group.parent_path())?;
        self.groups.insert(id.clone(), group);
        Ok(id)
    }

    /// Parses a JSON group and inserts it, deriving its identifier from its parent path.
    pub fn insert_json(&mut self, json: &str) -> RepositoryResult<String> {
        let group = GroupDefinition::from_json_str("<memory>", json)?;
        self.insert_group(group)
    }

    /// Returns the number of groups held.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl DefinitionSource for MemorySource {
    fn has_data(&self, group_id: &str) -> bool {
        self.groups.contains_key(group_id)
    }

    fn load_definitions(&self, group_id: &str) -> RepositoryResult<Option<GroupDefinition>> {
        Ok(self.groups.get(group_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BR_JSON: &str = r#"{
        "country_code": "BR",
        "locale": "pt",
        "subdivisions": {
            "SC": {"name": "Santa Catarina", "iso_code": "BR-SC", "has_children": true}
        }
    }"#;

    const BR_SC_JSON: &str = r#"{
        "country_code": "BR",
        "parents": ["BR", "SC"],
        "locale": "pt",
        "subdivisions": {"Abelardo Luz": {}}
    }"#;

    #[test]
    fn test_memory_source_derives_group_ids() {
        let mut source = MemorySource::new();
        assert_eq!(source.insert_json(BR_JSON).unwrap(), "BR");
        assert_eq!(
            source.insert_json(BR_SC_JSON).unwrap(),
            group_id(&["BR", "SC"]).unwrap()
        );
        assert_eq!(source.group_count(), 2);

        let loaded = source.load_definitions("BR").unwrap().unwrap();
        assert_eq!(loaded.subdivisions.len(), 1);
        assert!(source.load_definitions("AR").unwrap().is_none());
    }

    #[test]
    fn test_json_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BR.json"), BR_JSON).unwrap();
        let nested_id = group_id(&["BR", "SC"]).unwrap();
        fs::write(dir.path().join(format!("{}.json", nested_id)), BR_SC_JSON).unwrap();

        let source = JsonDirectorySource::new(dir.path());
        assert_eq!(source.path(), dir.path());
        assert!(source.has_data("BR"));
        assert!(source.has_data(&nested_id));
        assert!(!source.has_data("AR"));

        let group = source.load_definitions(&nested_id).unwrap().unwrap();
        assert_eq!(group.parents, Some(vec!["BR".to_string(), "SC".to_string()]));
    }

    #[test]
    fn test_json_directory_source_file_removed_after_has_data() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("BR.json");
        fs::write(&file, BR_JSON).unwrap();

        let source = JsonDirectorySource::new(dir.path());
        assert!(source.has_data("BR"));
        fs::remove_file(&file).unwrap();

        match source.load_definitions("BR") {
            Err(RepositoryError::Io { group_id, source }) => {
                assert_eq!(group_id, "BR");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_json_directory_source_rejects_path_escape() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonDirectorySource::new(dir.path().join("subdivision"));
        assert!(!source.has_data("../BR"));
        assert!(source.load_definitions("../BR").unwrap().is_none());
    }

    #[test]
    fn test_json_directory_source_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("BR.json"), "{ broken").unwrap();

        let source = JsonDirectorySource::new(dir.path());
        assert!(source.has_data("BR"));
        assert!(matches!(
            source.load_definitions("BR"),
            Err(RepositoryError::Json { .. })
        ));
    }

    #[test]
    fn test_shared_source() {
        let mut source = MemorySource::new();
        source.insert_json(BR_JSON).unwrap();
        let shared: Arc<dyn DefinitionSource> = Arc::new(source);
        assert!(shared.has_data("BR"));
    }
}
