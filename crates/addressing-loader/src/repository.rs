//! Lazy, cached subdivision repository.
//!
//! Subdivisions are loaded one group (one level of siblings) at a time, the
//! first time a caller asks for that level. Each group is built completely,
//! then published into the cache in a single step, so every caller sees
//! either nothing or the whole sibling set.
//!
//! ## Identity
//!
//! The cache owns every subdivision it has built. Repeated lookups of the
//! same path return the same `Arc`, and a child's [`Subdivision::parent`]
//! points at the instance held by its parent's group:
//!
//! ```ignore
//! let state = repository.get("SC", &["BR"])?.unwrap();
//! let city = repository.get("Abelardo Luz", &["BR", "SC"])?.unwrap();
//!
//! assert!(Arc::ptr_eq(&city.parent().unwrap(), &state));
//! assert!(Arc::ptr_eq(state.child("Abelardo Luz").unwrap(), &city));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use addressing_types::{Subdivision, SubdivisionMap};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, info, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::definition::GroupDefinition;
use crate::group::group_id;
use crate::locale;
use crate::source::DefinitionSource;
use crate::types::{RepositoryConfig, RepositoryError, RepositoryResult};

/// Cached outcome of a group lookup.
#[derive(Debug, Clone)]
enum GroupState {
    /// The source holds no data for this group.
    Absent,
    /// The group was loaded and built.
    Loaded(Arc<SubdivisionGroup>),
}

/// A subdivision together with the loading flag from its definition.
#[derive(Debug)]
struct GroupEntry {
    subdivision: Arc<Subdivision>,
    has_children: bool,
}

/// A fully built set of siblings.
#[derive(Debug)]
struct SubdivisionGroup {
    /// Canonical parent path (primary codes), starting with the country code.
    parents: Vec<String>,
    locale: Option<String>,
    entries: IndexMap<String, GroupEntry>,
}

impl SubdivisionGroup {
    /// Finds an entry by code, then local code, then ISO code.
    fn find(&self, code: &str) -> Option<&GroupEntry> {
        if let Some(entry) = self.entries.get(code) {
            return Some(entry);
        }
        self.entries
            .values()
            .find(|entry| entry.subdivision.local_code() == Some(code))
            .or_else(|| {
                self.entries
                    .values()
                    .find(|entry| entry.subdivision.iso_code() == Some(code))
            })
    }

    fn subdivisions(&self) -> SubdivisionMap {
        self.entries
            .iter()
            .map(|(code, entry)| (code.clone(), Arc::clone(&entry.subdivision)))
            .collect()
    }
}

/// Repository of country subdivisions backed by a [`DefinitionSource`].
///
/// # Example
///
/// ```
/// use addressing_loader::{MemorySource, SubdivisionRepository};
///
/// let mut source = MemorySource::new();
/// source.insert_json(r#"{
///     "country_code": "BR",
///     "locale": "pt",
///     "subdivisions": {
///         "SC": {"name": "Santa Catarina", "iso_code": "BR-SC", "has_children": true},
///         "SP": {"name": "São Paulo", "iso_code": "BR-SP", "has_children": true}
///     }
/// }"#).unwrap();
/// source.insert_json(r#"{
///     "country_code": "BR",
///     "parents": ["BR", "SC"],
///     "subdivisions": {"Abelardo Luz": {}}
/// }"#).unwrap();
///
/// let repository = SubdivisionRepository::new(source);
///
/// let state = repository.get("SC", &["BR"]).unwrap().unwrap();
/// assert_eq!(state.iso_code(), Some("BR-SC"));
///
/// let city = repository.get("Abelardo Luz", &["BR", "SC"]).unwrap().unwrap();
/// assert_eq!(city.parent().unwrap().code(), "SC");
///
/// let list = repository.get_list(&["BR"]).unwrap();
/// assert_eq!(list["SP"], "São Paulo");
/// assert!(repository.get_all(&["RS"]).unwrap().is_empty());
/// ```
pub struct SubdivisionRepository<S> {
    source: S,
    config: RepositoryConfig,
    /// Group id -> write-once cell. A cell without a value has not been loaded yet.
    groups: RwLock<HashMap<String, Arc<OnceCell<GroupState>>>>,
}

impl<S> std::fmt::Debug for SubdivisionRepository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubdivisionRepository")
            .field("config", &self.config)
            .field("groups", &self.groups.read().len())
            .finish()
    }
}

impl<S: DefinitionSource> SubdivisionRepository<S> {
    /// Creates a repository with the default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, RepositoryConfig::default())
    }

    /// Creates a repository with an explicit configuration.
    pub fn with_config(source: S, config: RepositoryConfig) -> Self {
        Self {
            source,
            config,
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the definition source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the repository configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    /// Gets a subdivision by code.
    ///
    /// The code is matched against the primary code first, then the local
    /// code, then the ISO code.
    ///
    /// # Arguments
    /// * `code` - The subdivision code
    /// * `parents` - The parent path, starting with the country code
    ///
    /// # Errors
    /// Returns an error if the parent path is empty, or if a definition group
    /// on the path cannot be read or contains invalid data.
    pub fn get<P: AsRef<str>>(
        &self,
        code: &str,
        parents: &[P],
    ) -> RepositoryResult<Option<Arc<Subdivision>>> {
        let Some(group) = self.resolve(parents)? else {
            return Ok(None);
        };
        Ok(group
            .find(code)
            .map(|entry| Arc::clone(&entry.subdivision)))
    }

    /// Gets all subdivisions under a parent path, in declaration order.
    ///
    /// Returns an empty map if no subdivisions exist at that level.
    pub fn get_all<P: AsRef<str>>(&self, parents: &[P]) -> RepositoryResult<SubdivisionMap> {
        Ok(self
            .resolve(parents)?
            .map(|group| group.subdivisions())
            .unwrap_or_default())
    }

    /// Gets a code -> name list of the subdivisions under a parent path.
    pub fn get_list<P: AsRef<str>>(
        &self,
        parents: &[P],
    ) -> RepositoryResult<IndexMap<String, String>> {
        self.get_list_localized(parents, None)
    }

    /// Gets a code -> name list, using local names when `locale` matches.
    ///
    /// Local names are used when the requested locale and the locale declared
    /// by the group share a fallback (`pt-BR` and `pt`, in either order).
    /// Subdivisions without a local name keep their latin name.
    pub fn get_list_localized<P: AsRef<str>>(
        &self,
        parents: &[P],
        locale: Option<&str>,
    ) -> RepositoryResult<IndexMap<String, String>> {
        let Some(group) = self.resolve(parents)? else {
            return Ok(IndexMap::new());
        };

        let use_local_name = match (locale, group.locale.as_deref()) {
            (Some(requested), Some(defined)) => locale::matches_candidates(requested, defined),
            _ => false,
        };

        Ok(group
            .entries
            .iter()
            .map(|(code, entry)| {
                let subdivision = &entry.subdivision;
                let name = if use_local_name {
                    subdivision.local_name().unwrap_or(subdivision.name())
                } else {
                    subdivision.name()
                };
                (code.clone(), name.to_string())
            })
            .collect())
    }

    /// Loads the groups for several parent paths ahead of time.
    ///
    /// With the `parallel` feature the paths are loaded concurrently.
    /// Returns how many of the paths hold subdivisions.
    pub fn preload(&self, paths: &[Vec<String>]) -> RepositoryResult<usize> {
        #[cfg(feature = "parallel")]
        let groups = paths
            .par_iter()
            .map(|path| self.resolve(path))
            .collect::<RepositoryResult<Vec<_>>>()?;

        #[cfg(not(feature = "parallel"))]
        let groups = paths
            .iter()
            .map(|path| self.resolve(path))
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok(groups.iter().filter(|group| group.is_some()).count())
    }

    /// Returns the number of groups with a cached outcome (loaded or absent).
    pub fn cached_group_count(&self) -> usize {
        self.groups
            .read()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Drops every cached group.
    ///
    /// Subdivisions handed out earlier stay valid, but their parents may no
    /// longer be reachable once nothing else holds them.
    pub fn clear_cache(&mut self) {
        self.groups.get_mut().clear();
    }

    /// Resolves the group holding the children of `parents`.
    fn resolve<P: AsRef<str>>(
        &self,
        parents: &[P],
    ) -> RepositoryResult<Option<Arc<SubdivisionGroup>>> {
        let Some((last, ancestors)) = parents.split_last() else {
            return Err(RepositoryError::EmptyParents);
        };

        if !self.config.allows_depth(parents.len()) {
            debug!(depth = parents.len(), "parent path exceeds the configured depth");
            return Ok(None);
        }

        if ancestors.is_empty() {
            let country_code = last.as_ref();
            let path = vec![country_code.to_string()];
            return self.load_group(country_code.to_string(), path, None);
        }

        let Some(parent_group) = self.resolve(ancestors)? else {
            return Ok(None);
        };

        let Some(parent) = parent_group.find(last.as_ref()) else {
            debug!(
                parent = last.as_ref(),
                "parent subdivision not found, skipping load"
            );
            return Ok(None);
        };

        if !parent.has_children {
            debug!(
                parent = parent.subdivision.code(),
                "parent subdivision has no children, skipping load"
            );
            return Ok(None);
        }

        let mut path = parent_group.parents.clone();
        path.push(parent.subdivision.code().to_string());
        let id = group_id(&path)?;

        self.load_group(id, path, Some(&parent.subdivision))
    }

    /// Returns the cached group for `id`, loading it on first use.
    ///
    /// Concurrent first loads of the same id wait on a single cell, so the
    /// source is read at most once per group. Errors are not cached.
    fn load_group(
        &self,
        id: String,
        parents: Vec<String>,
        parent: Option<&Arc<Subdivision>>,
    ) -> RepositoryResult<Option<Arc<SubdivisionGroup>>> {
        let cell = self.cell(&id);
        if cell.get().is_some() {
            trace!(group = %id, "subdivision group cache hit");
        }

        let state = cell.get_or_try_init(|| self.fetch_group(&id, parents, parent))?;

        Ok(match state {
            GroupState::Absent => None,
            GroupState::Loaded(group) => Some(Arc::clone(group)),
        })
    }

    fn cell(&self, id: &str) -> Arc<OnceCell<GroupState>> {
        let existing = self.groups.read().get(id).cloned();
        if let Some(cell) = existing {
            return cell;
        }

        let mut groups = self.groups.write();
        Arc::clone(groups.entry(id.to_string()).or_default())
    }

    fn fetch_group(
        &self,
        id: &str,
        parents: Vec<String>,
        parent: Option<&Arc<Subdivision>>,
    ) -> RepositoryResult<GroupState> {
        if !self.source.has_data(id) {
            debug!(group = %id, "no subdivision definitions");
            return Ok(GroupState::Absent);
        }

        debug!(group = %id, "loading subdivision definitions");
        let Some(definition) = self.source.load_definitions(id)? else {
            debug!(group = %id, "definition source returned no data");
            return Ok(GroupState::Absent);
        };

        let group = build_group(id, parents, definition, parent)?;
        info!(
            group = %id,
            count = group.entries.len(),
            "loaded subdivision group"
        );

        if let Some(parent) = parent {
            parent.attach_children(group.subdivisions());
        }

        Ok(GroupState::Loaded(Arc::new(group)))
    }
}

/// Builds every subdivision of a group, failing on the first invalid entry.
fn build_group(
    id: &str,
    parents: Vec<String>,
    definition: GroupDefinition,
    parent: Option<&Arc<Subdivision>>,
) -> RepositoryResult<SubdivisionGroup> {
    let GroupDefinition {
        country_code,
        parents: declared_parents,
        locale,
        subdivisions,
    } = definition;

    if let Some(declared) = declared_parents {
        if declared != parents {
            warn!(
                group = %id,
                declared = ?declared,
                requested = ?parents,
                "declared parents differ from the requested path"
            );
            return Err(RepositoryError::ParentMismatch {
                group_id: id.to_string(),
                declared,
                requested: parents,
            });
        }
    }
    if parents.first() != Some(&country_code) {
        warn!(
            group = %id,
            declared = %country_code,
            "declared country code differs from the requested path"
        );
    }

    let mut entries = IndexMap::with_capacity(subdivisions.len());
    for (code, record) in subdivisions {
        let has_children = record.has_children;
        let fields = record.into_fields(code.clone(), &country_code, locale.as_deref());
        let subdivision = Subdivision::new(fields, parent).map_err(|source| {
            RepositoryError::InvalidDefinition {
                group_id: id.to_string(),
                code: code.clone(),
                source,
            }
        })?;

        entries.insert(
            code,
            GroupEntry {
                subdivision: Arc::new(subdivision),
                has_children,
            },
        );
    }

    Ok(SubdivisionGroup {
        parents,
        locale,
        entries,
    })
}
