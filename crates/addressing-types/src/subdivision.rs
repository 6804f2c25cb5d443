//! Country subdivision entity.
//!
//! Subdivisions are hierarchical and have up to three levels:
//! administrative area -> locality -> dependent locality.
//!
//! A subdivision holds a weak reference to its parent and owns its children
//! once they have been attached. Children are attached at most once, by
//! whoever loads the next level of the hierarchy.

use std::sync::{Arc, OnceLock, Weak};

use indexmap::IndexMap;

use crate::{PostalCodePatternType, ValidationError};

/// Ordered mapping from subdivision code to subdivision, in declaration order.
pub type SubdivisionMap = IndexMap<String, Arc<Subdivision>>;

/// Field values used to construct a [`Subdivision`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubdivisionFields {
    /// Two-letter country code.
    pub country_code: String,
    /// Latin-script code stored on the address.
    pub code: String,
    /// Code in the local (non-latin) script.
    pub local_code: Option<String>,
    /// Latin-script name.
    pub name: String,
    /// Name in the local script.
    pub local_name: Option<String>,
    /// ISO 3166-2 code (administrative areas only).
    pub iso_code: Option<String>,
    /// Postal code pattern overriding the country-level pattern.
    pub postal_code_pattern: Option<String>,
    /// How the postal code pattern is applied.
    pub postal_code_pattern_type: PostalCodePatternType,
    /// Locale of the local code and name.
    pub locale: Option<String>,
}

/// A country subdivision.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use addressing_types::{Subdivision, SubdivisionFields};
///
/// let state = Arc::new(
///     Subdivision::new(
///         SubdivisionFields {
///             country_code: "BR".to_string(),
///             code: "SC".to_string(),
///             name: "Santa Catarina".to_string(),
///             iso_code: Some("BR-SC".to_string()),
///             ..Default::default()
///         },
///         None,
///     )
///     .unwrap(),
/// );
///
/// let city = Subdivision::new(
///     SubdivisionFields {
///         country_code: "BR".to_string(),
///         code: "Abelardo Luz".to_string(),
///         name: "Abelardo Luz".to_string(),
///         ..Default::default()
///     },
///     Some(&state),
/// )
/// .unwrap();
///
/// assert_eq!(city.parent_code(), Some("SC"));
/// assert_eq!(city.parent().unwrap().iso_code(), Some("BR-SC"));
/// assert!(!state.has_children());
/// ```
pub struct Subdivision {
    parent: Option<Weak<Subdivision>>,
    parent_code: Option<String>,
    country_code: String,
    code: String,
    local_code: Option<String>,
    name: String,
    local_name: Option<String>,
    iso_code: Option<String>,
    postal_code_pattern: Option<String>,
    postal_code_pattern_type: PostalCodePatternType,
    locale: Option<String>,
    children: OnceLock<SubdivisionMap>,
}

impl Subdivision {
    /// Creates a subdivision, optionally below `parent`.
    ///
    /// # Errors
    /// Returns [`ValidationError::MissingField`] if the country code, code or
    /// name is empty, and [`ValidationError::CountryMismatch`] if the parent
    /// belongs to a different country.
    pub fn new(
        fields: SubdivisionFields,
        parent: Option<&Arc<Subdivision>>,
    ) -> Result<Self, ValidationError> {
        let required = [
            ("country_code", &fields.country_code),
            ("code", &fields.code),
            ("name", &fields.name),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ValidationError::MissingField { field });
            }
        }

        if let Some(parent) = parent {
            if parent.country_code != fields.country_code {
                return Err(ValidationError::CountryMismatch {
                    parent: parent.country_code.clone(),
                    child: fields.country_code,
                });
            }
        }

        Ok(Self {
            parent: parent.map(Arc::downgrade),
            parent_code: parent.map(|p| p.code.clone()),
            country_code: fields.country_code,
            code: fields.code,
            local_code: fields.local_code,
            name: fields.name,
            local_name: fields.local_name,
            iso_code: fields.iso_code,
            postal_code_pattern: fields.postal_code_pattern,
            postal_code_pattern_type: fields.postal_code_pattern_type,
            locale: fields.locale,
            children: OnceLock::new(),
        })
    }

    /// Returns the parent subdivision.
    ///
    /// Returns `None` for administrative areas, and also when the owner of the
    /// parent (usually a repository cache) has been dropped.
    pub fn parent(&self) -> Option<Arc<Subdivision>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Returns the code of the parent subdivision, if any.
    pub fn parent_code(&self) -> Option<&str> {
        self.parent_code.as_deref()
    }

    /// Returns true if this subdivision has no parent (an administrative area).
    pub fn is_top_level(&self) -> bool {
        self.parent_code.is_none()
    }

    /// Returns the two-letter country code.
    ///
    /// This is a CLDR country code, which includes a few territories used for
    /// addressing purposes only (such as the Canary Islands, `IC`).
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the subdivision code.
    ///
    /// This is the value stored on the address, always in latin script.
    /// It can be an abbreviation ("CA") or a full name ("Grand Cayman").
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the code in the local script (Cyrillic, Chinese, ...), if any.
    pub fn local_code(&self) -> Option<&str> {
        self.local_code.as_deref()
    }

    /// Returns the latin-script name, used in dropdowns.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name in the local script, if any.
    pub fn local_name(&self) -> Option<&str> {
        self.local_name.as_deref()
    }

    /// Returns the ISO 3166-2 code, e.g. `US-CA` or `JP-01`.
    pub fn iso_code(&self) -> Option<&str> {
        self.iso_code.as_deref()
    }

    /// Returns the postal code pattern.
    ///
    /// Used instead of the country-level pattern when defined.
    pub fn postal_code_pattern(&self) -> Option<&str> {
        self.postal_code_pattern.as_deref()
    }

    /// Returns how [`Self::postal_code_pattern`] is applied.
    pub fn postal_code_pattern_type(&self) -> PostalCodePatternType {
        self.postal_code_pattern_type
    }

    /// Returns the locale of the local code and name.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Returns the loaded children in declaration order.
    pub fn children(&self) -> impl Iterator<Item = &Arc<Subdivision>> + '_ {
        self.children.get().into_iter().flat_map(|map| map.values())
    }

    /// Returns the loaded children as a map, or `None` if not attached yet.
    pub fn children_map(&self) -> Option<&SubdivisionMap> {
        self.children.get()
    }

    /// Returns a loaded child by code.
    pub fn child(&self, code: &str) -> Option<&Arc<Subdivision>> {
        self.children.get().and_then(|map| map.get(code))
    }

    /// Returns true if children have been loaded and there is at least one.
    pub fn has_children(&self) -> bool {
        self.children.get().is_some_and(|map| !map.is_empty())
    }

    /// Returns true if the child level has been attached.
    pub fn children_loaded(&self) -> bool {
        self.children.get().is_some()
    }

    /// Attaches the child level.
    ///
    /// Children can only be attached once; later calls leave the existing
    /// children untouched and return `false`.
    pub fn attach_children(&self, children: SubdivisionMap) -> bool {
        debug_assert!(children
            .values()
            .all(|child| child.parent_code() == Some(self.code.as_str())));
        self.children.set(children).is_ok()
    }
}

impl PartialEq for Subdivision {
    fn eq(&self, other: &Self) -> bool {
        self.country_code == other.country_code
            && self.code == other.code
            && self.parent_code == other.parent_code
            && self.local_code == other.local_code
            && self.name == other.name
            && self.local_name == other.local_name
            && self.iso_code == other.iso_code
            && self.postal_code_pattern == other.postal_code_pattern
            && self.postal_code_pattern_type == other.postal_code_pattern_type
            && self.locale == other.locale
    }
}

impl Eq for Subdivision {}

impl std::fmt::Debug for Subdivision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subdivision")
            .field("country_code", &self.country_code)
            .field("code", &self.code)
            .field("parent_code", &self.parent_code)
            .field("name", &self.name)
            .field("local_code", &self.local_code)
            .field("local_name", &self.local_name)
            .field("iso_code", &self.iso_code)
            .field("postal_code_pattern", &self.postal_code_pattern)
            .field("locale", &self.locale)
            .field("children", &self.children.get().map(|map| map.len()))
            .finish()
    }
}
