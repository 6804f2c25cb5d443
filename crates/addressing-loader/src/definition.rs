//! Raw subdivision definition records.
//!
//! A definition group is a JSON document such as:
//!
//! ```json
//! {
//!     "country_code": "BR",
//!     "parents": ["BR", "SC"],
//!     "locale": "pt",
//!     "subdivisions": {
//!         "Abelardo Luz": {},
//!         "Florianópolis": { "has_children": true }
//!     }
//! }
//! ```
//!
//! `parents` is omitted for top-level groups. Entries keep the order in which
//! they are declared.

use addressing_types::{PostalCodePatternType, SubdivisionFields};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{RepositoryError, RepositoryResult};

/// A group of sibling subdivision definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Country code shared by every subdivision in the group.
    pub country_code: String,
    /// Parent path, starting with the country code. Omitted for the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
    /// Locale of the local codes and names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Subdivision records keyed by code, in declaration order.
    #[serde(default)]
    pub subdivisions: IndexMap<String, SubdivisionRecord>,
}

impl GroupDefinition {
    /// Parses a definition group from JSON.
    ///
    /// `group_id` is only used for error reporting.
    pub fn from_json_str(group_id: &str, json: &str) -> RepositoryResult<Self> {
        serde_json::from_str(json).map_err(|source| RepositoryError::Json {
            group_id: group_id.to_string(),
            source,
        })
    }

    /// Returns the parent path of this group.
    ///
    /// Falls back to the country code alone when `parents` is omitted.
    pub fn parent_path(&self) -> Vec<String> {
        self.parents
            .clone()
            .unwrap_or_else(|| vec![self.country_code.clone()])
    }
}

/// A single subdivision record within a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubdivisionRecord {
    /// Latin-script name. Defaults to the code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Code in the local script.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_code: Option<String>,
    /// Name in the local script. Defaults to the local code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_name: Option<String>,
    /// ISO 3166-2 code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_code: Option<String>,
    /// Postal code pattern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code_pattern: Option<String>,
    /// How the postal code pattern is applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code_pattern_type: Option<PostalCodePatternType>,
    /// Whether a child group exists for this subdivision.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub has_children: bool,
}

impl SubdivisionRecord {
    /// Converts the record into subdivision fields.
    ///
    /// Fills in the group-level country code and locale, and the defaults
    /// for omitted names.
    pub fn into_fields(
        self,
        code: String,
        country_code: &str,
        locale: Option<&str>,
    ) -> SubdivisionFields {
        let name = self.name.unwrap_or_else(|| code.clone());
        let local_name = self.local_name.or_else(|| self.local_code.clone());

        SubdivisionFields {
            country_code: country_code.to_string(),
            code,
            local_code: self.local_code,
            name,
            local_name,
            iso_code: self.iso_code,
            postal_code_pattern: self.postal_code_pattern,
            postal_code_pattern_type: self.postal_code_pattern_type.unwrap_or_default(),
            locale: locale.map(str::to_string),
        }
    }
}
