//! Zone territories.
//!
//! A territory is a country, optionally narrowed down to an administrative
//! area, locality or dependent locality, and further filtered by postal
//! code patterns.

use addressing_types::{PostalAddress, ValidationError};
use serde::{Deserialize, Serialize};

use crate::error::{ZoneError, ZoneResult};
use crate::postal_code::{matches_compiled, PostalCodePattern};

/// Raw territory definition, as found in zone configuration files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTerritoryDefinition {
    /// Country code. Required.
    pub country_code: String,
    /// Administrative area code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub administrative_area: Option<String>,
    /// Locality code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
    /// Dependent locality code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependent_locality: Option<String>,
    /// Pattern of the postal codes that belong to the territory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_postal_codes: Option<String>,
    /// Pattern of the postal codes excluded from the territory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_postal_codes: Option<String>,
}

/// A postal code pattern together with its source text.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    pattern: PostalCodePattern,
}

impl CompiledPattern {
    fn parse(source: Option<String>) -> ZoneResult<Option<Self>> {
        let Some(source) = non_empty(source) else {
            return Ok(None);
        };
        let pattern = PostalCodePattern::parse(&source)?;
        Ok(Some(Self { source, pattern }))
    }
}

/// A validated territory.
///
/// # Examples
///
/// ```
/// use addressing_types::Address;
/// use addressing_zone::{ZoneTerritory, ZoneTerritoryDefinition};
///
/// let territory = ZoneTerritory::new(ZoneTerritoryDefinition {
///     country_code: "BR".to_string(),
///     administrative_area: Some("SC".to_string()),
///     included_postal_codes: Some("/^8[89]/".to_string()),
///     ..Default::default()
/// })
/// .unwrap();
///
/// let address = Address::new("BR")
///     .with_administrative_area("SC")
///     .with_postal_code("89830-000");
/// assert!(territory.matches(&address));
///
/// let elsewhere = Address::new("BR").with_administrative_area("SP");
/// assert!(!territory.matches(&elsewhere));
/// ```
#[derive(Debug, Clone)]
pub struct ZoneTerritory {
    country_code: String,
    administrative_area: Option<String>,
    locality: Option<String>,
    dependent_locality: Option<String>,
    included_postal_codes: Option<CompiledPattern>,
    excluded_postal_codes: Option<CompiledPattern>,
}

impl ZoneTerritory {
    /// Creates a territory from its definition.
    ///
    /// Empty optional fields are treated as absent.
    ///
    /// # Errors
    /// Returns an error if the country code is missing, or if a postal code
    /// pattern is malformed.
    pub fn new(definition: ZoneTerritoryDefinition) -> ZoneResult<Self> {
        let ZoneTerritoryDefinition {
            country_code,
            administrative_area,
            locality,
            dependent_locality,
            included_postal_codes,
            excluded_postal_codes,
        } = definition;

        if country_code.is_empty() {
            return Err(ZoneError::Validation(ValidationError::MissingField {
                field: "country_code",
            }));
        }

        Ok(Self {
            country_code,
            administrative_area: non_empty(administrative_area),
            locality: non_empty(locality),
            dependent_locality: non_empty(dependent_locality),
            included_postal_codes: CompiledPattern::parse(included_postal_codes)?,
            excluded_postal_codes: CompiledPattern::parse(excluded_postal_codes)?,
        })
    }

    /// Returns the country code.
    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// Returns the administrative area code, if the territory is limited to one.
    pub fn administrative_area(&self) -> Option<&str> {
        self.administrative_area.as_deref()
    }

    /// Returns the locality code, if the territory is limited to one.
    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    /// Returns the dependent locality code, if the territory is limited to one.
    pub fn dependent_locality(&self) -> Option<&str> {
        self.dependent_locality.as_deref()
    }

    /// Returns the included postal codes pattern.
    pub fn included_postal_codes(&self) -> Option<&str> {
        self.included_postal_codes.as_ref().map(|p| p.source.as_str())
    }

    /// Returns the excluded postal codes pattern.
    pub fn excluded_postal_codes(&self) -> Option<&str> {
        self.excluded_postal_codes.as_ref().map(|p| p.source.as_str())
    }

    /// Returns true if the address belongs to the territory.
    pub fn matches<A: PostalAddress + ?Sized>(&self, address: &A) -> bool {
        if address.country_code() != self.country_code {
            return false;
        }
        if !field_matches(self.administrative_area(), address.administrative_area()) {
            return false;
        }
        if !field_matches(self.locality(), address.locality()) {
            return false;
        }
        if !field_matches(self.dependent_locality(), address.dependent_locality()) {
            return false;
        }

        matches_compiled(
            address.postal_code(),
            self.included_postal_codes.as_ref().map(|p| &p.pattern),
            self.excluded_postal_codes.as_ref().map(|p| &p.pattern),
        )
    }
}

impl TryFrom<ZoneTerritoryDefinition> for ZoneTerritory {
    type Error = ZoneError;

    fn try_from(definition: ZoneTerritoryDefinition) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}

/// An absent territory field matches any value.
fn field_matches(expected: Option<&str>, actual: Option<&str>) -> bool {
    expected.map_or(true, |expected| actual == Some(expected))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
