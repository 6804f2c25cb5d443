//! Zones.

use addressing_types::{PostalAddress, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{ZoneError, ZoneResult};
use crate::territory::{ZoneTerritory, ZoneTerritoryDefinition};

/// Raw zone definition.
///
/// ```json
/// {
///     "id": "south",
///     "label": "Southern Brazil",
///     "territories": [
///         {"country_code": "BR", "administrative_area": "SC"},
///         {"country_code": "BR", "administrative_area": "RS"}
///     ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneDefinition {
    /// Zone identifier. Required.
    pub id: String,
    /// Display label. Required.
    pub label: String,
    /// Territories, at least one.
    pub territories: Vec<ZoneTerritoryDefinition>,
}

/// A named group of territories.
///
/// # Examples
///
/// ```
/// use addressing_types::Address;
/// use addressing_zone::{Zone, ZoneDefinition};
///
/// let definition: ZoneDefinition = serde_json::from_str(r#"{
///     "id": "south",
///     "label": "Southern Brazil",
///     "territories": [
///         {"country_code": "BR", "administrative_area": "SC"},
///         {"country_code": "BR", "administrative_area": "RS"}
///     ]
/// }"#).unwrap();
/// let zone = Zone::new(definition).unwrap();
///
/// assert!(zone.matches(&Address::new("BR").with_administrative_area("RS")));
/// assert!(!zone.matches(&Address::new("BR").with_administrative_area("SP")));
/// ```
#[derive(Debug, Clone)]
pub struct Zone {
    id: String,
    label: String,
    territories: Vec<ZoneTerritory>,
}

impl Zone {
    /// Creates a zone from its definition, validating every territory.
    ///
    /// # Errors
    /// Returns an error if the id or label is empty, if there are no
    /// territories, or if a territory is invalid.
    pub fn new(definition: ZoneDefinition) -> ZoneResult<Self> {
        let ZoneDefinition {
            id,
            label,
            territories,
        } = definition;

        if id.is_empty() {
            return Err(ValidationError::MissingField { field: "id" }.into());
        }
        if label.is_empty() {
            return Err(ValidationError::MissingField { field: "label" }.into());
        }
        if territories.is_empty() {
            return Err(ZoneError::EmptyTerritories { zone: id });
        }

        let territories = territories
            .into_iter()
            .map(ZoneTerritory::new)
            .collect::<ZoneResult<Vec<_>>>()?;

        Ok(Self {
            id,
            label,
            territories,
        })
    }

    /// Returns the zone identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the territories, in definition order.
    pub fn territories(&self) -> &[ZoneTerritory] {
        &self.territories
    }

    /// Returns true if the address belongs to any of the territories.
    pub fn matches<A: PostalAddress + ?Sized>(&self, address: &A) -> bool {
        let matched = self
            .territories
            .iter()
            .any(|territory| territory.matches(address));
        trace!(zone = %self.id, matched, "zone match");
        matched
    }
}

impl TryFrom<ZoneDefinition> for Zone {
    type Error = ZoneError;

    fn try_from(definition: ZoneDefinition) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}
