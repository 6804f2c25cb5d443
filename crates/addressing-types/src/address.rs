//! Postal address access.
//!
//! Addresses are owned by the caller. Zone matching only reads the fields
//! exposed by [`PostalAddress`], so any address type can take part by
//! implementing the trait.

/// Read-only view of the address fields used for subdivision and zone matching.
pub trait PostalAddress {
    /// Two-letter country code.
    fn country_code(&self) -> &str;

    /// Top-level subdivision code (state, province, ...).
    fn administrative_area(&self) -> Option<&str>;

    /// City or locality code.
    fn locality(&self) -> Option<&str>;

    /// Neighbourhood, district or suburb code.
    fn dependent_locality(&self) -> Option<&str>;

    /// Postal code.
    fn postal_code(&self) -> Option<&str>;
}

/// A plain address value.
///
/// # Examples
///
/// ```
/// use addressing_types::{Address, PostalAddress};
///
/// let address = Address::new("BR")
///     .with_administrative_area("SC")
///     .with_locality("Abelardo Luz")
///     .with_postal_code("89830-000");
///
/// assert_eq!(address.country_code(), "BR");
/// assert_eq!(address.locality(), Some("Abelardo Luz"));
/// assert_eq!(address.dependent_locality(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct Address {
    /// Two-letter country code.
    pub country_code: String,
    /// Administrative area code.
    pub administrative_area: Option<String>,
    /// Locality code.
    pub locality: Option<String>,
    /// Dependent locality code.
    pub dependent_locality: Option<String>,
    /// Postal code.
    pub postal_code: Option<String>,
}

impl Address {
    /// Creates an address with only a country code.
    pub fn new(country_code: impl Into<String>) -> Self {
        Self {
            country_code: country_code.into(),
            ..Default::default()
        }
    }

    /// Sets the administrative area.
    pub fn with_administrative_area(mut self, value: impl Into<String>) -> Self {
        self.administrative_area = Some(value.into());
        self
    }

    /// Sets the locality.
    pub fn with_locality(mut self, value: impl Into<String>) -> Self {
        self.locality = Some(value.into());
        self
    }

    /// Sets the dependent locality.
    pub fn with_dependent_locality(mut self, value: impl Into<String>) -> Self {
        self.dependent_locality = Some(value.into());
        self
    }

    /// Sets the postal code.
    pub fn with_postal_code(mut self, value: impl Into<String>) -> Self {
        self.postal_code = Some(value.into());
        self
    }
}

impl PostalAddress for Address {
    fn country_code(&self) -> &str {
        &self.country_code
    }

    fn administrative_area(&self) -> Option<&str> {
        self.administrative_area.as_deref()
    }

    fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    fn dependent_locality(&self) -> Option<&str> {
        self.dependent_locality.as_deref()
    }

    fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }
}
