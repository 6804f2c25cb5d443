//! # addressing-zone
//!
//! Zone matching for postal addresses.
//!
//! A [`Zone`] is a named list of [`ZoneTerritory`] rules. A territory matches
//! an address when the country is equal, every area field the territory sets
//! is equal, and the postal code passes the territory's included and excluded
//! [`postal_code`] patterns.
//!
//! ## Usage
//!
//! ```rust
//! use addressing_types::Address;
//! use addressing_zone::{ZoneTerritory, ZoneTerritoryDefinition};
//!
//! let territory = ZoneTerritory::new(ZoneTerritoryDefinition {
//!     country_code: "DE".to_string(),
//!     included_postal_codes: Some("10000:14999".to_string()),
//!     excluded_postal_codes: Some("12345".to_string()),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! assert!(territory.matches(&Address::new("DE").with_postal_code("10115")));
//! assert!(!territory.matches(&Address::new("DE").with_postal_code("12345")));
//! ```

#![warn(missing_docs)]

mod error;
pub mod postal_code;
mod territory;
mod zone;

// Re-export addressing-types for convenience
pub use addressing_types;

pub use error::{PatternError, ZoneError, ZoneResult};
pub use postal_code::{matches_subdivision_pattern, CodeToken, PostalCodePattern};
pub use territory::{ZoneTerritory, ZoneTerritoryDefinition};
pub use zone::{Zone, ZoneDefinition};
