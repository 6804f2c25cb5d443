//! # addressing-types
//!
//! Type definitions for country subdivisions and postal addresses.
//!
//! This crate provides the [`Subdivision`] entity (a node in a country's
//! administrative hierarchy), the [`PostalAddress`] trait used by zone
//! matching, and the validation error raised when an entity is built from
//! incomplete data.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support for
//!   [`Address`] and [`PostalCodePatternType`] via serde.
//!
//! ## Usage
//!
//! ```rust
//! use addressing_types::{Address, PostalAddress, Subdivision, SubdivisionFields};
//!
//! let state = Subdivision::new(
//!     SubdivisionFields {
//!         country_code: "US".to_string(),
//!         code: "CA".to_string(),
//!         name: "California".to_string(),
//!         iso_code: Some("US-CA".to_string()),
//!         ..Default::default()
//!     },
//!     None,
//! )
//! .unwrap();
//!
//! let address = Address::new("US").with_administrative_area(state.code());
//! assert_eq!(address.administrative_area(), Some("CA"));
//! ```

#![warn(missing_docs)]

mod address;
mod enums;
mod error;
mod subdivision;

// Re-export all public types at crate root
pub use address::{Address, PostalAddress};
pub use enums::PostalCodePatternType;
pub use error::ValidationError;
pub use subdivision::{Subdivision, SubdivisionFields, SubdivisionMap};
