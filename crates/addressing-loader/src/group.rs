//! Definition group identifiers.
//!
//! Sibling subdivisions are stored and cached together as a group. The
//! top-level group of a country is named by the country code itself. Nested
//! groups are named `<country code>-<digest>`, where the digest is the first
//! 32 hex characters of the SHA-256 of the remaining parent codes, each
//! prefixed with its byte length as a big-endian `u64`. The prefix keeps
//! `["A-B"]` and `["A", "B"]` apart. Group names stay ASCII-safe and stable
//! across runs, so pre-built definition files can be located by name.

use sha2::{Digest, Sha256};

use crate::types::{RepositoryError, RepositoryResult};

/// Number of hex characters kept from the parent digest.
pub const DIGEST_LENGTH: usize = 32;

/// Builds the group identifier for a parent path.
///
/// The first element is the country code.
///
/// # Examples
///
/// ```
/// use addressing_loader::group_id;
///
/// assert_eq!(group_id(&["BR"]).unwrap(), "BR");
/// assert_eq!(group_id(&["BR", "SC"]).unwrap(), "BR-0baf2fed68a508c6359f7f898d8130d5");
/// ```
///
/// # Errors
/// Returns [`RepositoryError::EmptyParents`] if `parents` is empty.
pub fn group_id<S: AsRef<str>>(parents: &[S]) -> RepositoryResult<String> {
    let (country_code, rest) = parents.split_first().ok_or(RepositoryError::EmptyParents)?;
    let country_code = country_code.as_ref();

    if rest.is_empty() {
        return Ok(country_code.to_string());
    }

    Ok(format!("{}-{}", country_code, parent_digest(rest)))
}

/// Computes the digest of an ordered list of parent codes.
pub fn parent_digest<S: AsRef<str>>(codes: &[S]) -> String {
    let mut hasher = Sha256::new();
    for code in codes {
        let code = code.as_ref().as_bytes();
        hasher.update((code.len() as u64).to_be_bytes());
        hasher.update(code);
    }

    let mut digest = hex::encode(hasher.finalize());
    digest.truncate(DIGEST_LENGTH);
    digest
}

/// Returns true if `group_id` only contains characters valid in a group name.
///
/// Used by file-backed sources to reject identifiers that could escape the
/// definition directory.
pub fn is_valid_group_id(group_id: &str) -> bool {
    !group_id.is_empty()
        && group_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
