//! Postal code patterns.
//!
//! A pattern is either a regular expression wrapped in slashes
//! (`/(35|38)[0-9]{3}/`) or a comma-separated list of codes and inclusive
//! ranges (`98, 100:200, 250`).
//!
//! ## Example
//!
//! ```rust
//! use addressing_zone::postal_code::{self, PostalCodePattern};
//!
//! let pattern = PostalCodePattern::parse("98, 100:200, 250").unwrap();
//! assert!(pattern.is_match("150"));
//! assert!(!pattern.is_match("99"));
//!
//! // Exclusions win over inclusions
//! assert!(!postal_code::matches(Some("150"), Some("100:200"), Some("150")).unwrap());
//! ```

use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use addressing_types::{PostalCodePatternType, Subdivision};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::error::PatternError;

/// Patterns compiled by [`matches`], keyed by their source text.
static PATTERNS: Lazy<RwLock<HashMap<String, Arc<PostalCodePattern>>>> =
    Lazy::new(Default::default);

/// Anchored subdivision patterns, keyed by type and source text.
static SUBDIVISION_PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> = Lazy::new(Default::default);

/// A single entry of a code list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeToken {
    /// Matches one postal code exactly.
    Literal(String),
    /// Matches every postal code between two bounds, inclusive.
    Range {
        /// Lower bound.
        start: String,
        /// Upper bound.
        end: String,
    },
}

impl CodeToken {
    fn parse(token: &str) -> Result<Self, PatternError> {
        let Some((start, end)) = token.split_once(':') else {
            return Ok(Self::Literal(token.to_string()));
        };

        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(PatternError::InvalidRange {
                token: token.to_string(),
            });
        }

        Ok(Self::Range {
            start: start.to_string(),
            end: end.to_string(),
        })
    }

    /// Returns true if the postal code matches this token.
    ///
    /// Ranges with numeric bounds compare numerically and only accept
    /// numeric codes. Other ranges compare lexicographically; if both bounds
    /// have the same length, the code must have that length too.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Literal(code) => code == value,
            Self::Range { start, end } => {
                if is_numeric(start) && is_numeric(end) {
                    is_numeric(value)
                        && compare_numeric(value, start) != Ordering::Less
                        && compare_numeric(value, end) != Ordering::Greater
                } else {
                    if start.len() == end.len() && value.len() != start.len() {
                        return false;
                    }
                    value >= start.as_str() && value <= end.as_str()
                }
            }
        }
    }
}

/// A parsed postal code pattern.
#[derive(Debug, Clone)]
pub enum PostalCodePattern {
    /// A regular expression, matched anywhere in the postal code.
    Regex(Regex),
    /// A list of codes and ranges.
    CodeList(Vec<CodeToken>),
}

impl PostalCodePattern {
    /// Parses a pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use addressing_zone::postal_code::PostalCodePattern;
    ///
    /// let pattern = PostalCodePattern::parse("/(35|38)[0-9]{3}/").unwrap();
    /// assert!(pattern.is_match("35123"));
    /// assert!(!pattern.is_match("40000"));
    ///
    /// let pattern = PostalCodePattern::parse(" 98 , 100:200,").unwrap();
    /// assert_eq!(pattern.tokens().unwrap().len(), 2);
    /// assert!(PostalCodePattern::parse("/(/").is_err());
    /// ```
    ///
    /// # Errors
    /// Returns [`PatternError::InvalidRegex`] if a `/.../` body does not
    /// compile, or [`PatternError::InvalidRange`] for a range with an empty
    /// bound.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let pattern = pattern.trim();

        if pattern.len() >= 2 && pattern.starts_with('/') && pattern.ends_with('/') {
            let body = &pattern[1..pattern.len() - 1];
            let regex = Regex::new(body).map_err(|source| PatternError::InvalidRegex {
                pattern: pattern.to_string(),
                source,
            })?;
            return Ok(Self::Regex(regex));
        }

        let tokens = pattern
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(CodeToken::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::CodeList(tokens))
    }

    /// Returns true if the postal code matches the pattern.
    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Self::Regex(regex) => regex.is_match(value),
            Self::CodeList(tokens) => tokens.iter().any(|token| token.is_match(value)),
        }
    }

    /// Returns the tokens of a code list, or `None` for a regex.
    pub fn tokens(&self) -> Option<&[CodeToken]> {
        match self {
            Self::Regex(_) => None,
            Self::CodeList(tokens) => Some(tokens),
        }
    }
}

impl FromStr for PostalCodePattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Checks a postal code against included and excluded patterns.
///
/// Empty pattern strings count as absent. Compiled patterns are cached for
/// the lifetime of the process.
///
/// # Errors
/// Returns a [`PatternError`] if either pattern is malformed.
pub fn matches(
    value: Option<&str>,
    included: Option<&str>,
    excluded: Option<&str>,
) -> Result<bool, PatternError> {
    let included = non_empty(included).map(compiled).transpose()?;
    let excluded = non_empty(excluded).map(compiled).transpose()?;

    Ok(matches_compiled(value, included.as_deref(), excluded.as_deref()))
}

/// Checks a postal code against already parsed patterns.
///
/// An absent or empty postal code only matches when there are no patterns.
/// An excluded match always loses; otherwise the included pattern decides,
/// and a missing included pattern accepts every code.
pub fn matches_compiled(
    value: Option<&str>,
    included: Option<&PostalCodePattern>,
    excluded: Option<&PostalCodePattern>,
) -> bool {
    if included.is_none() && excluded.is_none() {
        return true;
    }

    let Some(value) = non_empty(value) else {
        return false;
    };

    if excluded.is_some_and(|pattern| pattern.is_match(value)) {
        return false;
    }

    included.map_or(true, |pattern| pattern.is_match(value))
}

/// Checks a postal code against the pattern of a subdivision.
///
/// The pattern is anchored at the start of the postal code, or at both ends
/// for [`PostalCodePatternType::Full`], and matched case-insensitively.
/// Subdivisions without a pattern accept every postal code.
pub fn matches_subdivision_pattern(
    subdivision: &Subdivision,
    postal_code: &str,
) -> Result<bool, PatternError> {
    let Some(pattern) = subdivision.postal_code_pattern() else {
        return Ok(true);
    };

    let pattern_type = subdivision.postal_code_pattern_type();
    let key = format!("{}:{}", pattern_type, pattern);

    let cached = SUBDIVISION_PATTERNS.read().get(&key).cloned();
    let regex = match cached {
        Some(regex) => regex,
        None => {
            let anchored = match pattern_type {
                PostalCodePatternType::Start => format!("^(?:{})", pattern),
                PostalCodePatternType::Full => format!("^(?:{})$", pattern),
            };
            let regex = RegexBuilder::new(&anchored)
                .case_insensitive(true)
                .build()
                .map_err(|source| PatternError::InvalidRegex {
                    pattern: pattern.to_string(),
                    source,
                })?;
            SUBDIVISION_PATTERNS.write().insert(key, regex.clone());
            regex
        }
    };

    Ok(regex.is_match(postal_code))
}

/// Returns the cached compiled form of a pattern, parsing it on first use.
fn compiled(pattern: &str) -> Result<Arc<PostalCodePattern>, PatternError> {
    if let Some(pattern) = PATTERNS.read().get(pattern) {
        return Ok(Arc::clone(pattern));
    }

    let parsed = Arc::new(PostalCodePattern::parse(pattern)?);
    trace!(pattern, "compiled postal code pattern");

    let mut patterns = PATTERNS.write();
    Ok(Arc::clone(
        patterns.entry(pattern.to_string()).or_insert(parsed),
    ))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Compares two digit strings as numbers of any length.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use addressing_types::SubdivisionFields;

    #[test]
    fn test_code_list() {
        let pattern = PostalCodePattern::parse("98, 100:200, 250").unwrap();
        assert!(pattern.is_match("98"));
        assert!(pattern.is_match("100"));
        assert!(pattern.is_match("150"));
        assert!(pattern.is_match("200"));
        assert!(pattern.is_match("250"));
        assert!(!pattern.is_match("99"));
        assert!(!pattern.is_match("201"));
        assert!(!pattern.is_match("2500"));

        assert_eq!(
            pattern.tokens().unwrap(),
            &[
                CodeToken::Literal("98".to_string()),
                CodeToken::Range {
                    start: "100".to_string(),
                    end: "200".to_string()
                },
                CodeToken::Literal("250".to_string()),
            ]
        );
    }

    #[test]
    fn test_regex() {
        let pattern: PostalCodePattern = "/(35|38)[0-9]{3}/".parse().unwrap();
        assert!(pattern.tokens().is_none());
        assert!(pattern.is_match("35123"));
        assert!(pattern.is_match("38000"));
        assert!(!pattern.is_match("40000"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            PostalCodePattern::parse("/[0-9/"),
            Err(PatternError::InvalidRegex { .. })
        ));
        assert!(matches!(
            PostalCodePattern::parse("98, 100:"),
            Err(PatternError::InvalidRange { ref token }) if token == "100:"
        ));
        assert!(matches!(
            PostalCodePattern::parse(":200"),
            Err(PatternError::InvalidRange { .. })
        ));
        assert!(matches(Some("123"), Some("/(/"), None).is_err());
    }

    #[test]
    fn test_single_slash_is_a_literal() {
        let pattern = PostalCodePattern::parse("/").unwrap();
        assert!(pattern.is_match("/"));
    }

    #[test]
    fn test_numeric_ranges() {
        let range = CodeToken::Range {
            start: "0100".to_string(),
            end: "0999".to_string(),
        };
        assert!(range.is_match("0500"));
        assert!(range.is_match("500"));
        assert!(!range.is_match("1000"));
        assert!(!range.is_match("05A0"));

        let wide = CodeToken::Range {
            start: "1".to_string(),
            end: "99999999999999999999999".to_string(),
        };
        assert!(wide.is_match("12345678901234567890"));
        assert!(!wide.is_match("0"));
    }

    #[test]
    fn test_alphanumeric_ranges() {
        let pattern = PostalCodePattern::parse("A100:A200").unwrap();
        assert!(pattern.is_match("A150"));
        assert!(!pattern.is_match("A1500"));
        assert!(!pattern.is_match("B150"));

        let uneven = PostalCodePattern::parse("A:AZ").unwrap();
        assert!(uneven.is_match("AB"));
        assert!(!uneven.is_match("B"));
    }

    #[test]
    fn test_matches_precedence() {
        assert!(matches(Some("150"), Some("98, 100:200, 250"), None).unwrap());
        assert!(!matches(Some("99"), Some("98, 100:200, 250"), None).unwrap());

        assert!(!matches(Some("150"), Some("100:200"), Some("150")).unwrap());
        assert!(matches(Some("151"), Some("100:200"), Some("150")).unwrap());

        assert!(matches(Some("300"), None, Some("100:200")).unwrap());
        assert!(!matches(Some("123"), None, Some("100:200")).unwrap());

        assert!(matches(Some("35123"), Some("/(35|38)[0-9]{3}/"), None).unwrap());
        assert!(!matches(Some("40000"), Some("/(35|38)[0-9]{3}/"), None).unwrap());
    }

    #[test]
    fn test_matches_missing_value() {
        assert!(matches(None, None, None).unwrap());
        assert!(matches(Some(""), None, None).unwrap());
        assert!(matches(Some(""), Some(""), Some("")).unwrap());
        assert!(!matches(None, Some("100:200"), None).unwrap());
        assert!(!matches(Some(""), None, Some("100:200")).unwrap());
    }

    #[test]
    fn test_matches_compiled() {
        let included = PostalCodePattern::parse("100:200").unwrap();
        let excluded = PostalCodePattern::parse("150").unwrap();
        assert!(matches_compiled(Some("120"), Some(&included), Some(&excluded)));
        assert!(!matches_compiled(Some("150"), Some(&included), Some(&excluded)));
        assert!(!matches_compiled(None, Some(&included), None));
        assert!(matches_compiled(None, None, None));
    }

    #[test]
    fn test_compiled_patterns_are_cached() {
        let first = compiled("7000:7999").unwrap();
        let second = compiled("7000:7999").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    fn subdivision(pattern: Option<&str>, pattern_type: PostalCodePatternType) -> Subdivision {
        Subdivision::new(
            SubdivisionFields {
                country_code: "BR".to_string(),
                code: "SC".to_string(),
                name: "Santa Catarina".to_string(),
                postal_code_pattern: pattern.map(str::to_string),
                postal_code_pattern_type: pattern_type,
                ..Default::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_subdivision_pattern_start() {
        let sc = subdivision(Some("8[89]"), PostalCodePatternType::Start);
        assert!(matches_subdivision_pattern(&sc, "88000-000").unwrap());
        assert!(matches_subdivision_pattern(&sc, "89830-000").unwrap());
        assert!(!matches_subdivision_pattern(&sc, "01000-000").unwrap());
        assert!(!matches_subdivision_pattern(&sc, "0088").unwrap());
    }

    #[test]
    fn test_subdivision_pattern_full() {
        let area = subdivision(Some("K[0-9]{2}"), PostalCodePatternType::Full);
        assert!(matches_subdivision_pattern(&area, "K12").unwrap());
        assert!(matches_subdivision_pattern(&area, "k12").unwrap());
        assert!(!matches_subdivision_pattern(&area, "K123").unwrap());
    }

    #[test]
    fn test_subdivision_without_pattern() {
        let sc = subdivision(None, PostalCodePatternType::Start);
        assert!(matches_subdivision_pattern(&sc, "anything").unwrap());

        let broken = subdivision(Some("("), PostalCodePatternType::Start);
        assert!(matches_subdivision_pattern(&broken, "123").is_err());
    }
}
