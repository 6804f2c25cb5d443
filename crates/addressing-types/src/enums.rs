//! Enumeration types shared by subdivision definitions.

/// How a subdivision's postal code pattern is applied to a postal code.
///
/// # Examples
///
/// ```
/// use addressing_types::PostalCodePatternType;
///
/// assert_eq!(PostalCodePatternType::parse("full"), Some(PostalCodePatternType::Full));
/// assert_eq!(PostalCodePatternType::default(), PostalCodePatternType::Start);
/// assert_eq!(PostalCodePatternType::Full.as_str(), "full");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum PostalCodePatternType {
    /// The pattern must match the beginning of the postal code.
    #[default]
    Start,
    /// The pattern must match the entire postal code.
    Full,
}

impl PostalCodePatternType {
    /// Parses a pattern type from its lowercase name.
    ///
    /// Returns `None` if the name is not recognized.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "start" => Some(Self::Start),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// Returns the lowercase name of this pattern type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for PostalCodePatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for value in [PostalCodePatternType::Start, PostalCodePatternType::Full] {
            assert_eq!(PostalCodePatternType::parse(value.as_str()), Some(value));
        }
        assert_eq!(PostalCodePatternType::parse("partial"), None);
        assert_eq!(PostalCodePatternType::parse("FULL"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_lowercase() {
        let parsed: PostalCodePatternType = serde_json::from_str("\"full\"").unwrap();
        assert_eq!(parsed, PostalCodePatternType::Full);
        assert_eq!(
            serde_json::to_string(&PostalCodePatternType::Start).unwrap(),
            "\"start\""
        );
    }
}
