use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Characters an identifier may contain.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of the random prefix of a generated identifier.
pub const RANDOM_LEN: usize = 10;

/// Length of the url-derived suffix of a generated identifier.
pub const SUFFIX_LEN: usize = 6;

/// Total identifier length.
pub const ID_LEN: usize = RANDOM_LEN + SUFFIX_LEN;

/// A short identifier for a saved url.
///
/// Identifiers are exactly [`ID_LEN`] characters drawn from [`ALPHABET`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    /// Creates a new `Identifier` after validating the input.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates an `Identifier` without validation.
    ///
    /// Use this only for values produced by the generator.
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The random prefix of the identifier.
    ///
    /// For an unchecked value that cannot be split after [`RANDOM_LEN`]
    /// bytes, the whole value is returned.
    pub fn random_part(&self) -> &str {
        self.0.get(..RANDOM_LEN).unwrap_or(self.0.as_str())
    }

    /// The url-derived suffix of the identifier.
    ///
    /// Empty whenever [`Identifier::random_part`] covers the whole value.
    pub fn suffix(&self) -> &str {
        self.0.get(RANDOM_LEN..).unwrap_or_default()
    }

    /// Generates the full short url based on the provided base url.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }

    fn validate(id: &str) -> Result<(), CoreError> {
        if id.len() != ID_LEN {
            return Err(CoreError::InvalidIdentifier(format!(
                "length must be {}, got {}",
                ID_LEN,
                id.len()
            )));
        }

        if !id.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(CoreError::InvalidIdentifier(format!(
                "must contain only alphanumeric characters: '{}'",
                id
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for Identifier {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_identifiers() {
        assert!(Identifier::new("abcdefghij012345").is_ok());
        assert!(Identifier::new("doesnotexist0000").is_ok());
        assert!(Identifier::new("ZZZZZZZZZZ999999").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(Identifier::new("").is_err());
        assert!(Identifier::new("notfound").is_err());
        assert!(Identifier::new("a".repeat(17)).is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(Identifier::new("abcdefghij01234-").is_err());
        assert!(Identifier::new("abcdefghij0123/5").is_err());
        assert!(Identifier::new("abcdefghij0123+5").is_err());
    }

    #[test]
    fn splits_random_part_and_suffix() {
        let id = Identifier::new("abcdefghij012345").unwrap();
        assert_eq!(id.random_part(), "abcdefghij");
        assert_eq!(id.suffix(), "012345");
    }

    #[test]
    fn split_of_unchecked_value_never_panics() {
        // Byte 10 falls inside the fifth 'é'.
        let id = Identifier::new_unchecked("aéééééééé");
        assert_eq!(id.random_part(), "aéééééééé");
        assert_eq!(id.suffix(), "");

        let short = Identifier::new_unchecked("abc");
        assert_eq!(short.random_part(), "abc");
        assert_eq!(short.suffix(), "");

        let multibyte_suffix = Identifier::new_unchecked("abcdefghijéé");
        assert_eq!(multibyte_suffix.random_part(), "abcdefghij");
        assert_eq!(multibyte_suffix.suffix(), "éé");
    }

    #[test]
    fn to_url_trims_trailing_slash() {
        let id = Identifier::new("abcdefghij012345").unwrap();
        assert_eq!(id.to_url("localhost:8000"), "localhost:8000/abcdefghij012345");
        assert_eq!(
            id.to_url("https://short.ly/"),
            "https://short.ly/abcdefghij012345"
        );
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let ok: Identifier = serde_json::from_str("\"abcdefghij012345\"").unwrap();
        assert_eq!(ok.as_str(), "abcdefghij012345");
        assert!(serde_json::from_str::<Identifier>("\"short\"").is_err());
    }
}
