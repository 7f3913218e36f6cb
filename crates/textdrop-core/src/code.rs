use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated share code identifying a shared text record.
///
/// Codes are exactly [`ShareCode::LENGTH`] characters drawn from the
/// 36-symbol alphabet `[A-Z0-9]`. Input is case-insensitive: lowercase
/// letters are folded to uppercase during parsing, so two codes that
/// differ only in case compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareCode(String);

impl ShareCode {
    /// Number of characters in every share code.
    pub const LENGTH: usize = 5;

    /// The alphabet codes are drawn from.
    pub const ALPHABET: &'static [u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Parses a share code, normalizing it to uppercase.
    ///
    /// Valid codes are exactly 5 characters of `[a-zA-Z0-9]`.
    pub fn parse(code: impl AsRef<str>) -> Result<Self, CoreError> {
        let code = code.as_ref();

        if code.len() != Self::LENGTH {
            return Err(CoreError::InvalidCode(format!(
                "length must be exactly {}, got {}",
                Self::LENGTH,
                code.len()
            )));
        }

        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidCode(format!(
                "must contain only ascii letters and digits: '{}'",
                code
            )));
        }

        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Creates a `ShareCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. a generator drawing from [`ShareCode::ALPHABET`]).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the share code as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ShareCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_codes() {
        assert!(ShareCode::parse("AB3K9").is_ok());
        assert!(ShareCode::parse("00000").is_ok());
        assert!(ShareCode::parse("ZZZZZ").is_ok());
    }

    #[test]
    fn lowercase_is_normalized() {
        let code = ShareCode::parse("ab3k9").unwrap();
        assert_eq!(code.as_str(), "AB3K9");
        assert_eq!(code, ShareCode::parse("AB3K9").unwrap());
    }

    #[test]
    fn wrong_length() {
        assert!(ShareCode::parse("").is_err());
        assert!(ShareCode::parse("ABCD").is_err());
        assert!(ShareCode::parse("ABCDEF").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShareCode::parse("AB 9K").is_err());
        assert!(ShareCode::parse("AB-9K").is_err());
        assert!(ShareCode::parse("AB!9K").is_err());
    }

    #[test]
    fn multibyte_input_is_rejected() {
        assert!(ShareCode::parse("ABCDé").is_err());
    }

    #[test]
    fn display_matches_as_str() {
        let code = ShareCode::parse("ab3k9").unwrap();
        assert_eq!(code.to_string(), "AB3K9");
    }
}
