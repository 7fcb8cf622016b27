use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const SECTOR_CODE_LEN: usize = 4;
const MAX_SECURITY_CODE_LEN: usize = 12;

/// Four-character sector identifier, e.g. `0254`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectorCode(String);

impl SectorCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let valid = trimmed.chars().count() == SECTOR_CODE_LEN
            && trimmed.chars().all(|ch| ch.is_ascii_alphanumeric());
        if !valid {
            return Err(ValidationError::InvalidSectorCode {
                value: input.to_owned(),
            });
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Builds a code from the built-in catalog table, which is covered by tests.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SectorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SectorCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SectorCode> for String {
    fn from(value: SectorCode) -> Self {
        value.0
    }
}

/// Source-agnostic security code, e.g. `1928` or `130A`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecurityId(String);

impl SecurityId {
    /// Parse and normalize a security code to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySecurityCode);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SECURITY_CODE_LEN {
            return Err(ValidationError::SecurityCodeTooLong {
                len,
                max: MAX_SECURITY_CODE_LEN,
            });
        }

        for (index, ch) in normalized.chars().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return Err(ValidationError::SecurityCodeInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SecurityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for SecurityId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for SecurityId {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<SecurityId> for String {
    fn from(value: SecurityId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_security_code() {
        let parsed = SecurityId::parse(" 130a ").expect("code should parse");
        assert_eq!(parsed.as_str(), "130A");
    }

    #[test]
    fn rejects_ticker_suffix_in_security_code() {
        let err = SecurityId::parse("1928.T").expect_err("must fail");
        assert!(matches!(
            err,
            ValidationError::SecurityCodeInvalidChar { ch: '.', index: 4 }
        ));
    }

    #[test]
    fn rejects_empty_security_code() {
        let err = SecurityId::parse("   ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySecurityCode);
    }

    #[test]
    fn sector_code_requires_four_characters() {
        assert!(SectorCode::parse("0254").is_ok());
        assert!(SectorCode::parse("254").is_err());
        assert!(SectorCode::parse("02540").is_err());
        assert!(SectorCode::parse("02-4").is_err());
    }

    #[test]
    fn codes_deserialize_through_validation() {
        let err = serde_json::from_str::<SectorCode>("\"12\"");
        assert!(err.is_err());

        let code: SecurityId = serde_json::from_str("\"8058\"").expect("valid code");
        assert_eq!(code.as_str(), "8058");
    }
}
