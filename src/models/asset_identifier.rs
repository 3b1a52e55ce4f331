use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid asset identifier {value:?}: identifiers must not be empty")]
pub struct IdentifierError {
    value: String,
}

/// Caller-supplied token naming an asset (e.g. "bitcoin").
///
/// The value is kept verbatim: it is the lookup key against the upstream
/// price API. Only the consolidated output uppercases it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetIdentifier(String);

impl AssetIdentifier {
    /// Create an identifier, rejecting empty strings.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        if value.is_empty() {
            Err(IdentifierError { value })
        } else {
            Ok(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercased form used in the consolidated response.
    pub fn to_display_id(&self) -> String {
        self.0.to_uppercase()
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for AssetIdentifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssetIdentifier> for String {
    fn from(value: AssetIdentifier) -> Self {
        value.0
    }
}

impl AsRef<str> for AssetIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keeps_value_verbatim() {
        let id = AssetIdentifier::new("Bitcoin").unwrap();
        assert_eq!(id.as_str(), "Bitcoin");
        assert_eq!(id.to_string(), "Bitcoin");
    }

    #[test]
    fn test_new_rejects_empty() {
        let err = AssetIdentifier::new("").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_display_id_is_uppercase() {
        let id = AssetIdentifier::new("usd-coin").unwrap();
        assert_eq!(id.to_display_id(), "USD-COIN");
    }

    #[test]
    fn test_serde_rejects_empty() {
        assert!(serde_json::from_str::<AssetIdentifier>(r#""""#).is_err());
        let id: AssetIdentifier = serde_json::from_str(r#""ethereum""#).unwrap();
        assert_eq!(id.as_str(), "ethereum");
    }
}
