//! Shared types used across the Prospect workspace.
//!
//! This module defines common newtypes that provide type safety
//! and clear domain modeling.

use crate::error::ProspectError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for the upstream API key with validation.
///
/// The key is sent as a per-request header; it must be non-empty after
/// trimming. `Debug` and `Display` redact the value so the key never
/// reaches logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// Create a new `ApiKey` from a string.
    ///
    /// # Errors
    /// Returns error if the key is empty or whitespace-only.
    pub fn new(key: impl Into<String>) -> Result<Self, ProspectError> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return Err(ProspectError::Validation(
                "API key must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value for request headers.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***")
    }
}

/// Newtype for upstream person identifiers with validation.
///
/// Person IDs are opaque strings assigned by the upstream API; they must be
/// non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    /// Create a new `PersonId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, ProspectError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ProspectError::Validation(
                "person id must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_valid() {
        let key = ApiKey::new("abc123").expect("valid key");
        assert_eq!(key.as_str(), "abc123");
    }

    #[test]
    fn test_api_key_trims() {
        let key = ApiKey::new("  abc123  ").expect("valid key");
        assert_eq!(key.as_str(), "abc123");
    }

    #[test]
    fn test_api_key_empty_rejected() {
        assert!(ApiKey::new("").is_err());
        assert!(ApiKey::new("   ").is_err());
    }

    #[test]
    fn test_api_key_debug_redacted() {
        let key = ApiKey::new("super-secret").expect("valid key");
        let debug = format!("{key:?}");
        assert!(!debug.contains("super-secret"));
        assert_eq!(key.to_string(), "***");
    }

    #[test]
    fn test_person_id_valid() {
        let id = PersonId::new("5f3a9c0012ab").expect("valid id");
        assert_eq!(id.as_str(), "5f3a9c0012ab");
        assert_eq!(id.to_string(), "5f3a9c0012ab");
    }

    #[test]
    fn test_person_id_empty_rejected() {
        assert!(PersonId::new("").is_err());
        assert!(PersonId::new(" \t ").is_err());
    }
}
