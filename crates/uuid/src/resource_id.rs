//! Implementation of the FHIR logical id wrapper.

use crate::{ResourceIdError, ResourceIdResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Prefix used for bundle-local full URLs.
pub const URN_UUID_PREFIX: &str = "urn:uuid:";

const MAX_ID_LEN: usize = 64;

/// A FHIR logical id.
///
/// Once constructed the inner value is guaranteed to match `[A-Za-z0-9\-\.]{1,64}`.
///
/// # Construction
/// - [`ResourceId::generate`] allocates a fresh UUID v4 id.
/// - [`ResourceId::parse`] validates an externally supplied identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    /// Generates a new id from a random UUID v4, hyphenated and lowercase.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    /// Validates and wraps an identifier supplied from outside the mapper.
    ///
    /// The input is used as-is; no trimming or case folding happens here.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceIdError::InvalidInput`] if `input` is empty, longer than 64
    /// characters, or contains characters outside the FHIR id alphabet.
    pub fn parse(input: &str) -> ResourceIdResult<Self> {
        if Self::is_valid(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(ResourceIdError::InvalidInput(format!(
            "id must be 1-{MAX_ID_LEN} characters of [A-Za-z0-9-.], got: '{input}'"
        )))
    }

    /// Returns true if `input` satisfies the FHIR id grammar.
    pub fn is_valid(input: &str) -> bool {
        !input.is_empty()
            && input.len() <= MAX_ID_LEN
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'.'))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the bundle-local full URL for this id: `urn:uuid:<id>`.
    ///
    /// Ids that are not UUIDs (for example a hospital number) are still prefixed the same way
    /// so that every entry in a bundle has a `fullUrl` of one shape.
    pub fn urn(&self) -> String {
        format!("{URN_UUID_PREFIX}{}", self.0)
    }

    /// Returns true when the id is a hyphenated UUID.
    pub fn is_uuid(&self) -> bool {
        self.0.len() == 36 && Uuid::parse_str(&self.0).is_ok()
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = ResourceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::parse(s)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceId::parse(&s).map_err(serde::de::Error::custom)
    }
}
