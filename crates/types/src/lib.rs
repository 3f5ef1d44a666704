//! Validated text primitives shared by the FHIR models and the mapper core.
//!
//! FHIR `string` elements must contain at least one non-whitespace character and are capped
//! at 1 MiB. [`NonEmptyText`] carries both guarantees once constructed, so resource models
//! can hold it without re-checking.

/// Upper bound on the size of a FHIR `string` value, in bytes.
pub const MAX_TEXT_BYTES: usize = 1024 * 1024;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The trimmed input exceeded [`MAX_TEXT_BYTES`]
    #[error("Text exceeds {max} bytes (got {len})")]
    TooLong { len: usize, max: usize },
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction, matching
/// the way incoming record values are normalised before they reach a resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if the trimmed input is empty, or
    /// [`TextError::TooLong`] if it is larger than [`MAX_TEXT_BYTES`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.len() > MAX_TEXT_BYTES {
            return Err(TextError::TooLong {
                len: trimmed.len(),
                max: MAX_TEXT_BYTES,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  Jane \n").expect("valid text");
        assert_eq!(text.as_str(), "Jane");
        assert_eq!(text.to_string(), "Jane");
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(" \t "), Err(TextError::Empty));
    }

    #[test]
    fn rejects_oversized_input() {
        let big = "a".repeat(MAX_TEXT_BYTES + 1);
        match NonEmptyText::new(&big) {
            Err(TextError::TooLong { len, max }) => {
                assert_eq!(len, MAX_TEXT_BYTES + 1);
                assert_eq!(max, MAX_TEXT_BYTES);
            }
            other => panic!("expected TooLong, got {other:?}"),
        }
    }

    #[test]
    fn deserialize_enforces_non_empty() {
        let ok: NonEmptyText = serde_json::from_str("\"Example\"").expect("valid");
        assert_eq!(ok.as_str(), "Example");

        let err = serde_json::from_str::<NonEmptyText>("\"   \"").expect_err("blank");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let text = NonEmptyText::new("Heart Rate").expect("valid");
        assert_eq!(
            serde_json::to_string(&text).expect("serialize"),
            "\"Heart Rate\""
        );
    }
}
