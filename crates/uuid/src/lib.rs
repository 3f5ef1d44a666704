//! FHIR logical id and full-URL utilities.
//!
//! Every resource the mapper emits carries a logical id, and every bundle entry carries a
//! `fullUrl` derived from it. This crate keeps both consistent:
//!
//! - [`ResourceId`] guarantees the FHIR `id` grammar once constructed.
//! - [`ResourceId::urn`] derives the `urn:uuid:` full URL used inside transaction bundles.
//!
//! ## FHIR id grammar
//! - Length: 1 to 64
//! - Characters: `A-Z`, `a-z`, `0-9`, `-` and `.`
//! - Example: `550e8400-e29b-41d4-a716-446655440000`, `P1`
//!
//! Generated ids are UUID v4 values in hyphenated lowercase form, which always satisfy the
//! grammar. Externally supplied ids (for example a record's `uhid`) must be checked with
//! [`ResourceId::parse`].

mod resource_id;

pub use resource_id::{ResourceId, Uuid, URN_UUID_PREFIX};

/// Error type for resource id operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResourceIdError {
    /// Input does not satisfy the FHIR id grammar
    #[error("Invalid resource id: {0}")]
    InvalidInput(String),
}

/// Result type for resource id operations.
pub type ResourceIdResult<T> = Result<T, ResourceIdError>;
