//! Minimal FHIR R4 resource models for the record mapper.
//!
//! This crate provides **typed resource models** and **canonical JSON helpers** for the
//! small closed set of resources the mapper emits:
//! - `Patient`, `Practitioner` and `Observation`, unified by the [`Resource`] sum type
//! - the transaction [`Bundle`] wrapper and its entries
//!
//! This crate focuses on:
//! - an explicit required/optional field list per resource
//! - schema checks the mapper relies on (ids, genders, value choice, narrative shape)
//! - serialisation/deserialisation to canonical FHIR JSON
//!
//! It is deliberately not a general FHIR library: terminology bindings, profiles and
//! invariants beyond the ones listed on each type are left to an external validator.

pub mod bundle;
pub mod datatypes;
pub mod observation;
pub mod patient;
pub mod practitioner;

// Re-export facades
pub use bundle::Bundle;
pub use observation::Observation;
pub use patient::Patient;
pub use practitioner::Practitioner;

// Re-export public domain-level types
pub use bundle::{BundleData, BundleEntry, BundleRequest, BundleType, HttpVerb, Resource};
pub use datatypes::{
    AdministrativeGender, CodeableConcept, HumanName, Narrative, NarrativeStatus, Quantity,
    Reference,
};
pub use observation::{ObservationData, ObservationStatus, ObservationValue};
pub use patient::{PatientData, PatientInput};
pub use practitioner::PractitionerData;

// Re-export identifier and text primitives
pub use mapper_types::NonEmptyText;
pub use mapper_uuid::ResourceId;

/// Errors returned by the `fhir` model crate.
#[derive(Debug, thiserror::Error)]
pub enum FhirError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid id: {0}")]
    InvalidId(#[from] mapper_uuid::ResourceIdError),

    #[error("invalid text: {0}")]
    InvalidText(#[from] mapper_types::TextError),
}

/// Type alias for Results that can fail with a [`FhirError`].
pub type FhirResult<T> = Result<T, FhirError>;
