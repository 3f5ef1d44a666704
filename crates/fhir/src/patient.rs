//! FHIR Patient resource model.
//!
//! Responsibilities:
//! - Define the domain-level input used to construct a patient
//! - Enforce the patient's schema rules (id grammar, gender codes, name shape)
//! - Expose the resource as a serialisable struct for bundle entries

use crate::datatypes::{AdministrativeGender, HumanName, Narrative};
use crate::FhirResult;
use chrono::NaiveDate;
use mapper_types::NonEmptyText;
use mapper_uuid::ResourceId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Unvalidated patient demographics, as extracted from an incoming record.
///
/// Empty strings are treated the same as missing values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientInput {
    /// Logical id, usually the record's hospital number.
    pub id: String,
    pub given: Option<String>,
    pub family: Option<String>,
    /// Gender code; must already be lower-cased.
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

/// A schema-checked Patient resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientData {
    pub id: ResourceId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<AdministrativeGender>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

// ============================================================================
// Public Patient operations
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing patient-related operations.
pub struct Patient;

impl Patient {
    /// Resource type name, as used in `resourceType` and request URLs.
    pub const RESOURCE_TYPE: &'static str = "Patient";

    /// Construct a patient from unvalidated demographics.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FhirError`] if:
    /// - the id does not satisfy the FHIR id grammar,
    /// - the gender is not an administrative-gender code.
    pub fn build(input: PatientInput) -> FhirResult<PatientData> {
        let id = ResourceId::parse(&input.id)?;

        let gender = input
            .gender
            .as_deref()
            .filter(|g| !g.is_empty())
            .map(str::parse::<AdministrativeGender>)
            .transpose()?;

        let given = input.given.as_deref().and_then(|g| NonEmptyText::new(g).ok());
        let family = input.family.as_deref().and_then(|f| NonEmptyText::new(f).ok());
        let name = HumanName::from_parts(given, family).into_iter().collect();

        let patient = PatientData {
            id,
            text: None,
            name,
            gender,
            birth_date: input.birth_date,
        };
        Self::validate(&patient)?;
        Ok(patient)
    }

    /// Re-check the schema rules on an already constructed patient.
    pub fn validate(patient: &PatientData) -> FhirResult<()> {
        for name in &patient.name {
            name.validate()?;
        }
        if let Some(text) = &patient.text {
            text.validate()?;
        }
        Ok(())
    }
}
