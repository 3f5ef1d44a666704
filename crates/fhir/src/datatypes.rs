//! FHIR complex and primitive datatypes used by the mapper's resources.
//!
//! Each type mirrors the FHIR R4 element of the same name, restricted to the members the
//! mapper populates.

use crate::{FhirError, FhirResult};
use mapper_types::NonEmptyText;
use mapper_uuid::ResourceId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// XHTML namespace required on every narrative `div`.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

// ============================================================================
// AdministrativeGender
// ============================================================================

/// Administrative gender of a person (`http://hl7.org/fhir/administrative-gender`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    Unknown,
}

impl AdministrativeGender {
    /// Wire code of the gender.
    pub fn code(self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }
}

impl FromStr for AdministrativeGender {
    type Err = FhirError;

    /// Parses a wire code. Codes are case-sensitive, as in FHIR.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(AdministrativeGender::Male),
            "female" => Ok(AdministrativeGender::Female),
            "other" => Ok(AdministrativeGender::Other),
            "unknown" => Ok(AdministrativeGender::Unknown),
            other => Err(FhirError::InvalidInput(format!(
                "gender must be one of male, female, other, unknown; got '{other}'"
            ))),
        }
    }
}

// ============================================================================
// HumanName
// ============================================================================

/// A person's name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<NonEmptyText>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<NonEmptyText>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<NonEmptyText>,
}

impl HumanName {
    /// A name carried only as display text.
    pub fn from_text(text: NonEmptyText) -> Self {
        Self {
            text: Some(text),
            family: None,
            given: Vec::new(),
        }
    }

    /// A structured name, or `None` when neither part is present.
    pub fn from_parts(given: Option<NonEmptyText>, family: Option<NonEmptyText>) -> Option<Self> {
        if given.is_none() && family.is_none() {
            return None;
        }
        Some(Self {
            text: None,
            family,
            given: given.into_iter().collect(),
        })
    }

    /// A name must carry at least one of text, family or given.
    pub fn validate(&self) -> FhirResult<()> {
        if self.text.is_none() && self.family.is_none() && self.given.is_empty() {
            return Err(FhirError::InvalidInput(
                "HumanName must have text, family or given".into(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Reference
// ============================================================================

/// A literal reference from one resource to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: NonEmptyText,
}

impl Reference {
    /// Relative reference of the form `<ResourceType>/<id>`.
    ///
    /// The id is not validated here; references may point at resources the mapper did not
    /// emit.
    pub fn to_resource(resource_type: &str, id: &str) -> FhirResult<Self> {
        Ok(Self {
            reference: NonEmptyText::new(format!("{resource_type}/{id}"))?,
        })
    }

    /// Bundle-local reference to an entry's `urn:uuid:` full URL.
    pub fn to_entry(id: &ResourceId) -> FhirResult<Self> {
        Ok(Self {
            reference: NonEmptyText::new(id.urn())?,
        })
    }

    pub fn as_str(&self) -> &str {
        self.reference.as_str()
    }
}

// ============================================================================
// CodeableConcept
// ============================================================================

/// A concept described by free text only; the mapper does not assign codings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub text: NonEmptyText,
}

impl CodeableConcept {
    pub fn from_text(text: NonEmptyText) -> Self {
        Self { text }
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// A measured amount without units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
}

impl Quantity {
    /// Creates a quantity; FHIR decimals cannot be NaN or infinite.
    pub fn new(value: f64) -> FhirResult<Self> {
        let quantity = Self { value };
        quantity.validate()?;
        Ok(quantity)
    }

    pub fn validate(&self) -> FhirResult<()> {
        if !self.value.is_finite() {
            return Err(FhirError::InvalidInput(format!(
                "Quantity.value must be a finite decimal, got {}",
                self.value
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Narrative
// ============================================================================

/// Status of a narrative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStatus {
    Generated,
}

/// Human-readable summary of a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub status: NarrativeStatus,
    pub div: String,
}

impl Narrative {
    /// Builds a generated narrative whose `div` holds `text`, HTML-escaped.
    pub fn generated(text: &str) -> Self {
        Self {
            status: NarrativeStatus::Generated,
            div: format!(
                "<div xmlns=\"{XHTML_NAMESPACE}\">{}</div>",
                html_escape::encode_text(text)
            ),
        }
    }

    /// The `div` must be an XHTML div element in the XHTML namespace.
    pub fn validate(&self) -> FhirResult<()> {
        let open = format!("<div xmlns=\"{XHTML_NAMESPACE}\">");
        if !self.div.starts_with(&open) || !self.div.ends_with("</div>") {
            return Err(FhirError::InvalidInput(
                "Narrative.div must be an XHTML <div> in the XHTML namespace".into(),
            ));
        }
        Ok(())
    }
}
