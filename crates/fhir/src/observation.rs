//! FHIR Observation resource model.
//!
//! Observations hold one reported fact: a free-text code describing what the value means,
//! the value itself (a quantity or a string), and references to the subject and performer.
//! References are plain strings; an observation never owns the resources it points at.

use crate::datatypes::{CodeableConcept, Narrative, Quantity, Reference};
use crate::{FhirError, FhirResult};
use chrono::{DateTime, Utc};
use mapper_types::NonEmptyText;
use mapper_uuid::ResourceId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Status of an observation. The mapper only reports completed results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationStatus {
    Final,
}

/// The `value[x]` choice of an observation.
#[derive(Clone, Debug, PartialEq)]
pub enum ObservationValue {
    Quantity(Quantity),
    Text(NonEmptyText),
}

/// A schema-checked Observation resource.
///
/// `value[x]` is stored as its two wire members; [`ObservationData::value`] gives the typed
/// view and [`Observation::validate`] enforces that exactly one is present.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    pub status: ObservationStatus,

    pub code: CodeableConcept,

    pub subject: Reference,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub performer: Vec<Reference>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_quantity: Option<Quantity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_string: Option<NonEmptyText>,
}

impl ObservationData {
    /// Typed view of `value[x]`, if one is set.
    pub fn value(&self) -> Option<ObservationValue> {
        match (&self.value_quantity, &self.value_string) {
            (Some(q), _) => Some(ObservationValue::Quantity(*q)),
            (None, Some(s)) => Some(ObservationValue::Text(s.clone())),
            (None, None) => None,
        }
    }

    pub fn with_id(mut self, id: ResourceId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_effective(mut self, at: DateTime<Utc>) -> Self {
        self.effective_date_time = Some(at);
        self
    }

    pub fn with_performer(mut self, performer: Reference) -> Self {
        self.performer.push(performer);
        self
    }

    pub fn with_narrative(mut self, text: Narrative) -> Self {
        self.text = Some(text);
        self
    }
}

// ============================================================================
// Public Observation operations
// ============================================================================

/// Observation resource operations.
pub struct Observation;

impl Observation {
    pub const RESOURCE_TYPE: &'static str = "Observation";

    /// A final observation of `value` about `subject`, described by `code`.
    pub fn build(
        code: CodeableConcept,
        subject: Reference,
        value: ObservationValue,
    ) -> FhirResult<ObservationData> {
        let (value_quantity, value_string) = match value {
            ObservationValue::Quantity(q) => (Some(q), None),
            ObservationValue::Text(s) => (None, Some(s)),
        };

        let observation = ObservationData {
            id: None,
            text: None,
            status: ObservationStatus::Final,
            code,
            subject,
            effective_date_time: None,
            performer: Vec::new(),
            value_quantity,
            value_string,
        };
        Self::validate(&observation)?;
        Ok(observation)
    }

    /// Check the value choice, quantity and narrative rules.
    pub fn validate(observation: &ObservationData) -> FhirResult<()> {
        match (&observation.value_quantity, &observation.value_string) {
            (Some(q), None) => q.validate()?,
            (None, Some(_)) => {}
            (Some(_), Some(_)) => {
                return Err(FhirError::InvalidInput(
                    "Observation cannot have both valueQuantity and valueString".into(),
                ))
            }
            (None, None) => {
                return Err(FhirError::InvalidInput(
                    "Observation must have valueQuantity or valueString".into(),
                ))
            }
        }
        if let Some(text) = &observation.text {
            text.validate()?;
        }
        Ok(())
    }
}
