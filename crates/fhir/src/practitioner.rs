//! FHIR Practitioner resource model.

use crate::datatypes::{HumanName, Narrative};
use crate::FhirResult;
use mapper_types::NonEmptyText;
use mapper_uuid::ResourceId;
use serde::{Deserialize, Serialize};

/// A schema-checked Practitioner resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PractitionerData {
    pub id: ResourceId,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Narrative>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name: Vec<HumanName>,
}

/// Practitioner resource operations.
pub struct Practitioner;

impl Practitioner {
    pub const RESOURCE_TYPE: &'static str = "Practitioner";

    /// A practitioner known only by a display name, with a matching narrative.
    pub fn named(id: ResourceId, display_name: &str) -> FhirResult<PractitionerData> {
        let name = NonEmptyText::new(display_name)?;
        let practitioner = PractitionerData {
            id,
            text: Some(Narrative::generated(name.as_str())),
            name: vec![HumanName::from_text(name)],
        };
        Self::validate(&practitioner)?;
        Ok(practitioner)
    }

    pub fn validate(practitioner: &PractitionerData) -> FhirResult<()> {
        for name in &practitioner.name {
            name.validate()?;
        }
        if let Some(text) = &practitioner.text {
            text.validate()?;
        }
        Ok(())
    }
}
