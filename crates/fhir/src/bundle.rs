//! FHIR transaction Bundle and the closed set of resources it can carry.
//!
//! Responsibilities:
//! - Define the [`Resource`] sum type tagged by `resourceType`
//! - Define bundle entries with their `fullUrl` and transactional request
//! - Validate bundle composition (unique full URLs, request URLs matching resource types)
//! - Render and parse canonical bundle JSON

use crate::observation::{Observation, ObservationData};
use crate::patient::{Patient, PatientData};
use crate::practitioner::{Practitioner, PractitionerData};
use crate::{FhirError, FhirResult};
use mapper_uuid::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Any resource the mapper can place in a bundle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "resourceType")]
pub enum Resource {
    Patient(PatientData),
    Practitioner(PractitionerData),
    Observation(ObservationData),
}

impl Resource {
    /// The resource's `resourceType`.
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::Patient(_) => Patient::RESOURCE_TYPE,
            Resource::Practitioner(_) => Practitioner::RESOURCE_TYPE,
            Resource::Observation(_) => Observation::RESOURCE_TYPE,
        }
    }

    /// The resource's logical id, when it has one.
    pub fn id(&self) -> Option<&ResourceId> {
        match self {
            Resource::Patient(p) => Some(&p.id),
            Resource::Practitioner(p) => Some(&p.id),
            Resource::Observation(o) => o.id.as_ref(),
        }
    }

    pub fn validate(&self) -> FhirResult<()> {
        match self {
            Resource::Patient(p) => Patient::validate(p),
            Resource::Practitioner(p) => Practitioner::validate(p),
            Resource::Observation(o) => Observation::validate(o),
        }
    }
}

/// Bundle type. The mapper only emits transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    Transaction,
}

/// HTTP verb of a transaction entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpVerb {
    #[serde(rename = "POST")]
    Post,
}

/// The transactional intent of an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleRequest {
    pub method: HttpVerb,
    pub url: String,
}

/// One resource in a bundle, paired with its full URL and request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BundleEntry {
    pub full_url: String,
    pub resource: Resource,
    pub request: BundleRequest,
}

impl BundleEntry {
    /// A `POST <ResourceType>` entry whose full URL is `urn:uuid:<id>`.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if the resource has no id, or any schema error
    /// from validating the resource.
    pub fn create(resource: Resource) -> FhirResult<Self> {
        resource.validate()?;
        let full_url = resource
            .id()
            .map(ResourceId::urn)
            .ok_or_else(|| {
                FhirError::InvalidInput(format!(
                    "{} entry needs an id to derive its fullUrl",
                    resource.resource_type()
                ))
            })?;
        let request = BundleRequest {
            method: HttpVerb::Post,
            url: resource.resource_type().to_string(),
        };
        Ok(Self {
            full_url,
            resource,
            request,
        })
    }
}

/// A schema-checked Bundle resource.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleData {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

// ============================================================================
// Public Bundle operations
// ============================================================================

/// Bundle operations.
pub struct Bundle;

impl Bundle {
    pub const RESOURCE_TYPE: &'static str = "Bundle";

    /// Compose a transaction bundle from entries, in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError`] if the composed bundle fails [`Bundle::validate`].
    pub fn transaction(entries: Vec<BundleEntry>) -> FhirResult<BundleData> {
        let bundle = BundleData {
            resource_type: Self::RESOURCE_TYPE.to_string(),
            bundle_type: BundleType::Transaction,
            entry: entries,
        };
        Self::validate(&bundle)?;
        Ok(bundle)
    }

    /// Check bundle-level composition rules and every contained resource.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::InvalidInput`] if:
    /// - `resourceType` is not "Bundle",
    /// - an entry has an empty or whitespace-containing `fullUrl`,
    /// - two entries share a `fullUrl`,
    /// - an entry's `request.url` differs from its resource type,
    /// - any resource fails its own schema checks.
    pub fn validate(bundle: &BundleData) -> FhirResult<()> {
        if bundle.resource_type != Self::RESOURCE_TYPE {
            return Err(FhirError::InvalidInput(format!(
                "Expected resourceType 'Bundle', got '{}'",
                bundle.resource_type
            )));
        }

        let mut seen = HashSet::new();
        for (index, entry) in bundle.entry.iter().enumerate() {
            if entry.full_url.is_empty() || entry.full_url.contains(char::is_whitespace) {
                return Err(FhirError::InvalidInput(format!(
                    "entry {index}: fullUrl '{}' is not a valid URI",
                    entry.full_url
                )));
            }
            if !seen.insert(entry.full_url.as_str()) {
                return Err(FhirError::InvalidInput(format!(
                    "entry {index}: duplicate fullUrl '{}'",
                    entry.full_url
                )));
            }
            if entry.request.url != entry.resource.resource_type() {
                return Err(FhirError::InvalidInput(format!(
                    "entry {index}: request.url '{}' does not match resource type '{}'",
                    entry.request.url,
                    entry.resource.resource_type()
                )));
            }
            entry
                .resource
                .validate()
                .map_err(|e| FhirError::InvalidInput(format!("entry {index}: {e}")))?;
        }
        Ok(())
    }

    /// Render a bundle as canonical, pretty-printed FHIR JSON.
    pub fn render(bundle: &BundleData) -> FhirResult<String> {
        serde_json::to_string_pretty(bundle)
            .map_err(|e| FhirError::Translation(format!("Failed to serialise bundle: {e}")))
    }

    /// Convert a bundle into a JSON value, for embedding in larger responses.
    pub fn to_value(bundle: &BundleData) -> FhirResult<serde_json::Value> {
        serde_json::to_value(bundle)
            .map_err(|e| FhirError::Translation(format!("Failed to serialise bundle: {e}")))
    }

    /// Parse a bundle from JSON text and validate it.
    ///
    /// This uses `serde_path_to_error` to surface a best-effort path (e.g.
    /// `entry[0].resource.gender`) to the failing field.
    ///
    /// # Errors
    ///
    /// Returns [`FhirError::Translation`] if the JSON does not match the bundle schema, or
    /// any error from [`Bundle::validate`].
    pub fn parse(json_text: &str) -> FhirResult<BundleData> {
        let mut deserializer = serde_json::Deserializer::from_str(json_text);

        let bundle = match serde_path_to_error::deserialize::<_, BundleData>(&mut deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(FhirError::Translation(format!(
                    "Bundle schema mismatch at {path}: {source}"
                )));
            }
        };
        deserializer.end()?;

        Self::validate(&bundle)?;
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::{CodeableConcept, Quantity, Reference};
    use crate::observation::ObservationValue;
    use crate::patient::PatientInput;
    use mapper_types::NonEmptyText;

    fn patient_entry() -> BundleEntry {
        let patient = Patient::build(PatientInput {
            id: "P1".into(),
            gender: Some("male".into()),
            ..PatientInput::default()
        })
        .expect("valid patient");
        BundleEntry::create(Resource::Patient(patient)).expect("valid entry")
    }

    fn practitioner_entry() -> BundleEntry {
        let practitioner =
            Practitioner::named(ResourceId::generate(), "Example Practitioner").expect("valid");
        BundleEntry::create(Resource::Practitioner(practitioner)).expect("valid entry")
    }

    fn observation_entry() -> BundleEntry {
        let obs = Observation::build(
            CodeableConcept::from_text(NonEmptyText::new("Weight or Numeric").expect("valid")),
            Reference::to_resource("Patient", "P1").expect("valid"),
            ObservationValue::Quantity(Quantity::new(200.0).expect("finite")),
        )
        .expect("valid")
        .with_id(ResourceId::generate());
        BundleEntry::create(Resource::Observation(obs)).expect("valid entry")
    }

    #[test]
    fn entries_carry_urn_and_post_request() {
        let entry = patient_entry();
        assert_eq!(entry.full_url, "urn:uuid:P1");
        assert_eq!(entry.request.method, HttpVerb::Post);
        assert_eq!(entry.request.url, "Patient");
    }

    #[test]
    fn observation_without_id_cannot_become_entry() {
        let obs = Observation::build(
            CodeableConcept::from_text(NonEmptyText::new("Notes").expect("valid")),
            Reference::to_resource("Patient", "P1").expect("valid"),
            ObservationValue::Text(NonEmptyText::new("ok").expect("valid")),
        )
        .expect("valid");
        let err = BundleEntry::create(Resource::Observation(obs)).expect_err("no id");
        assert!(err.to_string().contains("Observation entry needs an id"));
    }

    #[test]
    fn transaction_renders_expected_shape() {
        let bundle = Bundle::transaction(vec![
            patient_entry(),
            practitioner_entry(),
            observation_entry(),
        ])
        .expect("valid bundle");

        let json = Bundle::to_value(&bundle).expect("to value");
        assert_eq!(json["resourceType"], "Bundle");
        assert_eq!(json["type"], "transaction");
        assert_eq!(json["entry"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["entry"][0]["resource"]["resourceType"], "Patient");
        assert_eq!(json["entry"][1]["resource"]["resourceType"], "Practitioner");
        assert_eq!(json["entry"][2]["resource"]["resourceType"], "Observation");
        assert_eq!(json["entry"][2]["request"]["method"], "POST");
        assert_eq!(json["entry"][2]["request"]["url"], "Observation");
    }

    #[test]
    fn rendered_bundle_parses_back() {
        let bundle =
            Bundle::transaction(vec![patient_entry(), observation_entry()]).expect("valid");
        let text = Bundle::render(&bundle).expect("render");
        let reparsed = Bundle::parse(&text).expect("parse");
        assert_eq!(bundle, reparsed);
    }

    #[test]
    fn duplicate_full_urls_are_rejected() {
        let err = Bundle::transaction(vec![patient_entry(), patient_entry()])
            .expect_err("duplicate fullUrl");
        assert!(err.to_string().contains("duplicate fullUrl 'urn:uuid:P1'"));
    }

    #[test]
    fn mismatched_request_url_is_rejected() {
        let mut entry = patient_entry();
        entry.request.url = "Observation".into();
        let err = Bundle::transaction(vec![entry]).expect_err("mismatch");
        assert!(err.to_string().contains("does not match resource type"));
    }

    #[test]
    fn parse_reports_failing_path() {
        let input = r#"{
  "resourceType": "Bundle",
  "type": "transaction",
  "entry": [
    {
      "fullUrl": "urn:uuid:P1",
      "resource": { "resourceType": "Patient", "id": "P1", "gender": "f" },
      "request": { "method": "POST", "url": "Patient" }
    }
  ]
}"#;
        let err = Bundle::parse(input).expect_err("invalid gender");
        match err {
            FhirError::Translation(msg) => {
                assert!(msg.contains("entry[0]"), "unexpected message: {msg}");
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_other_bundle_types() {
        let input = r#"{ "resourceType": "Bundle", "type": "batch" }"#;
        assert!(matches!(
            Bundle::parse(input),
            Err(FhirError::Translation(_))
        ));
    }

    #[test]
    fn parse_rejects_wrong_resource_type() {
        let input = r#"{ "resourceType": "Patient", "type": "transaction" }"#;
        match Bundle::parse(input).expect_err("not a bundle") {
            FhirError::InvalidInput(msg) => assert!(msg.contains("'Patient'")),
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }
}
