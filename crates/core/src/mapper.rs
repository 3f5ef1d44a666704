//! Record to transaction Bundle assembly.
//!
//! ## Pipeline
//! 1. Normalise the raw record (trim keys and values, stringify values).
//! 2. Resolve the subject identity and build the Patient, if any demographics exist.
//! 3. Build the placeholder Practitioner every bundle carries.
//! 4. Classify every non-reserved field and build one Observation per field.
//! 5. Compose the transaction Bundle: Patient?, Practitioner, Observations in input order.
//!
//! A Patient or Observation that fails its schema is dropped with a warning; the rest of the
//! record still converts.

use crate::classifier::{classify_field, ClassifiedField};
use crate::constants::{NO_RESOURCES_MESSAGE, PLACEHOLDER_PRACTITIONER_NAME, RESERVED_FIELDS};
use crate::demographics::PatientIdentity;
use crate::fallback::build_observation;
use crate::record::{NormalizedRecord, RawRecord};
use crate::{ConvertError, ConvertResult};
use chrono::{DateTime, Utc};
use fhir::{
    Bundle, BundleData, BundleEntry, FhirResult, Narrative, Practitioner, Reference, Resource,
};
use mapper_uuid::ResourceId;
use serde_json::Value;

/// Convert an arbitrary JSON value into a transaction bundle.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidInput`] if `record` is not a JSON object or yields no
/// resources, and [`ConvertError::BundleAssembly`] if the composed bundle is rejected.
pub fn convert_to_fhir(record: &Value) -> ConvertResult<BundleData> {
    let raw = record.as_object().ok_or_else(|| {
        ConvertError::InvalidInput(format!(
            "expected a JSON object of fields, got {}",
            json_kind(record)
        ))
    })?;
    convert_record(raw)
}

/// Convert a raw record into a transaction bundle.
///
/// # Errors
///
/// See [`convert_to_fhir`].
pub fn convert_record(raw: &RawRecord) -> ConvertResult<BundleData> {
    let record = NormalizedRecord::from_raw(raw);
    if record.is_empty() {
        return Err(ConvertError::InvalidInput(NO_RESOURCES_MESSAGE.into()));
    }

    let identity = PatientIdentity::resolve(&record);
    let captured_at = Utc::now();
    let mut entries = Vec::with_capacity(record.len() + 1);

    match patient_entry(&identity) {
        Ok(Some(entry)) => entries.push(entry),
        Ok(None) => tracing::debug!(uhid = %identity.uhid, "no demographics; Patient omitted"),
        Err(e) => tracing::warn!(uhid = %identity.uhid, error = %e, "Skipping invalid Patient"),
    }

    let practitioner_id = ResourceId::generate();
    entries.push(practitioner_entry(&practitioner_id)?);

    for field in record.iter().filter(|f| !is_reserved(&f.name)) {
        let classified = classify_field(field);
        match observation_entry(&classified, &identity.uhid, &practitioner_id, captured_at) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::warn!(
                field = %classified.field,
                error = %e,
                "Skipping invalid Observation"
            ),
        }
    }

    if entries.is_empty() {
        return Err(ConvertError::InvalidInput(NO_RESOURCES_MESSAGE.into()));
    }

    let bundle =
        Bundle::transaction(entries).map_err(|e| ConvertError::BundleAssembly(e.to_string()))?;
    tracing::info!(
        uhid = %identity.uhid,
        entries = bundle.entry.len(),
        "converted record to transaction bundle"
    );
    Ok(bundle)
}

/// True for fields consumed as demographics rather than converted to Observations.
pub fn is_reserved(field: &str) -> bool {
    RESERVED_FIELDS.contains(&field)
}

fn patient_entry(identity: &PatientIdentity) -> FhirResult<Option<BundleEntry>> {
    identity
        .to_patient()?
        .map(|patient| BundleEntry::create(Resource::Patient(patient)))
        .transpose()
}

fn practitioner_entry(id: &ResourceId) -> FhirResult<BundleEntry> {
    let practitioner = Practitioner::named(id.clone(), PLACEHOLDER_PRACTITIONER_NAME)?;
    BundleEntry::create(Resource::Practitioner(practitioner))
}

fn observation_entry(
    classified: &ClassifiedField,
    subject_id: &str,
    practitioner_id: &ResourceId,
    captured_at: DateTime<Utc>,
) -> FhirResult<BundleEntry> {
    let performer = Reference::to_entry(practitioner_id)?;
    let observation = build_observation(
        &classified.field,
        &classified.value,
        subject_id,
        &classified.meaning,
    )?
    .with_id(ResourceId::generate())
    .with_effective(captured_at)
    .with_performer(performer)
    .with_narrative(Narrative::generated(&format!(
        "Observation for {}",
        classified.meaning
    )));

    BundleEntry::create(Resource::Observation(observation))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
