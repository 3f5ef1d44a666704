//! Patient identity extraction.
//!
//! Pulls the reserved demographic fields out of a normalised record and turns them into a
//! Patient resource when there is anything to say about the patient.

use crate::constants::{
    DOB_FIELD, DOB_FORMATS, FIRST_NAME_FIELD, GENDER_FIELD, LAST_NAME_FIELD, UHID_FIELD,
};
use crate::record::NormalizedRecord;
use chrono::NaiveDate;
use fhir::{FhirResult, Narrative, Patient, PatientData, PatientInput};
use mapper_uuid::ResourceId;

/// Demographics of the record's subject, resolved once per conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientIdentity {
    /// Subject identifier: the record's `uhid`, or a generated UUID.
    pub uhid: String,
    pub given: Option<String>,
    pub family: Option<String>,
    /// Lower-cased gender, absent when blank.
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl PatientIdentity {
    /// Resolve the identity from a normalised record.
    ///
    /// A missing or blank `uhid` is replaced with a fresh UUID. An unparseable `dob` is
    /// dropped silently.
    pub fn resolve(record: &NormalizedRecord) -> Self {
        let uhid = record
            .get_non_empty(UHID_FIELD)
            .map(str::to_string)
            .unwrap_or_else(|| ResourceId::generate().to_string());

        let birth_date = record.get(DOB_FIELD).and_then(parse_birth_date);

        Self {
            uhid,
            given: record.get_non_empty(FIRST_NAME_FIELD).map(str::to_string),
            family: record.get_non_empty(LAST_NAME_FIELD).map(str::to_string),
            gender: record.get_non_empty(GENDER_FIELD).map(str::to_lowercase),
            birth_date,
        }
    }

    /// True when at least one of name, gender or birth date was resolved.
    pub fn has_demographics(&self) -> bool {
        self.given.is_some()
            || self.family.is_some()
            || self.gender.is_some()
            || self.birth_date.is_some()
    }

    /// Narrative text for the patient resource.
    pub fn summary(&self) -> String {
        let name: Vec<&str> = [self.given.as_deref(), self.family.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if name.is_empty() {
            "Patient record".to_string()
        } else {
            format!("Patient record for {}", name.join(" "))
        }
    }

    /// Build the Patient resource.
    ///
    /// Returns `Ok(None)` when there are no demographics to report.
    ///
    /// # Errors
    ///
    /// Returns [`fhir::FhirError`] if the identity fails the Patient schema (for example a
    /// `uhid` with characters outside the FHIR id alphabet, or an unknown gender).
    pub fn to_patient(&self) -> FhirResult<Option<PatientData>> {
        if !self.has_demographics() {
            return Ok(None);
        }

        let mut patient = Patient::build(PatientInput {
            id: self.uhid.clone(),
            given: self.given.clone(),
            family: self.family.clone(),
            gender: self.gender.clone(),
            birth_date: self.birth_date,
        })?;
        patient.text = Some(Narrative::generated(&self.summary()));
        Ok(Some(patient))
    }
}

/// Parse a date of birth, trying `01-Jan-1990` then `1990-01-01`.
///
/// Returns `None` for any other format.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let parsed = DOB_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok());
    if parsed.is_none() && !raw.is_empty() {
        tracing::debug!(dob = raw, "ignoring unparseable date of birth");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawRecord;
    use fhir::AdministrativeGender;
    use serde_json::json;

    fn record(value: serde_json::Value) -> NormalizedRecord {
        let raw: RawRecord = value.as_object().cloned().expect("object");
        NormalizedRecord::from_raw(&raw)
    }

    #[test]
    fn parses_both_birth_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 1, 1);
        assert_eq!(parse_birth_date("01-Jan-1990"), expected);
        assert_eq!(parse_birth_date("1990-01-01"), expected);
    }

    #[test]
    fn other_birth_date_formats_are_absent() {
        for raw in ["01/01/1990", "Jan 1 1990", "1990-13-01", "", "yesterday"] {
            assert_eq!(parse_birth_date(raw), None, "{raw} should not parse");
        }
    }

    #[test]
    fn resolves_reserved_fields() {
        let identity = PatientIdentity::resolve(&record(json!({
            "uhid": "P1",
            "first_name": "Jane",
            "last_name": "Doe",
            "gender": "FEMALE",
            "dob": "1990-01-01"
        })));
        assert_eq!(identity.uhid, "P1");
        assert_eq!(identity.given.as_deref(), Some("Jane"));
        assert_eq!(identity.family.as_deref(), Some("Doe"));
        assert_eq!(identity.gender.as_deref(), Some("female"));
        assert_eq!(identity.birth_date, NaiveDate::from_ymd_opt(1990, 1, 1));
        assert_eq!(identity.summary(), "Patient record for Jane Doe");
    }

    #[test]
    fn synthesizes_uhid_when_missing_or_blank() {
        let missing = PatientIdentity::resolve(&record(json!({ "first_name": "Jane" })));
        let blank = PatientIdentity::resolve(&record(json!({ "uhid": "  " })));
        for identity in [missing, blank] {
            assert!(ResourceId::parse(&identity.uhid)
                .expect("valid id")
                .is_uuid());
        }
    }

    #[test]
    fn no_patient_without_demographics() {
        let identity = PatientIdentity::resolve(&record(json!({ "uhid": "P1", "dob": "bad" })));
        assert!(!identity.has_demographics());
        assert_eq!(identity.to_patient().expect("no error"), None);
    }

    #[test]
    fn patient_carries_demographics_and_narrative() {
        let identity = PatientIdentity::resolve(&record(json!({
            "uhid": "P1",
            "last_name": "Doe",
            "gender": "Male"
        })));
        let patient = identity
            .to_patient()
            .expect("valid")
            .expect("has demographics");
        assert_eq!(patient.gender, Some(AdministrativeGender::Male));
        assert_eq!(patient.name[0].given.len(), 0);
        assert!(patient
            .text
            .as_ref()
            .expect("narrative")
            .div
            .contains("Patient record for Doe"));
    }

    #[test]
    fn invalid_gender_fails_patient_schema() {
        let identity = PatientIdentity::resolve(&record(json!({ "uhid": "P1", "gender": "M" })));
        assert!(identity.to_patient().is_err());
    }
}
