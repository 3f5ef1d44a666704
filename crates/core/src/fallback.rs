//! Generic Observation construction for fields with no dedicated mapping.

use fhir::{
    CodeableConcept, FhirError, FhirResult, NonEmptyText, Observation, ObservationData,
    ObservationValue, Patient, Quantity, Reference,
};

/// Build a final Observation of `value` about `Patient/<subject_id>`, coded as `meaning`.
///
/// Values that parse as finite decimals become `valueQuantity`; everything else becomes
/// `valueString`.
///
/// # Errors
///
/// Returns [`FhirError::InvalidInput`] naming the field when the value or meaning is empty,
/// since FHIR strings cannot be blank.
pub fn build_observation(
    field: &str,
    value: &str,
    subject_id: &str,
    meaning: &str,
) -> FhirResult<ObservationData> {
    let build = || -> FhirResult<ObservationData> {
        let code = CodeableConcept::from_text(NonEmptyText::new(meaning)?);
        let subject = Reference::to_resource(Patient::RESOURCE_TYPE, subject_id)?;
        let value = match value.parse::<f64>() {
            Ok(n) if n.is_finite() => ObservationValue::Quantity(Quantity::new(n)?),
            _ => ObservationValue::Text(NonEmptyText::new(value)?),
        };
        Observation::build(code, subject, value)
    };

    build().map_err(|e| FhirError::InvalidInput(format!("field '{field}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhir::ObservationStatus;

    #[test]
    fn numeric_text_becomes_quantity() {
        let obs = build_observation("heart_rate", "72", "P1", "Heart Rate or Blood Pressure")
            .expect("valid observation");
        assert_eq!(obs.status, ObservationStatus::Final);
        assert_eq!(obs.code.text.as_str(), "Heart Rate or Blood Pressure");
        assert_eq!(obs.subject.as_str(), "Patient/P1");
        assert_eq!(obs.value_quantity.map(|q| q.value), Some(72.0));
        assert!(obs.value_string.is_none());
    }

    #[test]
    fn decimals_and_negatives_are_numeric() {
        for (raw, expected) in [("36.6", 36.6), ("-4", -4.0), ("1e3", 1000.0)] {
            let obs = build_observation("x", raw, "P1", "X").expect("valid");
            assert_eq!(obs.value_quantity.map(|q| q.value), Some(expected));
        }
    }

    #[test]
    fn other_text_becomes_value_string() {
        let obs = build_observation("notes", "stable", "P1", "Notes").expect("valid");
        assert!(obs.value_quantity.is_none());
        assert_eq!(obs.value_string.as_ref().map(NonEmptyText::as_str), Some("stable"));
    }

    #[test]
    fn non_finite_numbers_stay_textual() {
        for raw in ["NaN", "inf", "-infinity"] {
            let obs = build_observation("x", raw, "P1", "X").expect("valid");
            assert!(obs.value_quantity.is_none(), "{raw} should not be a quantity");
            assert_eq!(obs.value_string.as_ref().map(NonEmptyText::as_str), Some(raw));
        }
    }

    #[test]
    fn empty_value_is_rejected_with_field_name() {
        let err = build_observation("allergies", "", "P1", "Allergies").expect_err("empty");
        assert!(err.to_string().contains("field 'allergies'"));
    }

    #[test]
    fn empty_meaning_is_rejected() {
        assert!(build_observation("", "5", "P1", "").is_err());
    }
}
