//! Constants used throughout the mapper core crate.
//!
//! Field names, placeholder values and defaults live here so the assembler, the CLI and
//! the REST layer agree on them.

/// Field carrying the subject's hospital number.
pub const UHID_FIELD: &str = "uhid";

/// Field carrying the subject's given name.
pub const FIRST_NAME_FIELD: &str = "first_name";

/// Field carrying the subject's family name.
pub const LAST_NAME_FIELD: &str = "last_name";

/// Field carrying the subject's date of birth.
pub const DOB_FIELD: &str = "dob";

/// Field carrying the subject's administrative gender.
pub const GENDER_FIELD: &str = "gender";

/// Fields consumed as demographics (or discarded) rather than turned into Observations.
pub const RESERVED_FIELDS: &[&str] = &[
    UHID_FIELD,
    FIRST_NAME_FIELD,
    LAST_NAME_FIELD,
    DOB_FIELD,
    GENDER_FIELD,
    "password",
];

/// Accepted date-of-birth formats, tried in order.
pub const DOB_FORMATS: &[&str] = &["%d-%b-%Y", "%Y-%m-%d"];

/// Display name of the placeholder practitioner attached to every bundle.
pub const PLACEHOLDER_PRACTITIONER_NAME: &str = "Example Practitioner";

/// Message returned when a record yields nothing to put in a bundle.
pub const NO_RESOURCES_MESSAGE: &str = "No valid FHIR resources could be generated from input.";

/// Default executable used to launch the external validator.
pub const DEFAULT_VALIDATOR_PROGRAM: &str = "java";

/// Default location of the external validator jar.
pub const DEFAULT_VALIDATOR_JAR: &str = "./fhir/validator_cli.jar";

/// Default FHIR version passed to the external validator.
pub const DEFAULT_FHIR_VERSION: &str = "4.0";
