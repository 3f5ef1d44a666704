//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment
//! variables; binaries read them and hand the raw values to the helpers here.

use crate::constants::{DEFAULT_FHIR_VERSION, DEFAULT_VALIDATOR_JAR, DEFAULT_VALIDATOR_PROGRAM};
use crate::{ConvertError, ConvertResult};

/// How to launch the external validator.
///
/// The command line is `<program> <leading_args...> <bundle.json> -version <fhir_version>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatorConfig {
    program: String,
    leading_args: Vec<String>,
    fhir_version: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_VALIDATOR_PROGRAM.into(),
            leading_args: vec!["-jar".into(), DEFAULT_VALIDATOR_JAR.into()],
            fhir_version: DEFAULT_FHIR_VERSION.into(),
        }
    }
}

impl ValidatorConfig {
    /// Create a new `ValidatorConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidConfig`] if the program is blank or the FHIR version is
    /// blank or contains whitespace.
    pub fn new(
        program: impl Into<String>,
        leading_args: Vec<String>,
        fhir_version: impl Into<String>,
    ) -> ConvertResult<Self> {
        let program = program.into();
        let fhir_version = fhir_version.into();

        if program.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(
                "validator program cannot be empty".into(),
            ));
        }
        if fhir_version.is_empty() || fhir_version.contains(char::is_whitespace) {
            return Err(ConvertError::InvalidConfig(format!(
                "FHIR version must be a single token, got '{fhir_version}'"
            )));
        }

        Ok(Self {
            program,
            leading_args,
            fhir_version,
        })
    }

    /// The standard `java -jar <jar>` launcher.
    pub fn java_jar(
        java: impl Into<String>,
        jar: impl Into<String>,
        fhir_version: impl Into<String>,
    ) -> ConvertResult<Self> {
        Self::new(java, vec!["-jar".into(), jar.into()], fhir_version)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn leading_args(&self) -> &[String] {
        &self.leading_args
    }

    pub fn fhir_version(&self) -> &str {
        &self.fhir_version
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    validator: ValidatorConfig,
}

impl CoreConfig {
    pub fn new(validator: ValidatorConfig) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &ValidatorConfig {
        &self.validator
    }
}

/// Build the validator configuration from optional raw values.
///
/// Missing or blank values fall back to the defaults in [`crate::constants`].
pub fn validator_config_from_env_values(
    program: Option<String>,
    jar: Option<String>,
    fhir_version: Option<String>,
) -> ConvertResult<ValidatorConfig> {
    fn present(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    ValidatorConfig::java_jar(
        present(program).unwrap_or_else(|| DEFAULT_VALIDATOR_PROGRAM.into()),
        present(jar).unwrap_or_else(|| DEFAULT_VALIDATOR_JAR.into()),
        present(fhir_version).unwrap_or_else(|| DEFAULT_FHIR_VERSION.into()),
    )
}
