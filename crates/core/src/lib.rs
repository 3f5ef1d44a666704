//! # Mapper Core
//!
//! Core conversion logic for the FHIR record mapper.
//!
//! This crate turns a flat JSON record into a FHIR R4 transaction Bundle and optionally runs
//! the external conformance validator over the result:
//! - Field classification ([`classifier`])
//! - Generic Observation construction ([`fallback`])
//! - Bundle assembly ([`mapper`])
//! - External validation ([`validator`])
//!
//! **No API concerns**: HTTP servers, OpenAPI documents and CLI parsing belong in `api-rest`,
//! `api-shared` and `mapper-cli`.

pub mod classifier;
pub mod config;
pub mod constants;
pub mod demographics;
pub mod error;
pub mod fallback;
pub mod mapper;
pub mod record;
pub mod validator;

pub use classifier::{classify, ClassifiedField};
pub use config::{validator_config_from_env_values, CoreConfig, ValidatorConfig};
pub use error::{ConvertError, ConvertResult};
pub use mapper::{convert_record, convert_to_fhir};
pub use record::{FieldValue, NormalizedRecord, RawRecord};
pub use validator::{validate_bundle, ValidationReport};

use fhir::BundleData;
use serde_json::Value;
use std::sync::Arc;

/// A converted bundle together with the validator's verdict on it.
#[derive(Clone, Debug)]
pub struct ConversionOutcome {
    pub bundle: BundleData,
    pub report: ValidationReport,
}

/// Conversion operations bound to a startup configuration.
///
/// Cheap to clone; shared across request handlers.
#[derive(Clone, Debug, Default)]
pub struct ConverterService {
    cfg: Arc<CoreConfig>,
}

impl ConverterService {
    /// Creates a new instance of ConverterService.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    /// Convert a record into a transaction bundle.
    ///
    /// # Errors
    ///
    /// See [`convert_to_fhir`].
    pub fn convert(&self, record: &Value) -> ConvertResult<BundleData> {
        convert_to_fhir(record)
    }

    /// Convert a record, then run the external validator over the bundle.
    ///
    /// Blocks on the validator process.
    ///
    /// # Errors
    ///
    /// Returns conversion errors unchanged (the validator is not run), and the launch or
    /// temporary-file errors of [`validate_bundle`].
    pub fn convert_and_validate(&self, record: &Value) -> ConvertResult<ConversionOutcome> {
        let bundle = self.convert(record)?;
        let report = validate_bundle(self.cfg.validator(), &bundle)?;
        Ok(ConversionOutcome { bundle, report })
    }
}
