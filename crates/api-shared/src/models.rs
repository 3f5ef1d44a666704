//! Wire shapes of the mapper's HTTP API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RootRes {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body: a single human-readable detail string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Captured output of the external validator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ValidationRes {
    pub stdout: String,
    pub stderr: String,
    pub returncode: i32,
    pub valid: bool,
}

/// Response of `POST /convert-and-validate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConvertAndValidateRes {
    /// Always `"success"`; failures use [`ErrorRes`].
    pub status: String,
    /// The transaction Bundle that was validated.
    #[schema(value_type = Object)]
    pub fhir: Value,
    pub validation: ValidationRes,
}

impl ConvertAndValidateRes {
    pub fn success(fhir: Value, validation: ValidationRes) -> Self {
        Self {
            status: "success".into(),
            fhir,
            validation,
        }
    }
}
