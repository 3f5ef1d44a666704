use crate::models::{HealthRes, RootRes};

/// Message reported by the service root.
pub const ROOT_MESSAGE: &str = "FHIR Converter is running";

/// Simple health service shared by the REST API and the CLI.
pub struct HealthService;

impl HealthService {
    /// Check health without creating an instance.
    ///
    /// The mapper has no backing store, so it is healthy whenever it can answer.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "FHIR mapper is alive".into(),
        }
    }

    /// Body of the liveness probe at the service root.
    pub fn root() -> RootRes {
        RootRes {
            message: ROOT_MESSAGE.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_message_is_stable() {
        let body = serde_json::to_value(HealthService::root()).expect("serialize");
        assert_eq!(body, serde_json::json!({ "message": "FHIR Converter is running" }));
    }

    #[test]
    fn health_is_ok() {
        assert!(HealthService::check_health().ok);
    }
}
