//! # API REST
//!
//! REST API implementation for the FHIR record mapper.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! Uses `api-shared` for response shapes and `mapper-core` for conversion.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ConvertAndValidateRes, ErrorRes, HealthRes, HealthService, RootRes, ValidationRes};
use fhir::Bundle;
use mapper_core::{ConvertError, ConverterService, ValidationReport};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: ConverterService,
}

impl AppState {
    pub fn new(service: ConverterService) -> Self {
        Self { service }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(root, health, convert, convert_and_validate),
    components(schemas(RootRes, HealthRes, ErrorRes, ValidationRes, ConvertAndValidateRes))
)]
pub struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Build the REST router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/convert", post(convert))
        .route("/convert-and-validate", post(convert_and_validate))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service is running", body = RootRes)
    )
)]
/// Liveness probe.
async fn root() -> Json<RootRes> {
    Json(HealthService::root())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/convert",
    request_body(content = serde_json::Value, description = "Flat record of field name to value"),
    responses(
        (status = 200, description = "FHIR R4 transaction Bundle", body = serde_json::Value),
        (status = 400, description = "Invalid or empty record", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Convert a flat record into a FHIR transaction Bundle.
///
/// One Patient (when demographics are present), one placeholder Practitioner and one
/// Observation per remaining field. Fields that fail the FHIR schema are dropped.
async fn convert(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(record) = body.map_err(reject_body)?;

    let bundle = state
        .service
        .convert(&record)
        .map_err(|e| convert_error("Convert", e))?;

    Bundle::to_value(&bundle)
        .map(Json)
        .map_err(|e| convert_error("Convert", e.into()))
}

#[utoipa::path(
    post,
    path = "/convert-and-validate",
    request_body(content = serde_json::Value, description = "Flat record of field name to value"),
    responses(
        (status = 200, description = "Bundle with the validator's report", body = ConvertAndValidateRes),
        (status = 400, description = "Invalid or empty record", body = ErrorRes),
        (status = 500, description = "Validator could not be run", body = ErrorRes)
    )
)]
/// Convert a record and run the external validator over the resulting Bundle.
///
/// A bundle the validator rejects is still a 200; see `validation.valid`.
async fn convert_and_validate(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ConvertAndValidateRes>, ApiError> {
    let Json(record) = body.map_err(reject_body)?;

    let service = state.service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.convert_and_validate(&record))
        .await
        .map_err(|e| {
            tracing::error!("Validator task failed: {:?}", e);
            internal_error()
        })?
        .map_err(|e| convert_error("Convert and validate", e))?;

    let fhir =
        Bundle::to_value(&outcome.bundle).map_err(|e| convert_error("Convert and validate", e.into()))?;

    Ok(Json(ConvertAndValidateRes::success(
        fhir,
        validation_res(outcome.report),
    )))
}

fn validation_res(report: ValidationReport) -> ValidationRes {
    ValidationRes {
        stdout: report.stdout,
        stderr: report.stderr,
        returncode: report.returncode,
        valid: report.valid,
    }
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    tracing::error!("Rejected request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorRes::new(rejection.body_text())),
    )
}

fn convert_error(context: &str, e: ConvertError) -> ApiError {
    tracing::error!("{} error: {:?}", context, e);
    let status = if e.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(ErrorRes::new(e.to_string())))
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes::new("Internal error")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use mapper_core::{CoreConfig, ValidatorConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with_validator(validator: ValidatorConfig) -> Router {
        let service = ConverterService::new(Arc::new(CoreConfig::new(validator)));
        router(AppState::new(service))
    }

    fn app() -> Router {
        app_with_validator(ValidatorConfig::default())
    }

    fn sh(script: &str) -> ValidatorConfig {
        ValidatorConfig::new("sh", vec!["-c".into(), script.into()], "4.0").expect("valid config")
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn root_reports_running() {
        let request = Request::builder().uri("/").body(Body::empty()).expect("request");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "FHIR Converter is running");
    }

    #[tokio::test]
    async fn convert_returns_transaction_bundle() {
        let (status, body) = send(
            app(),
            post_json(
                "/convert",
                r#"{"first_name":"Jane","dob":"01-Jan-1990","heart_rate":"72"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resourceType"], "Bundle");
        assert_eq!(body["type"], "transaction");
        let entries = body["entry"].as_array().expect("entries");
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0]["resource"]["birthDate"], "1990-01-01");
        assert_eq!(entries[2]["resource"]["valueQuantity"]["value"], 72.0);
    }

    #[tokio::test]
    async fn convert_empty_record_is_bad_request() {
        let (status, body) = send(app(), post_json("/convert", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "No valid FHIR resources could be generated from input."
        );
    }

    #[tokio::test]
    async fn convert_rejects_non_object_and_malformed_bodies() {
        let (status, body) = send(app(), post_json("/convert", "[1,2]")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());

        let (status, body) = send(app(), post_json("/convert", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn convert_and_validate_passes_validator_output_through() {
        let app = app_with_validator(sh("echo 'Success: 0 errors'; exit 0"));
        let (status, body) = send(
            app,
            post_json("/convert-and-validate", r#"{"uhid":"P1","notes":"stable"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["fhir"]["resourceType"], "Bundle");
        assert_eq!(body["validation"]["stdout"], "Success: 0 errors\n");
        assert_eq!(body["validation"]["returncode"], 0);
        assert_eq!(body["validation"]["valid"], true);
    }

    #[tokio::test]
    async fn rejected_bundle_is_still_ok_response() {
        let app = app_with_validator(sh("echo 'Error: missing code' >&2; exit 1"));
        let (status, body) = send(app, post_json("/convert-and-validate", r#"{"x":"y"}"#)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["validation"]["valid"], false);
        assert_eq!(body["validation"]["returncode"], 1);
        assert_eq!(body["validation"]["stderr"], "Error: missing code\n");
    }

    #[tokio::test]
    async fn validator_launch_failure_is_server_error() {
        let missing = ValidatorConfig::new("definitely-not-a-validator-binary", vec![], "4.0")
            .expect("valid config");
        let (status, body) = send(
            app_with_validator(missing),
            post_json("/convert-and-validate", r#"{"x":"y"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .expect("detail")
            .starts_with("Error running validator"));
    }

    #[tokio::test]
    async fn convert_and_validate_empty_record_is_bad_request() {
        let (status, _) = send(
            app_with_validator(sh("exit 0")),
            post_json("/convert-and-validate", "{}"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .expect("request");
        let (status, body) = send(app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/convert"].is_object());
        assert!(body["paths"]["/convert-and-validate"].is_object());
    }
}
