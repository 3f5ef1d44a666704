use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::AppState;
use mapper_core::{validator_config_from_env_values, ConverterService, CoreConfig};

/// Main entry point for the FHIR record mapper service
///
/// Serves the REST API (with Swagger UI at `/swagger-ui`).
///
/// # Environment Variables
/// - `MAPPER_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MAPPER_VALIDATOR_PROGRAM`: program launching the validator (default: "java")
/// - `MAPPER_VALIDATOR_JAR`: validator jar passed after `-jar` (default: "./fhir/validator_cli.jar")
/// - `MAPPER_FHIR_VERSION`: FHIR version passed to the validator (default: "4.0")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("MAPPER_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    // Resolve configuration once at startup; handlers never read the environment.
    let validator = validator_config_from_env_values(
        std::env::var("MAPPER_VALIDATOR_PROGRAM").ok(),
        std::env::var("MAPPER_VALIDATOR_JAR").ok(),
        std::env::var("MAPPER_FHIR_VERSION").ok(),
    )?;
    tracing::info!(
        program = validator.program(),
        fhir_version = validator.fhir_version(),
        "validator configured"
    );

    let service = ConverterService::new(Arc::new(CoreConfig::new(validator)));
    let app = api_rest::router(AppState::new(service));

    tracing::info!("++ Starting FHIR mapper REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` plus info-level defaults for every crate that logs conversion outcomes.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("mapper_run=info".parse()?)
        .add_directive("api_rest=info".parse()?)
        .add_directive("mapper_core=info".parse()?))
}
