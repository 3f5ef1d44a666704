//! # API Shared
//!
//! Shared definitions for the mapper's outer surfaces.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`models` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and `mapper-cli` so both report the same shapes.

pub mod health;
pub mod models;

pub use health::HealthService;
pub use models::*;
