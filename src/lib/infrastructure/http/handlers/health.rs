//! Health check handler

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The endpoint map advertised by the health check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMap {
    /// The contact-form endpoint
    #[schema(example = "POST /api/contact")]
    pub contact: String,

    /// The generic send endpoint
    #[schema(example = "POST /api/send-email")]
    pub send_email: String,

    /// This endpoint
    #[schema(example = "GET /")]
    pub health: String,

    /// The configuration diagnostic endpoint
    #[schema(example = "GET /api/config")]
    pub config: String,

    /// The OpenAPI document
    #[schema(example = "GET /api/openapi.json")]
    pub openapi: String,
}

/// The health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// A fixed liveness message
    #[schema(example = "Portfolio Contact API is running!")]
    pub message: String,

    /// The package version
    #[schema(example = "1.0.0")]
    pub version: String,

    /// The declared endpoint set
    pub endpoints: EndpointMap,
}

/// Report that the service is up, with its version and endpoint map
#[utoipa::path(
    get,
    operation_id = "health",
    tag = "System",
    path = "/",
    responses(
        (status = StatusCode::OK, description = "Service is running", body = HealthResponse),
    )
)]
pub async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Portfolio Contact API is running!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: EndpointMap {
            contact: "POST /api/contact".to_string(),
            send_email: "POST /api/send-email".to_string(),
            health: "GET /".to_string(),
            config: "GET /api/config".to_string(),
            openapi: "GET /api/openapi.json".to_string(),
        },
    })
}
