//! Configuration diagnostic handler

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::email::service::{ConfigurationStatus, DispatchService},
    infrastructure::http::state::AppState,
};

/// The configuration check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    /// Always `true`; the check itself cannot fail
    #[schema(example = true)]
    pub success: bool,

    /// The diagnostic configuration view; never carries the secret
    pub configuration: ConfigurationStatus,

    /// A human-readable summary
    #[schema(example = "Email service is properly configured")]
    pub message: String,
}

/// Report whether the email transport is configured
#[utoipa::path(
    get,
    operation_id = "config",
    tag = "System",
    path = "/api/config",
    responses(
        (status = StatusCode::OK, description = "Configuration status", body = ConfigResponse),
    )
)]
pub async fn handler<D: DispatchService>(State(state): State<AppState<D>>) -> Json<ConfigResponse> {
    let configuration = state.dispatch.configuration_status();

    let message = if configuration.is_configured {
        "Email service is properly configured"
    } else {
        "Email service is not configured. Please check your .env file."
    };

    Json(ConfigResponse {
        success: true,
        configuration,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::{
        domain::email::service::{
            ConfigurationStatus, MockDispatchService, TransportInitState,
        },
        infrastructure::http::{handlers::config::ConfigResponse, router, state::test_state},
    };

    #[tokio::test]
    async fn test_config_handler_reports_configured_transport() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch.expect_configuration_status().returning(|| ConfigurationStatus {
            is_configured: true,
            has_account_identifier: true,
            has_secret: true,
            transport_state: TransportInitState::Initialized,
        });

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .get("/api/config")
            .await;

        response.assert_status_ok();

        let json = response.json::<ConfigResponse>();

        assert!(json.success);
        assert!(json.configuration.is_configured);
        assert_eq!(json.message, "Email service is properly configured");

        Ok(())
    }

    #[tokio::test]
    async fn test_config_handler_reports_missing_configuration() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch.expect_configuration_status().returning(|| ConfigurationStatus {
            is_configured: false,
            has_account_identifier: false,
            has_secret: false,
            transport_state: TransportInitState::NotInitialized,
        });

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .get("/api/config")
            .await;

        response.assert_status_ok();

        let json = response.json::<ConfigResponse>();

        assert!(json.success);
        assert!(!json.configuration.is_configured);
        assert_eq!(
            json.message,
            "Email service is not configured. Please check your .env file."
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_config_response_never_contains_a_secret_value() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch.expect_configuration_status().returning(|| ConfigurationStatus {
            is_configured: true,
            has_account_identifier: true,
            has_secret: true,
            transport_state: TransportInitState::Initialized,
        });

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .get("/api/config")
            .await;

        let raw = response.text();

        assert!(!raw.contains("password"));
        assert!(!raw.contains("secret\":\""));

        Ok(())
    }
}
