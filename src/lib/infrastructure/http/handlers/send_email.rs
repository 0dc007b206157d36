//! Generic send handler
//!
//! Trusted/internal-use endpoint: unlike the contact form it returns the
//! provider error text in the `details` field on failure. That asymmetry is
//! deliberate and flagged for product-owner review; do not unify it with the
//! contact endpoint's generic 500.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::email::{service::DispatchService, OutboundMessage},
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// One recipient or several; both JSON shapes are accepted
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Recipients {
    /// A single address
    One(String),

    /// An ordered list of addresses
    Many(Vec<String>),
}

impl Recipients {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(address) => vec![address],
            Self::Many(addresses) => addresses,
        }
    }
}

/// Generic send request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// Recipient address or addresses
    pub to: Option<Recipients>,

    /// The subject line
    #[schema(example = "Hello")]
    pub subject: Option<String>,

    /// The plain text body
    pub text: Option<String>,

    /// The HTML body
    pub html: Option<String>,

    /// The sender address; defaults to the configured sender
    pub from: Option<String>,
}

/// Generic send response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    /// Always `true` on the success path
    #[schema(example = true)]
    pub success: bool,

    /// A fixed acknowledgment
    #[schema(example = "Email sent successfully")]
    pub message: String,

    /// The provider's identifier for the accepted message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Send an arbitrary email through the shared transport
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Email",
    path = "/api/send-email",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = SendEmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing required fields", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Dispatch failed", body = ErrorResponse),
    )
)]
pub async fn handler<D: DispatchService>(
    State(state): State<AppState<D>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(request) = request?;

    let to = request
        .to
        .map(Recipients::into_vec)
        .unwrap_or_default()
        .into_iter()
        .filter(|address| !address.trim().is_empty())
        .collect::<Vec<_>>();

    let subject = request.subject.filter(|s| !s.trim().is_empty());

    // Empty strings count as absent, matching the presence check.
    let text = request.text.filter(|s| !s.is_empty());
    let html = request.html.filter(|s| !s.is_empty());

    let (to, subject) = match (to.is_empty(), subject, text.is_some() || html.is_some()) {
        (false, Some(subject), true) => (to, subject),
        _ => {
            return Err(ApiError::new_400(
                "Missing required fields: to, subject, and either text or html are required",
            ))
        }
    };

    let from = request.from.or_else(|| state.config.default_from.clone());

    let outbound = OutboundMessage::new(to, subject, text, html, from)
        .map_err(|e| ApiError::new_400(&e.to_string()))?;

    match state.dispatch.send_email(outbound).await {
        Ok(receipt) => Ok(Json(SendEmailResponse {
            success: true,
            message: "Email sent successfully".to_string(),
            message_id: receipt.message_id,
        })),
        Err(e) => Err(ApiError::new_500("Failed to send email").with_details(&e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        domain::email::service::MockDispatchService,
        domain::email::{DispatchError, DispatchReceipt},
        infrastructure::http::{
            errors::ErrorResponse,
            handlers::send_email::SendEmailResponse,
            router,
            state::test_state,
        },
    };

    #[tokio::test]
    async fn test_send_email_success_returns_message_id() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch
            .expect_send_email()
            .times(1)
            .withf(|message| {
                message.to == vec!["to@example.com".to_string()]
                    && message.from.as_deref() == Some("noreply@example.com")
            })
            .returning(|_| Ok(DispatchReceipt::with_message_id("2.0.0 OK")));

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .post("/api/send-email")
            .json(&json!({
                "to": "to@example.com",
                "subject": "Hello",
                "text": "body",
            }))
            .await;

        response.assert_status_ok();

        let body = response.json::<SendEmailResponse>();

        assert!(body.success);
        assert_eq!(body.message, "Email sent successfully");
        assert_eq!(body.message_id.as_deref(), Some("2.0.0 OK"));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_accepts_an_array_of_recipients() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch
            .expect_send_email()
            .times(1)
            .withf(|message| {
                message.to
                    == vec!["a@example.com".to_string(), "b@example.com".to_string()]
            })
            .returning(|_| Ok(DispatchReceipt::default()));

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .post("/api/send-email")
            .json(&json!({
                "to": ["a@example.com", "b@example.com"],
                "subject": "Hello",
                "html": "<p>body</p>",
            }))
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_missing_fields_are_rejected_without_dispatch() -> TestResult {
        let mut dispatch = MockDispatchService::new();
        dispatch.expect_send_email().times(0);

        let server = TestServer::new(router(test_state(Some(dispatch))))?;

        for body in [
            json!({"subject": "Hello", "text": "body"}),
            json!({"to": "to@example.com", "text": "body"}),
            json!({"to": "to@example.com", "subject": "Hello"}),
            json!({"to": [], "subject": "Hello", "text": "body"}),
        ] {
            let response = server.post("/api/send-email").json(&body).await;

            assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(
                response.json::<ErrorResponse>().error,
                "Missing required fields: to, subject, and either text or html are required"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_failure_exposes_error_details() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch
            .expect_send_email()
            .times(1)
            .returning(|_| Err(DispatchError::Provider("535 bad credentials".to_string())));

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .post("/api/send-email")
            .json(&json!({
                "to": "to@example.com",
                "subject": "Hello",
                "text": "body",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response.json::<ErrorResponse>();

        assert_eq!(json.error, "Failed to send email");
        assert_eq!(json.details.as_deref(), Some("535 bad credentials"));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_email_explicit_from_is_kept() -> TestResult {
        let mut dispatch = MockDispatchService::new();

        dispatch
            .expect_send_email()
            .times(1)
            .withf(|message| message.from.as_deref() == Some("me@example.com"))
            .returning(|_| Ok(DispatchReceipt::default()));

        let response = TestServer::new(router(test_state(Some(dispatch))))?
            .post("/api/send-email")
            .json(&json!({
                "to": "to@example.com",
                "subject": "Hello",
                "text": "body",
                "from": "me@example.com",
            }))
            .await;

        response.assert_status_ok();

        Ok(())
    }
}
