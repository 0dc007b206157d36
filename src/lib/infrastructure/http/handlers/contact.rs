//! Contact-form submission handler
//!
//! Public-facing endpoint: dispatch failures are reported with a fixed
//! generic message and the underlying error is only logged, unlike the
//! trusted generic-send endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::{
    domain::email::{service::DispatchService, EmailAddress, OutboundMessage},
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Contact-form request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactBody {
    /// The submitter's name
    #[schema(example = "Jo")]
    pub name: Option<String>,

    /// The submitter's email address
    #[schema(example = "jo@example.com")]
    pub email: Option<String>,

    /// The message text
    #[schema(example = "Hi there")]
    pub message: Option<String>,
}

/// Contact-form response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactResponse {
    /// Always `true` on the success path
    #[schema(example = true)]
    pub success: bool,

    /// A fixed acknowledgment
    #[schema(example = "Message sent successfully! I'll get back to you soon.")]
    pub message: String,
}

/// Accept a contact-form submission and forward it by email
#[utoipa::path(
    post,
    operation_id = "contact",
    tag = "Email",
    path = "/api/contact",
    request_body = ContactBody,
    responses(
        (status = StatusCode::OK, description = "Message sent", body = ContactResponse),
        (status = StatusCode::BAD_REQUEST, description = "Missing or invalid fields", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Dispatch failed", body = ErrorResponse),
    )
)]
pub async fn handler<D: DispatchService>(
    State(state): State<AppState<D>>,
    request: Result<Json<ContactBody>, JsonRejection>,
) -> Result<Json<ContactResponse>, ApiError> {
    let Json(request) = request?;

    let (name, email, message) = match (
        non_empty(request.name),
        non_empty(request.email),
        non_empty(request.message),
    ) {
        (Some(name), Some(email), Some(message)) => (name, email, message),
        _ => {
            return Err(ApiError::new_400(
                "Missing required fields: name, email, and message are required",
            ))
        }
    };

    let email = EmailAddress::new(&email)
        .map_err(|_| ApiError::new_400("Invalid email format"))?;

    let Some(destination) = state.config.contact_email.clone() else {
        error!("contact form has no destination address; set CONTACT_EMAIL");
        return Err(generic_failure());
    };

    let outbound = OutboundMessage::new(
        vec![destination],
        format!("Portfolio Contact: {name}"),
        Some(plain_body(&name, &email, &message)),
        Some(html_body(&name, &email, &message)),
        state.config.default_from.clone(),
    )
    .map_err(|e| {
        error!("contact form produced an invalid message: {e}");
        generic_failure()
    })?;

    match state.dispatch.send_email(outbound).await {
        Ok(_) => Ok(Json(ContactResponse {
            success: true,
            message: "Message sent successfully! I'll get back to you soon.".to_string(),
        })),
        Err(e) => {
            error!("contact form dispatch failed: {e}");
            Err(generic_failure())
        }
    }
}

/// The fixed public failure message; the cause stays in the logs.
fn generic_failure() -> ApiError {
    ApiError::new_500("Failed to send message. Please try again later.")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// HTML variant: message newlines become `<br>`.
fn html_body(name: &str, email: &EmailAddress, message: &str) -> String {
    format!(
        "<h2>New Contact Message from Portfolio</h2>\n\
         <p><strong>Name:</strong> {name}</p>\n\
         <p><strong>Email:</strong> {email}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n\
         <hr>\n\
         <p><small>Sent from your portfolio contact form</small></p>",
        message.replace('\n', "<br>"),
    )
}

/// Plain variant: the message keeps its literal newlines.
fn plain_body(name: &str, email: &EmailAddress, message: &str) -> String {
    format!(
        "New Contact Message from Portfolio\n\n\
         Name: {name}\n\
         Email: {email}\n\
         Message: {message}\n\n\
         Sent from your portfolio contact form",
    )
}
