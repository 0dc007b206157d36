//! OpenAPI module

use utoipa::OpenApi;

use crate::domain::email::service::{BulkSendOutcome, ConfigurationStatus, TransportInitState};
use crate::infrastructure::http::{errors::ErrorResponse, handlers::*};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Portfolio Contact API"),
    paths(
        health::handler,
        config::handler,
        contact::handler,
        send_email::handler,
    ),
    components(schemas(
        health::HealthResponse,
        health::EndpointMap,
        config::ConfigResponse,
        contact::ContactBody,
        contact::ContactResponse,
        send_email::Recipients,
        send_email::SendEmailBody,
        send_email::SendEmailResponse,
        ConfigurationStatus,
        TransportInitState,
        BulkSendOutcome,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
