//! API handler modules

use std::any::Any;

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

use super::errors::ErrorResponse;

pub mod config;
pub mod contact;
pub mod health;
pub mod send_email;

/// Catch panics and return a generic 500 error; the panic detail is logged,
/// never exposed.
pub fn panic_handler(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("unhandled panic in request handler: {details}");

    let error = ErrorResponse {
        success: false,
        error: "Internal server error".to_string(),
        details: None,
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(error)).into_response()
}
