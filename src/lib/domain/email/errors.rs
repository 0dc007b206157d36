//! Dispatch errors and receipts

use thiserror::Error;

use crate::domain::email::message::MessageError;

/// An error raised while dispatching a message
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The transport was never initialized with a valid credential pair
    #[error("email transport is not configured; set SMTP_USER and SMTP_PASSWORD")]
    Configuration,

    /// The mail provider rejected the message or the connection failed
    #[error("{0}")]
    Provider(String),

    /// The message itself was malformed
    #[error(transparent)]
    Message(#[from] MessageError),
}

/// The successful outcome of a dispatch
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// The provider's identifier for the accepted message, when the
    /// provider reported one
    pub message_id: Option<String>,
}

impl DispatchReceipt {
    /// A receipt carrying the provider's message identifier
    pub fn with_message_id(message_id: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
        }
    }
}
