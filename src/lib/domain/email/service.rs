//! Dispatch service
//!
//! The operations exposed to HTTP handlers: single sends, templated sends,
//! sequential bulk sends, and the diagnostic configuration status. All of
//! them wrap the [`MailTransport`] port; none of them retry.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info};
use utoipa::ToSchema;

#[cfg(test)]
use mockall::mock;

use crate::domain::email::{
    errors::{DispatchError, DispatchReceipt},
    message::OutboundMessage,
    template,
    transport::{MailTransport, TransportState},
};

/// Which credential fields were found at startup, without their values
#[derive(Clone, Copy, Debug, Default)]
pub struct CredentialPresence {
    /// An account identifier was resolved
    pub has_account_identifier: bool,

    /// A secret was resolved
    pub has_secret: bool,
}

/// Whether the transport was constructed with a credential pair
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
pub enum TransportInitState {
    /// The transport holds a provider connection handle
    Initialized,

    /// The transport was constructed without credentials
    NotInitialized,
}

/// Diagnostic view of the email configuration.
///
/// Carries presence flags only; the secret value itself is never part of
/// this structure.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationStatus {
    /// Whether the transport is usable
    #[schema(example = true)]
    pub is_configured: bool,

    /// Whether an account identifier was found
    #[schema(example = true)]
    pub has_account_identifier: bool,

    /// Whether a secret was found
    #[schema(example = true)]
    pub has_secret: bool,

    /// The transport's initialization state
    pub transport_state: TransportInitState,
}

/// The outcome of one item in a bulk send
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendOutcome {
    /// Whether this item was accepted by the provider
    pub success: bool,

    /// The item's recipient list, comma-joined
    #[schema(example = "a@example.com, b@example.com")]
    pub recipient: String,

    /// The provider message identifier, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// The error text, on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Email dispatch operations
#[async_trait]
pub trait DispatchService: Send + Sync + 'static {
    /// Sends one message through the transport.
    ///
    /// Fails with [`DispatchError::Configuration`] without touching the
    /// network when the transport was constructed without credentials.
    async fn send_email(&self, message: OutboundMessage)
        -> Result<DispatchReceipt, DispatchError>;

    /// Renders `template` with literal `{{key}}` substitution from `data`
    /// and sends the result as an HTML-only message.
    async fn send_template_email(
        &self,
        to: Vec<String>,
        subject: String,
        template: String,
        data: Map<String, Value>,
        from: Option<String>,
    ) -> Result<DispatchReceipt, DispatchError>;

    /// Sends each message in order, one at a time. A failing item is
    /// recorded in its slot and the batch continues; the output order
    /// matches the input order.
    async fn send_bulk_emails(&self, messages: Vec<OutboundMessage>) -> Vec<BulkSendOutcome>;

    /// The diagnostic configuration status; never exposes the secret.
    fn configuration_status(&self) -> ConfigurationStatus;
}

#[cfg(test)]
mock! {
    pub DispatchService {}

    #[async_trait]
    impl DispatchService for DispatchService {
        async fn send_email(&self, message: OutboundMessage) -> Result<DispatchReceipt, DispatchError>;
        async fn send_template_email(
            &self,
            to: Vec<String>,
            subject: String,
            template: String,
            data: Map<String, Value>,
            from: Option<String>,
        ) -> Result<DispatchReceipt, DispatchError>;
        async fn send_bulk_emails(&self, messages: Vec<OutboundMessage>) -> Vec<BulkSendOutcome>;
        fn configuration_status(&self) -> ConfigurationStatus;
    }
}

/// Dispatch service over a shared mail transport
#[derive(Debug, Clone)]
pub struct DispatchServiceImpl<T>
where
    T: MailTransport,
{
    transport: Arc<T>,
    presence: CredentialPresence,
}

impl<T> DispatchServiceImpl<T>
where
    T: MailTransport,
{
    /// Creates a dispatch service over `transport`, remembering which
    /// credential fields were present for diagnostic reporting.
    pub fn new(transport: Arc<T>, presence: CredentialPresence) -> Self {
        Self {
            transport,
            presence,
        }
    }
}

#[async_trait]
impl<T> DispatchService for DispatchServiceImpl<T>
where
    T: MailTransport,
{
    async fn send_email(
        &self,
        message: OutboundMessage,
    ) -> Result<DispatchReceipt, DispatchError> {
        if !self.transport.state().is_initialized() {
            return Err(DispatchError::Configuration);
        }

        match self.transport.send(&message).await {
            Ok(receipt) => {
                info!(
                    to = %message.recipients(),
                    subject = %message.subject,
                    message_id = ?receipt.message_id,
                    "email sent"
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(to = %message.recipients(), "email sending failed: {e}");
                Err(e)
            }
        }
    }

    async fn send_template_email(
        &self,
        to: Vec<String>,
        subject: String,
        template: String,
        data: Map<String, Value>,
        from: Option<String>,
    ) -> Result<DispatchReceipt, DispatchError> {
        let html = template::render(&template, &data);

        let message = OutboundMessage::new(to, subject, None, Some(html), from)?;

        self.send_email(message).await
    }

    async fn send_bulk_emails(&self, messages: Vec<OutboundMessage>) -> Vec<BulkSendOutcome> {
        let mut outcomes = Vec::with_capacity(messages.len());

        // One send at a time; concurrency here would hammer the single
        // provider connection.
        for message in messages {
            let recipient = message.recipients();

            match self.send_email(message).await {
                Ok(receipt) => outcomes.push(BulkSendOutcome {
                    success: true,
                    recipient,
                    message_id: receipt.message_id,
                    error: None,
                }),
                Err(e) => outcomes.push(BulkSendOutcome {
                    success: false,
                    recipient,
                    message_id: None,
                    error: Some(e.to_string()),
                }),
            }
        }

        outcomes
    }

    fn configuration_status(&self) -> ConfigurationStatus {
        let state = self.transport.state();

        let transport_state = if state.is_initialized() {
            TransportInitState::Initialized
        } else {
            TransportInitState::NotInitialized
        };

        ConfigurationStatus {
            is_configured: state.is_initialized(),
            has_account_identifier: self.presence.has_account_identifier,
            has_secret: self.presence.has_secret,
            transport_state,
        }
    }
}
