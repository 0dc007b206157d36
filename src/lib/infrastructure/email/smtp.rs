//! SMTP mail transport implementation
//!
//! One lettre transport per process, built once at startup and shared across
//! every request. A background task verifies connectivity after construction
//! and only logs the outcome; sending is never gated on it.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{error, info};

use crate::{
    domain::email::{
        message::MessageError, DispatchError, DispatchReceipt, MailTransport, OutboundMessage,
        TransportState,
    },
    infrastructure::config::{MailConfig, TransportCredentials},
};

/// SMTP mail transport over implicit TLS on the provider's submission port
pub struct SmtpMailTransport {
    inner: Option<AsyncSmtpTransport<Tokio1Executor>>,
    default_sender: Option<String>,
    verified: Arc<AtomicBool>,
}

impl std::fmt::Debug for SmtpMailTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailTransport")
            .field("initialized", &self.inner.is_some())
            .field("default_sender", &self.default_sender)
            .finish()
    }
}

impl SmtpMailTransport {
    /// Builds the transport.
    ///
    /// With a credential pair the lettre transport is constructed and a
    /// background connectivity check is spawned; construction itself never
    /// blocks on the network, and a bad credential surfaces on the first
    /// real send. Without credentials the transport stays uninitialized and
    /// rejects every send.
    pub fn new(
        config: &MailConfig,
        credentials: Option<TransportCredentials>,
    ) -> anyhow::Result<Self> {
        let default_sender = config
            .default_from
            .clone()
            .or_else(|| credentials.as_ref().map(|c| c.account.clone()));

        let Some(credentials) = credentials else {
            error!(
                "email credentials not found; set SMTP_USER and SMTP_PASSWORD \
                 or a PROVIDER_CONFIG blob"
            );

            return Ok(Self {
                inner: None,
                default_sender,
                verified: Arc::new(AtomicBool::new(false)),
            });
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .credentials(Credentials::new(credentials.account, credentials.secret))
            .port(config.port)
            .build();

        let verified = Arc::new(AtomicBool::new(false));

        spawn_verification(transport.clone(), Arc::clone(&verified));

        Ok(Self {
            inner: Some(transport),
            default_sender,
            verified,
        })
    }

    fn build_email(&self, message: &OutboundMessage) -> Result<Message, DispatchError> {
        let from = message
            .from
            .as_deref()
            .or(self.default_sender.as_deref())
            .ok_or_else(|| DispatchError::Provider("no sender address configured".to_string()))?;

        let mut builder = Message::builder()
            .from(parse_mailbox(from)?)
            .subject(message.subject.clone());

        for recipient in &message.to {
            builder = builder.to(parse_mailbox(recipient)?);
        }

        let email = match (&message.text, &message.html) {
            (Some(text), Some(html)) => builder.multipart(
                MultiPart::alternative_plain_html(text.clone(), html.clone()),
            ),
            (Some(text), None) => builder.header(ContentType::TEXT_PLAIN).body(text.clone()),
            (None, Some(html)) => builder.header(ContentType::TEXT_HTML).body(html.clone()),
            (None, None) => return Err(MessageError::NoBody.into()),
        };

        email.map_err(|e| DispatchError::Provider(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, DispatchError> {
        let Some(transport) = &self.inner else {
            return Err(DispatchError::Configuration);
        };

        let email = self.build_email(message)?;

        match transport.send(email).await {
            Ok(response) => Ok(DispatchReceipt {
                message_id: response.message().next().map(ToString::to_string),
            }),
            Err(e) => Err(DispatchError::Provider(e.to_string())),
        }
    }

    fn state(&self) -> TransportState {
        match (&self.inner, self.verified.load(Ordering::Acquire)) {
            (None, _) => TransportState::Uninitialized,
            (Some(_), false) => TransportState::Verifying,
            (Some(_), true) => TransportState::Ready,
        }
    }
}

/// Fire-and-forget connectivity check. Flips the observable state to
/// `Ready` whether or not the check succeeded; the outcome is only logged.
fn spawn_verification(transport: AsyncSmtpTransport<Tokio1Executor>, verified: Arc<AtomicBool>) {
    tokio::spawn(async move {
        match transport.test_connection().await {
            Ok(true) => info!("email transport verified, ready to send"),
            Ok(false) => error!("email transport verification failed: connection unusable"),
            Err(e) => error!("email transport verification failed: {e}"),
        }

        verified.store(true, Ordering::Release);
    });
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address
        .parse()
        .map_err(|e| DispatchError::Provider(format!("invalid address \"{address}\": {e}")))
}
