//! Mail transport port

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

use crate::domain::email::{
    errors::{DispatchError, DispatchReceipt},
    message::OutboundMessage,
};

/// The observable lifecycle of a mail transport.
///
/// A transport constructed without a credential pair stays `Uninitialized`
/// and rejects every send. With credentials it starts in `Verifying` while a
/// background connectivity check runs, then settles in `Ready` whether or
/// not the check succeeded; sending is allowed in both states and a bad
/// credential surfaces on the first real send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    /// No credential pair was supplied; sends fail immediately
    Uninitialized,

    /// The background connectivity check has not completed yet
    Verifying,

    /// The background connectivity check has completed
    Ready,
}

impl TransportState {
    /// Whether the transport holds a live provider connection handle
    pub fn is_initialized(&self) -> bool {
        !matches!(self, Self::Uninitialized)
    }
}

/// The connection to the outbound mail provider
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    /// Dispatch one message to the provider.
    ///
    /// # Returns
    /// - [`Ok`] with a [`DispatchReceipt`] when the provider accepted the
    ///   message.
    /// - [`Err`] with a [`DispatchError`] when the transport is
    ///   unconfigured or the provider rejected the message.
    async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, DispatchError>;

    /// The transport's current lifecycle state
    fn state(&self) -> TransportState;
}

#[cfg(test)]
mock! {
    pub MailTransport {}

    #[async_trait]
    impl MailTransport for MailTransport {
        async fn send(&self, message: &OutboundMessage) -> Result<DispatchReceipt, DispatchError>;
        fn state(&self) -> TransportState;
    }
}
