//! Email dispatch domain: the message model, the transport port, and the
//! dispatch service that sits between HTTP handlers and the mail provider.

pub mod address;
pub mod errors;
pub mod message;
pub mod service;
pub mod template;
pub mod transport;

pub use address::EmailAddress;
pub use errors::{DispatchError, DispatchReceipt};
pub use message::OutboundMessage;
pub use transport::{MailTransport, TransportState};
