//! Outbound email message

use thiserror::Error;

/// An error raised when assembling an [`OutboundMessage`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// The message has no recipients
    #[error("message has no recipients")]
    NoRecipients,

    /// The message has neither a text nor an HTML body
    #[error("message has no body")]
    NoBody,
}

/// A single outbound email, as handed to the mail transport
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Recipient addresses, in the order they were supplied
    pub to: Vec<String>,

    /// The subject line
    pub subject: String,

    /// The plain text body, if any
    pub text: Option<String>,

    /// The HTML body, if any
    pub html: Option<String>,

    /// The sender address; the transport falls back to its configured
    /// sender when absent
    pub from: Option<String>,
}

impl OutboundMessage {
    /// Assembles a message, enforcing that at least one recipient and at
    /// least one body variant are present.
    pub fn new(
        to: Vec<String>,
        subject: String,
        text: Option<String>,
        html: Option<String>,
        from: Option<String>,
    ) -> Result<Self, MessageError> {
        if to.is_empty() {
            return Err(MessageError::NoRecipients);
        }

        if text.is_none() && html.is_none() {
            return Err(MessageError::NoBody);
        }

        Ok(Self {
            to,
            subject,
            text,
            html,
            from,
        })
    }

    /// The recipient list in the comma-joined form used for logging and
    /// bulk-send echoes.
    pub fn recipients(&self) -> String {
        self.to.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_message_with_text_body_only() -> TestResult {
        let message = OutboundMessage::new(
            vec!["to@example.com".to_string()],
            "Hello".to_string(),
            Some("body".to_string()),
            None,
            None,
        )?;

        assert_eq!(message.recipients(), "to@example.com");

        Ok(())
    }

    #[test]
    fn test_message_without_recipients_is_rejected() {
        let result = OutboundMessage::new(
            vec![],
            "Hello".to_string(),
            Some("body".to_string()),
            None,
            None,
        );

        assert_eq!(result.unwrap_err(), MessageError::NoRecipients);
    }

    #[test]
    fn test_message_without_any_body_is_rejected() {
        let result = OutboundMessage::new(
            vec!["to@example.com".to_string()],
            "Hello".to_string(),
            None,
            None,
            None,
        );

        assert_eq!(result.unwrap_err(), MessageError::NoBody);
    }

    #[test]
    fn test_recipients_are_comma_joined_in_order() -> TestResult {
        let message = OutboundMessage::new(
            vec!["a@example.com".to_string(), "b@example.com".to_string()],
            "Hello".to_string(),
            None,
            Some("<p>body</p>".to_string()),
            None,
        )?;

        assert_eq!(message.recipients(), "a@example.com, b@example.com");

        Ok(())
    }
}
