//! Outbound notification capability.

use crate::error::NotifyError;

/// A rendered message ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub subject: String,
    pub body: String,
    pub recipient: String,
    /// Body is HTML rather than plain text
    pub html: bool,
}

/// Generic message-send capability (email, chat, spool directory...).
pub trait Notifier {
    /// Deliver one message.
    fn send(&self, message: &Message) -> Result<(), NotifyError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}
