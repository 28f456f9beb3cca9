//! Log-only notifier.

use signals_core::error::NotifyError;
use signals_core::traits::{Message, Notifier};

/// Writes the message to the log instead of sending it. Useful for dry runs.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %message.recipient,
            subject = %message.subject,
            bytes = message.body.len(),
            "Notification (dry run)"
        );
        tracing::debug!("{}", message.body);
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
