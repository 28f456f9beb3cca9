//! Spool-to-directory notifier.

use chrono::Utc;
use signals_core::error::NotifyError;
use signals_core::traits::{Message, Notifier};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Writes each message as a small RFC 822-style file into an outbox
/// directory picked up by the mail relay.
pub struct OutboxNotifier {
    dir: PathBuf,
    sender: Option<String>,
}

impl OutboxNotifier {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sender: None,
        }
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn render(&self, message: &Message) -> String {
        let content_type = if message.html {
            "text/html; charset=utf-8"
        } else {
            "text/plain; charset=utf-8"
        };
        let mut out = String::new();
        if let Some(sender) = &self.sender {
            out.push_str(&format!("From: {sender}\n"));
        }
        out.push_str(&format!("To: {}\n", message.recipient));
        out.push_str(&format!("Subject: {}\n", message.subject));
        out.push_str(&format!("Date: {}\n", Utc::now().to_rfc2822()));
        out.push_str(&format!("Content-Type: {content_type}\n\n"));
        out.push_str(&message.body);
        out
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        if message.recipient.trim().is_empty() {
            return Err(NotifyError::MissingRecipient);
        }
        fs::create_dir_all(&self.dir)?;

        let name = format!("{}-{}.eml", Utc::now().format("%Y%m%dT%H%M%S"), Uuid::new_v4());
        let path = self.dir.join(name);
        fs::write(&path, self.render(message))?;

        tracing::info!(path = %path.display(), recipient = %message.recipient, "Message spooled");
        Ok(())
    }

    fn name(&self) -> &str {
        "outbox"
    }
}
