//! In-memory notifier.

use signals_core::error::NotifyError;
use signals_core::traits::{Message, Notifier};
use std::cell::RefCell;

/// Records sent messages; can be told to fail every send.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: RefCell<Vec<Message>>,
    fail: bool,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every send fails with a delivery error.
    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Message> {
        self.sent.borrow().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, message: &Message) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Delivery("relay unavailable".into()));
        }
        self.sent.borrow_mut().push(message.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
