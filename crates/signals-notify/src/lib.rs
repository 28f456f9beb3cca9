//! Notification collaborators.
//!
//! Real mail transport is out of scope; these notifiers spool messages to a
//! directory for an external sender, write them to the log, or keep them in
//! memory.

mod log;
mod memory;
mod outbox;

pub use log::LogNotifier;
pub use memory::MemoryNotifier;
pub use outbox::OutboxNotifier;
