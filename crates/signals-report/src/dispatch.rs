//! Report dispatch.

use crate::render::Report;
use signals_core::error::PipelineError;
use signals_core::traits::{Message, Notifier};
use signals_core::types::RunStatus;
use signals_monitor::RunContext;

/// Where and how the report goes.
#[derive(Debug, Clone, Default)]
pub struct DispatchSettings {
    pub recipient: Option<String>,
    /// Send the HTML body; plain text otherwise
    pub html: bool,
}

/// Result of the single dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed(String),
    NoRecipient,
}

/// Send the report once and record the outcome as the run status.
///
/// A failed send is recorded but does not fail the call; the aggregate stays
/// valid regardless of delivery.
pub fn dispatch(
    report: &Report,
    symbols: usize,
    settings: &DispatchSettings,
    notifier: &dyn Notifier,
    ctx: &RunContext<'_>,
) -> Result<Delivery, PipelineError> {
    let recipient = settings
        .recipient
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let (delivery, status) = match recipient {
        None => {
            tracing::error!("No report recipient configured");
            (
                Delivery::NoRecipient,
                RunStatus::error(ctx.date(), "recipient not configured"),
            )
        }
        Some(recipient) => {
            let message = Message {
                subject: report.subject.clone(),
                body: if settings.html {
                    report.html.clone()
                } else {
                    report.text.clone()
                },
                recipient: recipient.to_string(),
                html: settings.html,
            };
            match notifier.send(&message) {
                Ok(()) => {
                    tracing::info!(
                        notifier = notifier.name(),
                        recipient,
                        symbols,
                        "Report dispatched"
                    );
                    (
                        Delivery::Sent,
                        RunStatus::ok(ctx.date(), format!("{symbols} symbols sent")),
                    )
                }
                Err(e) => {
                    tracing::error!(
                        notifier = notifier.name(),
                        error = %e,
                        "Report dispatch failed"
                    );
                    (
                        Delivery::Failed(e.to_string()),
                        RunStatus::error(ctx.date(), "notification dispatch failed"),
                    )
                }
            }
        }
    };

    ctx.finish(&status)?;
    Ok(delivery)
}
