//! Aggregate command: build the daily report and dispatch it.

use anyhow::Result;
use signals_config::NotifierKind;
use signals_core::traits::Notifier;
use signals_monitor::RunContext;
use signals_notify::{LogNotifier, OutboxNotifier};
use signals_report::{dispatch, render, Aggregator, Delivery, DispatchSettings};

use super::{abort, today, Workspace};
use crate::cli::AggregateArgs;

pub fn run(workspace: &Workspace, args: AggregateArgs) -> Result<()> {
    let ctx = RunContext::new("alerts", args.date.unwrap_or_else(today), &workspace.ledger);
    let report_config = &workspace.config.report;

    let aggregate = Aggregator::new(&workspace.signals, &workspace.series)
        .aggregate(&ctx)
        .map_err(|e| abort(&ctx, e))?;

    let date = args
        .date
        .or_else(|| aggregate.latest_as_of())
        .unwrap_or_else(today);
    let report = render(&aggregate, date, &report_config.subject_prefix);

    let notifier: Box<dyn Notifier> = match (args.dry_run, report_config.notifier) {
        (true, _) | (false, NotifierKind::Log) => Box::new(LogNotifier),
        (false, NotifierKind::Outbox) => {
            let outbox = OutboxNotifier::new(workspace.config.storage.outbox_dir());
            Box::new(match &report_config.sender {
                Some(sender) => outbox.with_sender(sender.as_str()),
                None => outbox,
            })
        }
    };
    let settings = DispatchSettings {
        recipient: report_config.recipient.clone(),
        html: report_config.html,
    };

    let delivery = dispatch(&report, aggregate.len(), &settings, notifier.as_ref(), &ctx)?;
    match delivery {
        Delivery::Sent => println!("{} symbols sent ({date})", aggregate.len()),
        Delivery::Failed(reason) => println!("Dispatch failed: {reason}"),
        Delivery::NoRecipient => println!("No recipient configured; report not sent"),
    }
    Ok(())
}
