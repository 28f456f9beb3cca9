//! Signal aggregation and the daily report.
//!
//! Collapses each symbol's signal table to the buy/sell votes at its own
//! latest date, renders the result and hands it to a notifier exactly once.

mod aggregator;
mod dispatch;
mod render;

pub use aggregator::{Aggregate, AggregateRow, Aggregator, Price};
pub use dispatch::{dispatch, Delivery, DispatchSettings};
pub use render::{escape_html, render, Report};
