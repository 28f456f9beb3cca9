//! Core types and traits for the signal pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Series, RecentWindow)
//! - Signals and per-symbol signal tables
//! - Run outcomes and status records
//! - Traits for strategies, indicators and the external collaborators
//!   (series/signal storage, bar feed, notification, status ledger)

pub mod error;
pub mod traits;
pub mod types;

pub use error::{DataError, PipelineError};
pub use traits::*;
pub use types::*;
