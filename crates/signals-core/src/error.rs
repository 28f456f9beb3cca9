//! Error types for the signal pipeline.

use thiserror::Error;

/// Top-level pipeline error.
///
/// Anything that reaches this type aborts the current stage; per-symbol and
/// per-strategy failures are contained before they get here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Strategy error: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Status ledger error: {0}")]
    Status(#[from] StatusError),

    #[error("Bootstrap failed: {0}")]
    Bootstrap(String),
}

/// Strategy-specific errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Strategy not found: {0}")]
    NotFound(String),

    #[error("Strategy initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Strategy panicked: {0}")]
    Panicked(String),

    #[error("Strategy error: {0}")]
    Internal(String),
}

/// Series, signal table and feed errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("No stored series for symbol: {0}")]
    SymbolNotFound(String),

    #[error("Incoming batch for {0} has no date field")]
    MissingDateField(String),

    #[error("Incoming batch for {0} is empty")]
    EmptyBatch(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Notification dispatch errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("No recipient configured")]
    MissingRecipient,

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Status ledger errors.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
