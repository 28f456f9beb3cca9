//! Run outcomes and status records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Outcome of one unit of work (a symbol, or a symbol/strategy pair).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Ok,
    Skip,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Ok => "OK",
            Outcome::Skip => "SKIP",
            Outcome::Error => "ERROR",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal status of a whole stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusLevel {
    Ok,
    Error,
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::Ok => f.write_str("OK"),
            StatusLevel::Error => f.write_str("ERROR"),
        }
    }
}

/// Entry of the status ledger, one per module name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Run date
    pub date: NaiveDate,
    /// When the entry was written
    pub timestamp: DateTime<Utc>,
    pub status: StatusLevel,
    pub message: String,
}

impl RunStatus {
    /// Status stamped with the current time.
    pub fn new(date: NaiveDate, status: StatusLevel, message: impl Into<String>) -> Self {
        Self {
            date,
            timestamp: Utc::now(),
            status,
            message: message.into(),
        }
    }

    pub fn ok(date: NaiveDate, message: impl Into<String>) -> Self {
        Self::new(date, StatusLevel::Ok, message)
    }

    pub fn error(date: NaiveDate, message: impl Into<String>) -> Self {
        Self::new(date, StatusLevel::Error, message)
    }
}

/// Timing and outcome of one unit, as reported to the status collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub timestamp: DateTime<Utc>,
    /// Stage the unit belongs to
    pub module: String,
    /// Symbol, strategy id, or stage name for summary lines
    pub unit: String,
    pub outcome: Outcome,
    pub message: String,
    pub elapsed: Duration,
}

/// Result of merging one symbol's incoming batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub symbol: String,
    /// Dates that were not stored before
    pub rows_added: usize,
    /// Stored dates overwritten (only under last-wins)
    pub rows_replaced: usize,
    pub outcome: Outcome,
    pub message: String,
}

impl UpdateReport {
    pub fn skip(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            rows_added: 0,
            rows_replaced: 0,
            outcome: Outcome::Skip,
            message: "no new dates".to_string(),
        }
    }

    pub fn error(symbol: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            rows_added: 0,
            rows_replaced: 0,
            outcome: Outcome::Error,
            message: message.into(),
        }
    }
}
