//! Symbol roster.
//!
//! The roster file maps group names to symbol lists:
//! `{"tech": ["AAPL", "MSFT"], "energy": ["XOM"]}`. The pipeline works on the
//! union of all groups.

use crate::ConfigError;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Load the roster file as a sorted, de-duplicated symbol list.
pub fn load_roster(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::RosterIo {
        path: path.display().to_string(),
        source,
    })?;
    parse_roster(&content)
}

/// Parse roster JSON text.
pub fn parse_roster(content: &str) -> Result<Vec<String>, ConfigError> {
    let groups: BTreeMap<String, Vec<String>> =
        serde_json::from_str(content).map_err(|e| ConfigError::Roster(e.to_string()))?;

    let symbols: BTreeSet<String> = groups
        .into_values()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(symbols.into_iter().collect())
}
