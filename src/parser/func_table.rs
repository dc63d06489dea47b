//! Function table lookup.
//!
//! The backend serves the table as a JSON object keyed by function address.
//! Keys are usually decimal strings; some dumps use `0x` hex.

use super::schema::FunctionInfo;
use crate::utils::config::{LABEL_KEEP_LEN, MAX_LABEL_LEN};
use crate::utils::error::ParseError;
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;

/// Read-only map from function address to metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionTable {
    entries: HashMap<u64, FunctionInfo>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: u64, info: FunctionInfo) {
        self.entries.insert(address, info);
    }

    pub fn get(&self, address: u64) -> Option<&FunctionInfo> {
        self.entries.get(&address)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name used in call listings and trees
    ///
    /// Falls back to `Unknown_<address>` for addresses missing from the table.
    pub fn display_name(&self, address: u64) -> String {
        match self.known_name(address) {
            Some(name) => name.to_string(),
            None => format!("Unknown_{}", address),
        }
    }

    /// Short label used for graph nodes
    ///
    /// Falls back to `0x<hex>` and truncates long names.
    pub fn graph_label(&self, address: u64) -> String {
        let name = match self.known_name(address) {
            Some(name) => name.to_string(),
            None => format!("0x{:x}", address),
        };
        truncate_label(&name)
    }

    fn known_name(&self, address: u64) -> Option<&str> {
        self.entries
            .get(&address)
            .map(|info| info.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

impl FromIterator<(u64, FunctionInfo)> for FunctionTable {
    fn from_iter<I: IntoIterator<Item = (u64, FunctionInfo)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_LEN {
        let kept: String = name.chars().take(LABEL_KEEP_LEN).collect();
        format!("{}...", kept)
    } else {
        name.to_string()
    }
}

/// Parse a function table from its JSON form
///
/// Entries whose key is not an address or whose value is not an object are
/// skipped with a warning.
pub fn parse_function_table(raw: &serde_json::Value) -> Result<FunctionTable, ParseError> {
    let obj = raw.as_object().ok_or_else(|| {
        ParseError::InvalidFormat("Function table must be a JSON object".to_string())
    })?;

    let mut table = FunctionTable::new();
    for (key, value) in obj {
        let Some(address) = parse_address(key) else {
            warn!("Skipping function table entry with invalid address '{}'", key);
            continue;
        };

        match serde_json::from_value::<FunctionInfo>(value.clone()) {
            Ok(info) => table.insert(address, info),
            Err(e) => warn!("Skipping function table entry {}: {}", key, e),
        }
    }

    debug!("Parsed function table with {} entries", table.len());
    Ok(table)
}

/// Load a function table from a JSON file
pub fn load_function_table(path: impl AsRef<Path>) -> Result<FunctionTable, ParseError> {
    let path = path.as_ref();
    debug!("Reading function table from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_json::from_str(&contents)?;
    parse_function_table(&raw)
}

/// Parse an address key in decimal or `0x` hex
pub fn parse_address(key: &str) -> Option<u64> {
    let key = key.trim();
    match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => key.parse::<u64>().ok(),
    }
}
