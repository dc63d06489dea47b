//! Chain payload parser.
//!
//! Parses the backend's chain dump into structured `ChainData`.
//! The native shape is a two-element array `[receive, send]`; saved dumps
//! sometimes use an object with named directions instead. Each direction is
//! either `null` or an array of chains, and every event is a 4-tuple
//! `[timestamp, isReturn, functionAddress, threadId]`.

use super::schema::{CallEvent, Chain, ChainData};
use crate::utils::config::{RECEIVE_FIELD_NAMES, SEND_FIELD_NAMES};
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde_json::Value;
use std::path::Path;

/// Parse a raw chain payload
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::InvalidFormat` - payload is neither a `[receive, send]`
///   array nor an object with direction fields
///
/// Malformed chains and events are skipped with a warning; a missing or
/// `null` direction yields no chains for that direction.
pub fn parse_chain_data(raw: &Value) -> Result<ChainData, ParseError> {
    let (receive, send) = split_directions(raw)?;

    let data = ChainData::new(parse_direction("receive", receive), parse_direction("send", send));

    debug!(
        "Parsed {} receive chains and {} send chains",
        data.receive.len(),
        data.send.len()
    );

    Ok(data)
}

/// Load a chain payload from a JSON file
pub fn load_chain_data(path: impl AsRef<Path>) -> Result<ChainData, ParseError> {
    let path = path.as_ref();
    debug!("Reading chain data from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&contents)?;
    parse_chain_data(&raw)
}

/// Locate the receive and send sections of the payload
///
/// **Private** - internal helper for parse_chain_data
fn split_directions(raw: &Value) -> Result<(Option<&Value>, Option<&Value>), ParseError> {
    match raw {
        Value::Array(parts) => {
            if parts.len() > 2 {
                warn!("Chain payload has {} sections, ignoring all but the first two", parts.len());
            }
            Ok((parts.first(), parts.get(1)))
        }

        Value::Object(obj) => {
            let find = |names: &[&str]| names.iter().find_map(|name| obj.get(*name));
            let receive = find(RECEIVE_FIELD_NAMES);
            let send = find(SEND_FIELD_NAMES);

            if receive.is_none() && send.is_none() {
                return Err(ParseError::InvalidFormat(
                    "Chain payload object has neither receive nor send chains".to_string(),
                ));
            }
            Ok((receive, send))
        }

        Value::Null => Ok((None, None)),

        _ => Err(ParseError::InvalidFormat(
            "Chain payload must be a JSON array or object".to_string(),
        )),
    }
}

/// Parse all chains of one direction
///
/// **Private** - internal helper for parse_chain_data
fn parse_direction(label: &str, section: Option<&Value>) -> Vec<Chain> {
    let Some(section) = section else {
        return Vec::new();
    };

    match section {
        Value::Null => Vec::new(),
        Value::Array(chains) => chains
            .iter()
            .enumerate()
            .map(|(index, chain)| parse_chain(label, index, chain))
            .collect(),
        other => {
            warn!("Ignoring {} chains: expected an array, found {}", label, other);
            Vec::new()
        }
    }
}

/// Parse one chain
///
/// A chain that is not an array is kept as an empty chain so that chain
/// indices keep matching the payload.
fn parse_chain(label: &str, index: usize, chain: &Value) -> Chain {
    let Some(events) = chain.as_array() else {
        warn!("{} chain {} is not an array, treating as empty", label, index);
        return Vec::new();
    };

    let mut parsed = Vec::with_capacity(events.len());
    for (event_index, event) in events.iter().enumerate() {
        match parse_event(event) {
            Ok(event) => parsed.push(event),
            Err(e) => {
                // Log but don't fail - the collector occasionally truncates entries
                warn!("Failed to parse {} chain {} event {}: {}", label, index, event_index, e);
            }
        }
    }

    parsed
}

/// Parse a single `[timestamp, isReturn, address, threadId]` tuple
pub fn parse_event(event: &Value) -> Result<CallEvent, ParseError> {
    let fields = event
        .as_array()
        .ok_or_else(|| ParseError::InvalidFormat(format!("Expected event array, found {}", event)))?;

    if fields.len() < 4 {
        return Err(ParseError::InvalidFormat(format!(
            "Expected 4 event fields, found {}",
            fields.len()
        )));
    }

    let timestamp = fields[0]
        .as_f64()
        .ok_or_else(|| ParseError::InvalidFormat(format!("Invalid timestamp: {}", fields[0])))?;

    let is_return = parse_flag(&fields[1])?;
    let function_address = parse_json_u64(&fields[2])?;
    let thread_id = parse_json_u64(&fields[3])?;

    Ok(CallEvent {
        timestamp,
        is_return,
        function_address,
        thread_id,
    })
}

/// The return flag is `0`/`1` from the collector, but accept booleans too
fn parse_flag(value: &Value) -> Result<bool, ParseError> {
    if let Some(flag) = value.as_bool() {
        Ok(flag)
    } else if let Some(n) = value.as_f64() {
        Ok(n != 0.0)
    } else {
        Err(ParseError::InvalidFormat(format!("Invalid return flag: {}", value)))
    }
}

/// Helper to parse a u64 from a JSON number (integral floats included)
fn parse_json_u64(value: &Value) -> Result<u64, ParseError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }

    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(f as u64),
        _ => Err(ParseError::InvalidFormat(format!(
            "Expected non-negative integer, found {}",
            value
        ))),
    }
}
