//! Input data model for call-chain payloads.
//!
//! These types mirror what the collector hands us: flat per-chain event
//! sequences for both traffic directions and a static function table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One entry of a chain: a function entry (CALL) or exit (RETURN)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallEvent {
    /// Collector timestamp in seconds
    pub timestamp: f64,

    /// false = CALL, true = RETURN
    pub is_return: bool,

    /// Key into the function table
    pub function_address: u64,

    /// Originating thread
    pub thread_id: u64,
}

impl CallEvent {
    pub fn call(timestamp: f64, function_address: u64, thread_id: u64) -> Self {
        Self {
            timestamp,
            is_return: false,
            function_address,
            thread_id,
        }
    }

    pub fn ret(timestamp: f64, function_address: u64, thread_id: u64) -> Self {
        Self {
            timestamp,
            is_return: true,
            function_address,
            thread_id,
        }
    }

    pub fn call_type(&self) -> CallType {
        if self.is_return {
            CallType::Return
        } else {
            CallType::Call
        }
    }
}

/// An ordered event sequence for one logical execution trace
pub type Chain = Vec<CallEvent>;

/// Whether an event entered or left a function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallType {
    Call,
    Return,
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallType::Call => f.pad("CALL"),
            CallType::Return => f.pad("RETURN"),
        }
    }
}

/// Traffic direction a chain was recorded for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Receive,
    Send,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Receive, Direction::Send];

    /// Stable lowercase identifier, used in function keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Receive => "receive",
            Direction::Send => "send",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Receive => "Receive",
            Direction::Send => "Send",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "receive" | "recv" | "rx" => Ok(Direction::Receive),
            "send" | "tx" => Ok(Direction::Send),
            other => Err(format!("unknown direction '{}' (expected receive or send)", other)),
        }
    }
}

/// Chains for both directions, as delivered by one fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainData {
    pub receive: Vec<Chain>,
    pub send: Vec<Chain>,
}

impl ChainData {
    pub fn new(receive: Vec<Chain>, send: Vec<Chain>) -> Self {
        Self { receive, send }
    }

    pub fn chains(&self, direction: Direction) -> &[Chain] {
        match direction {
            Direction::Receive => &self.receive,
            Direction::Send => &self.send,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.receive.is_empty() && self.send.is_empty()
    }
}

/// Static metadata for one traced function
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub type_id: String,

    #[serde(default)]
    pub linkage: String,
}
