//! Payload parsing and the input data model.
//!
//! This module handles:
//! - Parsing raw chain dumps for both traffic directions
//! - Loading the function address table
//! - Defining the event and metadata types the builders consume

pub mod chain_data;
pub mod func_table;
pub mod schema;

// Re-export main types
pub use chain_data::{load_chain_data, parse_chain_data, parse_event};
pub use func_table::{load_function_table, parse_address, parse_function_table, FunctionTable};
pub use schema::{CallEvent, CallType, Chain, ChainData, Direction, FunctionInfo};
