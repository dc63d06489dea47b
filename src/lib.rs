//! Callchain Studio
//!
//! Call-tree and call-graph views over kernel network function-call chains.
//!
//! A chain is a flat sequence of CALL/RETURN events recorded for one traffic
//! direction (receive or send). This crate:
//! - parses chain payloads and the static function table ([`parser`])
//! - rebuilds per-chain call forests and an aggregated, styled call graph
//!   ([`aggregator`])
//! - derives listing data, filters and call details ([`view`])
//! - writes JSON reports and plain-text renderings ([`output`])
//!
//! The `callchain` binary wraps these in a CLI:
//!
//! ```bash
//! callchain tree --chains chains.json --funcs funcs.json --summary
//! callchain graph --chains chains.json --chain all --output graph.json
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
pub mod view;
