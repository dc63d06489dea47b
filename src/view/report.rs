//! Tree report: the call trees of one direction, after filtering.

use super::filter::{CallFilter, FilteredChain};
use super::processed::{process_chains, ChainStats};
use crate::aggregator::call_tree::{build_call_tree_indexed, CallTreeNode};
use crate::parser::{ChainData, Direction, FunctionTable};
use crate::utils::config::SCHEMA_VERSION;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level tree report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeReport {
    /// Schema version for compatibility checking
    pub version: String,

    pub direction: Direction,

    /// Totals before filtering
    pub stats: ChainStats,

    pub filter: CallFilter,

    pub chains: Vec<ChainTree>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// The call forest of one chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainTree {
    /// `chain-<index>`
    pub key: String,
    pub chain_index: usize,

    /// Thread of the first listed call
    pub thread_id: Option<u64>,

    /// Calls left after filtering
    pub call_count: usize,
    pub original_length: usize,
    pub roots: Vec<CallTreeNode>,
}

impl ChainTree {
    pub fn from_filtered(chain: &FilteredChain) -> Self {
        let roots = build_call_tree_indexed(
            chain.chain_index,
            chain.calls.iter().map(|call| (call.call_index, call.event)),
        );

        Self {
            key: format!("chain-{}", chain.chain_index),
            chain_index: chain.chain_index,
            thread_id: chain.calls.first().map(|call| call.event.thread_id),
            call_count: chain.calls.len(),
            original_length: chain.original_length,
            roots,
        }
    }
}

/// Process, filter and rebuild the call trees of one direction
///
/// **Public** - used by the tree command
pub fn build_tree_report(
    data: &ChainData,
    table: &FunctionTable,
    direction: Direction,
    filter: &CallFilter,
) -> TreeReport {
    let chains = data.chains(direction);
    let processed = process_chains(chains, table);

    TreeReport {
        version: SCHEMA_VERSION.to_string(),
        direction,
        stats: ChainStats::of(chains),
        filter: filter.clone(),
        chains: filter.apply(&processed).iter().map(ChainTree::from_filtered).collect(),
        generated_at: Utc::now().to_rfc3339(),
    }
}
