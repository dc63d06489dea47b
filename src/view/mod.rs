//! Listing views over one direction's chains.
//!
//! This module handles:
//! - Enriching events with names, call types and depth
//! - Text, call-type and thread filters
//! - Details of a selected call
//! - The tree report combining the above with the tree builder

pub mod details;
pub mod filter;
pub mod processed;
pub mod report;

// Re-export main types
pub use details::{call_details, CallDetails};
pub use filter::{CallFilter, CallTypeFilter, FilteredChain};
pub use processed::{process_chains, thread_ids, ChainStats, ProcessedCall};
pub use report::{build_tree_report, ChainTree, TreeReport};
