//! Rebuild nested call trees from flat call/return sequences.
//!
//! A chain is a flat list of CALL and RETURN events. Nesting is recovered with
//! a single stack of open calls:
//!
//! ```text
//! CALL a, CALL b, RETURN b, RETURN a
//!
//! a
//! ├── b
//! │   └── RETURN b
//! └── RETURN a
//! ```
//!
//! Matching is positional: a RETURN closes the innermost open CALL whatever
//! its address. A RETURN with nothing open becomes a root-level leaf, and
//! CALLs still open when the chain ends keep the children captured so far.

use crate::parser::CallEvent;
use log::debug;
use serde::{Deserialize, Serialize};

/// One event placed in the reconstructed call tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallTreeNode {
    /// Stable key, `<chain_index>-<position among the processed events>`
    pub key: String,

    /// Chain the event belongs to
    pub chain_index: usize,

    /// Position of the event in its original chain
    pub call_index: usize,

    /// Nesting level (0 = top level)
    pub depth: usize,

    /// The originating event
    pub event: CallEvent,

    /// Nested events, in original order
    pub children: Vec<CallTreeNode>,
}

impl CallTreeNode {
    fn new(key: String, chain_index: usize, call_index: usize, depth: usize, event: CallEvent) -> Self {
        Self {
            key,
            chain_index,
            call_index,
            depth,
            event,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + count_nodes(&self.children)
    }

    /// Number of levels in this subtree, including self
    pub fn height(&self) -> usize {
        1 + max_depth(&self.children)
    }
}

/// Build the call forest for one chain
///
/// **Public** - main entry point for tree reconstruction
///
/// # Arguments
/// * `chain_index` - Index of the chain, used in node keys
/// * `events` - The chain's events in collector order
///
/// # Returns
/// Root nodes in order. Never fails; an empty chain gives an empty forest.
pub fn build_call_tree(chain_index: usize, events: &[CallEvent]) -> Vec<CallTreeNode> {
    build_call_tree_indexed(chain_index, events.iter().copied().enumerate())
}

/// Build the call forest from events that carry their original call index
///
/// Used for filtered chains, where the position in the input no longer
/// matches the position in the chain.
pub fn build_call_tree_indexed<I>(chain_index: usize, events: I) -> Vec<CallTreeNode>
where
    I: IntoIterator<Item = (usize, CallEvent)>,
{
    let mut roots: Vec<CallTreeNode> = Vec::new();

    // Calls not yet matched to a return, innermost last
    let mut open: Vec<CallTreeNode> = Vec::new();

    for (node_id, (call_index, event)) in events.into_iter().enumerate() {
        let key = format!("{}-{}", chain_index, node_id);

        if !event.is_return {
            let depth = open.len();
            open.push(CallTreeNode::new(key, chain_index, call_index, depth, event));
        } else if let Some(mut call) = open.pop() {
            let node = CallTreeNode::new(key, chain_index, call_index, call.depth, event);
            call.children.push(node);
            attach(&mut open, &mut roots, call);
        } else {
            roots.push(CallTreeNode::new(key, chain_index, call_index, 0, event));
        }
    }

    if !open.is_empty() {
        debug!("Chain {}: {} calls never returned", chain_index, open.len());
    }

    // Unmatched calls keep whatever was captured before the chain ended
    while let Some(call) = open.pop() {
        attach(&mut open, &mut roots, call);
    }

    roots
}

/// Hand a closed node to its parent, or to the roots when nothing is open
///
/// Children are attached when they close; siblings only open after the
/// previous one closed, so original order is preserved.
fn attach(open: &mut [CallTreeNode], roots: &mut Vec<CallTreeNode>, node: CallTreeNode) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => roots.push(node),
    }
}

/// Total number of nodes in a forest
pub fn count_nodes(forest: &[CallTreeNode]) -> usize {
    forest.iter().map(CallTreeNode::node_count).sum()
}

/// Number of levels in the deepest tree of a forest (0 for an empty forest)
pub fn max_depth(forest: &[CallTreeNode]) -> usize {
    forest.iter().map(CallTreeNode::height).max().unwrap_or(0)
}

/// Pre-order traversal of a forest
pub fn flatten(forest: &[CallTreeNode]) -> Vec<&CallTreeNode> {
    let mut out = Vec::with_capacity(count_nodes(forest));
    let mut pending: Vec<&CallTreeNode> = forest.iter().rev().collect();

    while let Some(node) = pending.pop() {
        out.push(node);
        pending.extend(node.children.iter().rev());
    }

    out
}
