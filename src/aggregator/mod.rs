//! Derivations over call-chain events.
//!
//! This module transforms parsed chains into:
//! - Nested call trees (one forest per chain)
//! - An aggregated caller/callee graph with duration statistics
//! - Duration ranges and the visual encoding of the graph

pub mod call_graph;
pub mod call_tree;
pub mod duration;
pub mod style;

// Re-export main types and functions
pub use call_graph::{
    aggregate_chains, build_call_graph, CallAggregate, CallGraph, ChainSelection, EdgeClass,
    FunctionKey, FunctionStat, GraphEdge, GraphNode, GraphOptions,
};
pub use call_tree::{build_call_tree, build_call_tree_indexed, count_nodes, flatten, max_depth, CallTreeNode};
pub use duration::{positive_bounds, DurationFilter, DurationRange};
pub use style::{ColorScale, EdgeStyle, NodeStyle, WeightScale};
