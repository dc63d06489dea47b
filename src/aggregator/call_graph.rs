//! Aggregate call graph across chains.
//!
//! Walks the selected chains once, counting calls per function and direct
//! caller/callee pairs, and pairs every CALL with its RETURN to collect
//! durations. The result is filtered by average duration and annotated for
//! a force-directed renderer.

use super::duration::DurationFilter;
use super::style::{edge_style, node_style, ColorScale, EdgeStyle, NodeStyle, WeightScale};
use crate::parser::{CallEvent, Chain, ChainData, Direction, FunctionTable};
use crate::utils::config::MICROS_PER_SECOND;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A function as seen in one traffic direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionKey {
    pub direction: Direction,
    pub address: u64,
}

impl FunctionKey {
    pub fn new(direction: Direction, address: u64) -> Self {
        Self { direction, address }
    }

    /// Graph node id, e.g. `receive_4660`
    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.direction.as_str(), self.address)
    }
}

/// Call count and durations (microseconds) of one function
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionStat {
    pub call_count: u64,
    pub total_duration: f64,
    pub durations: Vec<f64>,
}

impl FunctionStat {
    fn record(&mut self, duration: f64) {
        self.total_duration += duration;
        self.durations.push(duration);
    }

    /// Mean duration, 0 when the function never returned
    pub fn avg_duration(&self) -> f64 {
        if self.durations.is_empty() {
            0.0
        } else {
            self.total_duration / self.durations.len() as f64
        }
    }

    pub fn min_duration(&self) -> Option<f64> {
        self.durations.iter().copied().reduce(f64::min)
    }

    pub fn max_duration(&self) -> Option<f64> {
        self.durations.iter().copied().reduce(f64::max)
    }
}

/// Which chains to aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainSelection {
    #[default]
    All,
    Index(usize),
}

impl ChainSelection {
    fn select<'a>(&self, chains: &'a [Chain]) -> &'a [Chain] {
        match *self {
            ChainSelection::All => chains,
            ChainSelection::Index(index) => chains.get(index..=index).unwrap_or(&[]),
        }
    }
}

impl fmt::Display for ChainSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainSelection::All => f.write_str("all"),
            ChainSelection::Index(index) => write!(f, "{}", index),
        }
    }
}

impl std::str::FromStr for ChainSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ChainSelection::All);
        }
        s.parse::<usize>()
            .map(ChainSelection::Index)
            .map_err(|_| format!("invalid chain selection '{}' (expected 'all' or an index)", s))
    }
}

/// Raw accumulation state: per-function stats and per-edge weights
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallAggregate {
    pub stats: BTreeMap<FunctionKey, FunctionStat>,
    pub edges: BTreeMap<(FunctionKey, FunctionKey), u64>,
}

impl CallAggregate {
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn edge_weight(&self, caller: FunctionKey, callee: FunctionKey) -> Option<u64> {
        self.edges.get(&(caller, callee)).copied()
    }

    /// Average durations of one direction's functions
    pub fn averages(&self, direction: Direction) -> impl Iterator<Item = f64> + '_ {
        self.stats
            .iter()
            .filter(move |(key, _)| key.direction == direction)
            .map(|(_, stat)| stat.avg_duration())
    }
}

/// Accumulate call statistics over the selected chains of both directions
///
/// **Public** - first stage of graph building
pub fn aggregate_chains(data: &ChainData, selection: ChainSelection) -> CallAggregate {
    let mut aggregate = CallAggregate::default();

    for direction in Direction::ALL {
        for chain in selection.select(data.chains(direction)) {
            accumulate_chain(&mut aggregate, direction, chain);
        }
    }

    debug!(
        "Aggregated {} functions and {} edges ({} chains)",
        aggregate.stats.len(),
        aggregate.edges.len(),
        selection
    );

    aggregate
}

/// A call still waiting for its RETURN
struct OpenCall {
    key: FunctionKey,
    start_time: f64,
}

/// Fold one chain into the aggregate
///
/// **Private** - internal helper for aggregate_chains
fn accumulate_chain(aggregate: &mut CallAggregate, direction: Direction, chain: &[CallEvent]) {
    let mut stack: Vec<OpenCall> = Vec::new();

    for event in chain {
        let key = FunctionKey::new(direction, event.function_address);

        if !event.is_return {
            stack.push(OpenCall {
                key,
                start_time: event.timestamp,
            });
            aggregate.stats.entry(key).or_default().call_count += 1;

            if let [.., caller, _] = stack.as_slice() {
                *aggregate.edges.entry((caller.key, key)).or_insert(0) += 1;
            }
        } else if let Some(open) = stack.pop() {
            // Only a RETURN of the same function yields a duration
            if open.key == key {
                let duration = (event.timestamp - open.start_time) * MICROS_PER_SECOND;
                if let Some(stat) = aggregate.stats.get_mut(&key) {
                    stat.record(duration);
                }
            }
        }
    }
}

/// Class of an edge, by the directions of its endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    Receive,
    Send,
    Mixed,
}

impl EdgeClass {
    pub fn of(caller: FunctionKey, callee: FunctionKey) -> Self {
        match (caller.direction, callee.direction) {
            (Direction::Receive, Direction::Receive) => EdgeClass::Receive,
            (Direction::Send, Direction::Send) => EdgeClass::Send,
            _ => EdgeClass::Mixed,
        }
    }
}

/// One function node of the output graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub address: u64,
    pub display_name: String,
    pub category: Direction,
    pub avg_duration: f64,
    pub call_count: u64,
    pub total_duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration: Option<f64>,
    pub style: NodeStyle,
}

/// One caller -> callee edge of the output graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u64,
    pub class: EdgeClass,
    pub style: EdgeStyle,
}

/// Aggregated call graph, ready for a force-directed renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallGraph {
    pub title: String,
    pub subtitle: String,
    pub selection: ChainSelection,
    pub duration_filter: DurationFilter,
    pub color_scales: BTreeMap<Direction, ColorScale>,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl CallGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, source: &str, target: &str) -> Option<&GraphEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    pub fn edges_of_class(&self, class: EdgeClass) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.class == class)
    }
}

/// Options for graph building
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphOptions {
    pub selection: ChainSelection,
    pub duration_filter: DurationFilter,

    /// Direction whose chain supplies the thread id in single-chain subtitles
    pub focus: Direction,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            selection: ChainSelection::All,
            duration_filter: DurationFilter::default(),
            focus: Direction::Receive,
        }
    }
}

/// Build the aggregated call graph
///
/// **Public** - main entry point for graph building
///
/// # Arguments
/// * `data` - Chains for both directions
/// * `table` - Function metadata, used for node labels
/// * `options` - Chain selection, duration filter and focus direction
///
/// # Returns
/// Nodes for every function whose average duration passes the filter, and
/// the edges between surviving nodes. Never fails.
pub fn build_call_graph(data: &ChainData, table: &FunctionTable, options: &GraphOptions) -> CallGraph {
    let aggregate = aggregate_chains(data, options.selection);

    let color_scales: BTreeMap<Direction, ColorScale> = Direction::ALL
        .iter()
        .map(|&direction| (direction, ColorScale::from_averages(aggregate.averages(direction))))
        .collect();

    let nodes: Vec<GraphNode> = aggregate
        .stats
        .iter()
        .filter(|(_, stat)| options.duration_filter.contains(stat.avg_duration()))
        .map(|(key, stat)| {
            let scale = color_scales.get(&key.direction).copied().unwrap_or_default();
            to_graph_node(*key, stat, table, &scale)
        })
        .collect();

    let kept: Vec<(&(FunctionKey, FunctionKey), &u64)> = aggregate
        .edges
        .iter()
        .filter(|((caller, callee), _)| {
            let passes = |key: &FunctionKey| {
                aggregate
                    .stats
                    .get(key)
                    .is_some_and(|stat| options.duration_filter.contains(stat.avg_duration()))
            };
            passes(caller) && passes(callee)
        })
        .collect();

    let weight_scale = WeightScale::from_weights(kept.iter().map(|(_, weight)| **weight));

    let edges: Vec<GraphEdge> = kept
        .into_iter()
        .map(|(&(caller, callee), &weight)| GraphEdge {
            source: caller.id(),
            target: callee.id(),
            weight,
            class: EdgeClass::of(caller, callee),
            style: edge_style(weight, caller.direction, &weight_scale),
        })
        .collect();

    debug!(
        "Graph has {} of {} functions and {} of {} edges after duration filter",
        nodes.len(),
        aggregate.stats.len(),
        edges.len(),
        aggregate.edges.len()
    );

    let (title, subtitle) = describe(data, options, nodes.len(), edges.len());

    CallGraph {
        title,
        subtitle,
        selection: options.selection,
        duration_filter: options.duration_filter,
        color_scales,
        nodes,
        edges,
    }
}

/// Create a GraphNode from accumulated stats
///
/// **Private** - internal conversion
fn to_graph_node(
    key: FunctionKey,
    stat: &FunctionStat,
    table: &FunctionTable,
    scale: &ColorScale,
) -> GraphNode {
    let display_name = table.graph_label(key.address);
    let avg_duration = stat.avg_duration();
    let style = node_style(&display_name, stat.call_count, avg_duration, key.direction, scale);

    GraphNode {
        id: key.id(),
        address: key.address,
        display_name,
        category: key.direction,
        avg_duration,
        call_count: stat.call_count,
        total_duration: stat.total_duration,
        min_duration: stat.min_duration(),
        max_duration: stat.max_duration(),
        style,
    }
}

/// Title and subtitle for the graph header
fn describe(data: &ChainData, options: &GraphOptions, nodes: usize, edges: usize) -> (String, String) {
    match options.selection {
        ChainSelection::All => (
            "Aggregated Function Call Graph".to_string(),
            format!(
                "Duration: {}-{}μs | Nodes: {} | Links: {}",
                options.duration_filter.min_micros, options.duration_filter.max_micros, nodes, edges
            ),
        ),
        ChainSelection::Index(index) => {
            let thread = data
                .chains(options.focus)
                .get(index)
                .and_then(|chain| chain.first())
                .map(|event| event.thread_id.to_string())
                .unwrap_or_else(|| "-".to_string());

            // 1-based for display; widened so the largest index cannot overflow
            let number = index as u128 + 1;

            (
                format!("Chain {} Function Call Graph", number),
                format!("Thread: {} | Nodes: {} | Links: {}", thread, nodes, edges),
            )
        }
    }
}
