//! Graph command implementation.
//!
//! The graph command:
//! 1. Loads the chain payload and function table
//! 2. Resolves the duration filter (explicit bounds or the observed range)
//! 3. Aggregates the selected chains into a call graph
//! 4. Writes the graph JSON and optionally prints a summary

use super::models::GraphArgs;
use super::utils::load_inputs;
use crate::aggregator::{build_call_graph, CallGraph, DurationFilter, DurationRange, GraphOptions};
use crate::output::{render_graph_summary, write_graph};
use crate::parser::ChainData;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the graph command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input files missing or malformed
/// * Graph write failures
pub fn execute_graph(args: GraphArgs) -> Result<CallGraph> {
    let start_time = Instant::now();

    info!("Building call graph for chains: {}", args.selection);

    info!("Step 1/4: Loading input files...");
    let (data, table) = load_inputs(&args.input)?;

    info!("Step 2/4: Resolving duration filter...");
    let duration_filter = resolve_filter(&data, args.min_micros, args.max_micros)?;
    debug!(
        "Duration filter: {}-{}μs",
        duration_filter.min_micros, duration_filter.max_micros
    );

    info!("Step 3/4: Aggregating calls...");
    let options = GraphOptions {
        selection: args.selection,
        duration_filter,
        focus: args.focus,
    };
    let graph = build_call_graph(&data, &table, &options);

    info!("Graph: {} nodes, {} links", graph.nodes.len(), graph.edges.len());

    info!("Step 4/4: Writing output...");
    write_graph(&graph, &args.output_json).context("Failed to write call graph JSON")?;
    info!("✓ Call graph written to: {}", args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("CALL GRAPH SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", render_graph_summary(&graph, args.top));
        println!("{}", "=".repeat(80));
    }

    info!("Graph command completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(graph)
}

/// Duration filter from the CLI bounds
///
/// Missing bounds are taken from the observed range of all chains.
///
/// **Private** - internal helper for execute_graph
///
/// # Errors
/// * The resolved lower bound exceeds the upper bound
fn resolve_filter(data: &ChainData, min_micros: Option<f64>, max_micros: Option<f64>) -> Result<DurationFilter> {
    let filter = match (min_micros, max_micros) {
        (Some(min), Some(max)) => DurationFilter::new(min, max),
        (min, max) => {
            let observed = DurationFilter::from_range(DurationRange::observed(data));
            DurationFilter::new(
                min.unwrap_or(observed.min_micros),
                max.unwrap_or(observed.max_micros),
            )
        }
    };

    if filter.min_micros > filter.max_micros {
        anyhow::bail!(
            "Duration filter is empty: minimum {}μs exceeds maximum {}μs (observed range fills missing bounds)",
            filter.min_micros,
            filter.max_micros
        );
    }

    Ok(filter)
}

/// Validate graph arguments
///
/// **Public** - can be called before execute_graph for early validation
pub fn validate_args(args: &GraphArgs) -> Result<()> {
    if args.input.chains.as_os_str().is_empty() {
        anyhow::bail!("Chains file path cannot be empty");
    }

    for bound in [args.min_micros, args.max_micros].into_iter().flatten() {
        if !bound.is_finite() || bound < 0.0 {
            anyhow::bail!("Duration bounds must be finite and non-negative (got {})", bound);
        }
    }

    if let (Some(min), Some(max)) = (args.min_micros, args.max_micros) {
        if min > max {
            anyhow::bail!("--min-us ({}) must not exceed --max-us ({})", min, max);
        }
    }

    if args.top == 0 {
        anyhow::bail!("top must be greater than 0");
    }

    Ok(())
}
