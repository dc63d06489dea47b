//! Inspection commands: single-call details and payload statistics.

use super::models::{DetailsArgs, InputArgs};
use super::utils::load_inputs;
use crate::aggregator::{aggregate_chains, ChainSelection, DurationRange};
use crate::parser::Direction;
use crate::view::{call_details, process_chains, thread_ids, CallDetails, ChainStats};
use anyhow::Result;
use log::info;

/// Execute the details command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input files missing or malformed
/// * Chain or call index out of range
pub fn execute_details(args: DetailsArgs) -> Result<CallDetails> {
    let (data, table) = load_inputs(&args.input)?;
    let processed = process_chains(data.chains(args.direction), &table);

    let details = call_details(&processed, &table, args.chain_index, args.call_index).ok_or_else(|| {
        anyhow::anyhow!(
            "No call #{} in {} chain #{} ({} chains loaded)",
            args.call_index,
            args.direction,
            args.chain_index,
            processed.len()
        )
    })?;

    println!("{}", details.render());

    Ok(details)
}

/// Per-direction totals reported by the stats command
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSummary {
    pub direction: Direction,
    pub stats: ChainStats,
    pub threads: Vec<u64>,
}

/// Payload-wide totals reported by the stats command
#[derive(Debug, Clone, PartialEq)]
pub struct PayloadSummary {
    pub directions: Vec<DirectionSummary>,
    pub function_count: usize,
    pub edge_count: usize,
    pub duration_range: DurationRange,
}

/// Execute the stats command
///
/// **Public** - main entry point called from main.rs
pub fn execute_stats(input: InputArgs) -> Result<PayloadSummary> {
    let (data, table) = load_inputs(&input)?;

    let directions: Vec<DirectionSummary> = Direction::ALL
        .iter()
        .map(|&direction| {
            let chains = data.chains(direction);
            DirectionSummary {
                direction,
                stats: ChainStats::of(chains),
                threads: thread_ids(&process_chains(chains, &table)),
            }
        })
        .collect();

    let aggregate = aggregate_chains(&data, ChainSelection::All);
    let summary = PayloadSummary {
        directions,
        function_count: aggregate.stats.len(),
        edge_count: aggregate.edges.len(),
        duration_range: DurationRange::from_aggregate(&aggregate),
    };

    info!(
        "{} functions, {} call edges across both directions",
        summary.function_count, summary.edge_count
    );

    for entry in &summary.directions {
        println!(
            "{:<8} chains: {:>5}  calls: {:>7}  threads: {}",
            entry.direction.label(),
            entry.stats.chain_count,
            entry.stats.call_count,
            format_threads(&entry.threads)
        );
    }
    println!(
        "Functions: {}  Edges: {}  Avg duration range: {}-{}μs",
        summary.function_count,
        summary.edge_count,
        summary.duration_range.min_micros,
        summary.duration_range.max_micros
    );

    Ok(summary)
}

/// **Private** - internal helper for execute_stats
fn format_threads(threads: &[u64]) -> String {
    if threads.is_empty() {
        return "-".to_string();
    }
    threads
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn input(chains: &str, funcs: Option<&str>) -> (InputArgs, Vec<NamedTempFile>) {
        let mut files = Vec::new();

        let mut chain_file = NamedTempFile::new().unwrap();
        write!(chain_file, "{}", chains).unwrap();
        let chains_path = chain_file.path().to_path_buf();
        files.push(chain_file);

        let funcs_path = funcs.map(|content| {
            let mut func_file = NamedTempFile::new().unwrap();
            write!(func_file, "{}", content).unwrap();
            let path = func_file.path().to_path_buf();
            files.push(func_file);
            path
        });

        (
            InputArgs {
                chains: chains_path,
                funcs: funcs_path,
            },
            files,
        )
    }

    #[test]
    fn test_execute_details() {
        let (input, _files) = input(
            "[[[[1.0, 0, 10, 3], [2.0, 0, 20, 3], [3.0, 1, 20, 3]]], null]",
            Some(r#"{"20": {"name": "tcp_v4_rcv", "kind": "FUNC"}}"#),
        );

        let details = execute_details(DetailsArgs {
            input,
            direction: Direction::Receive,
            chain_index: 0,
            call_index: 2,
        })
        .unwrap();

        assert_eq!(details.function_name, "tcp_v4_rcv");
        assert_eq!(details.depth, 1);
        assert_eq!(details.thread_id, 3);
        assert_eq!(details.metadata.map(|info| info.kind), Some("FUNC".to_string()));
    }

    #[test]
    fn test_execute_details_out_of_range() {
        let (input, _files) = input("[[[[1.0, 0, 10, 3]]], null]", None);

        let result = execute_details(DetailsArgs {
            input,
            chain_index: 0,
            call_index: 5,
            ..Default::default()
        });

        assert!(result.is_err());
    }

    #[test]
    fn test_execute_stats() {
        let (input, _files) = input(
            "[[[[1.0, 0, 1, 8], [2.0, 1, 1, 8]], [[1.0, 0, 2, 4]]], [[[0.0, 0, 3, 9]]]]",
            None,
        );

        let summary = execute_stats(input).unwrap();

        assert_eq!(summary.directions[0].stats.chain_count, 2);
        assert_eq!(summary.directions[0].stats.call_count, 3);
        assert_eq!(summary.directions[0].threads, vec![4, 8]);
        assert_eq!(summary.directions[1].threads, vec![9]);
        assert_eq!(summary.function_count, 3);
        assert_eq!(summary.edge_count, 0);
        assert_eq!(summary.duration_range.min_micros, 1_000_000.0);
        assert_eq!(summary.duration_range.max_micros, 1_000_000.0);
    }

    #[test]
    fn test_format_threads() {
        assert_eq!(format_threads(&[]), "-");
        assert_eq!(format_threads(&[2, 10]), "2, 10");
    }
}
