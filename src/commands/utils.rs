use super::models::InputArgs;
use crate::parser::{load_chain_data, load_function_table, ChainData, FunctionTable};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;

/// Load the chain payload and, when given, the function table
///
/// **Public** - shared first step of every data command
pub fn load_inputs(input: &InputArgs) -> Result<(ChainData, FunctionTable)> {
    let data = load_chain_data(&input.chains)
        .with_context(|| format!("Failed to load chains from {}", input.chains.display()))?;

    debug!(
        "Loaded {} receive and {} send chains",
        data.receive.len(),
        data.send.len()
    );

    let table = match &input.funcs {
        Some(path) => load_function_table(path)
            .with_context(|| format!("Failed to load function table from {}", path.display()))?,
        None => {
            info!("No function table given, names fall back to addresses");
            FunctionTable::new()
        }
    };

    Ok((data, table))
}

/// Validate a tree report or call graph JSON file
pub fn validate_output_file(file_path: PathBuf) -> Result<()> {
    println!("Validating output: {}", file_path.display());

    let raw: serde_json::Value = crate::output::read_json(&file_path)?;

    if raw.get("nodes").is_some() {
        let graph = crate::output::read_graph(&file_path).context("Invalid call graph JSON")?;

        println!("✓ Valid call graph JSON");
        println!("  Title: {}", graph.title);
        println!("  Selection: {}", graph.selection);
        println!(
            "  Duration filter: {}-{}μs",
            graph.duration_filter.min_micros, graph.duration_filter.max_micros
        );
        println!("  Nodes: {}", graph.nodes.len());
        println!("  Links: {}", graph.edges.len());
    } else {
        let report = crate::output::read_tree_report(&file_path).context("Invalid tree report JSON")?;

        println!("✓ Valid tree report JSON");
        println!("  Version: {}", report.version);
        println!("  Direction: {}", report.direction.label());
        println!("  Chains: {} of {}", report.chains.len(), report.stats.chain_count);
        println!("  Calls: {}", report.stats.call_count);
        println!("  Filtered: {}", report.filter.is_active());
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Callchain Studio Output Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Tree report:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  direction: string        - 'receive' or 'send'");
        println!("  stats: object            - Chain and call totals before filtering");
        println!("  filter: object           - Text, call type and thread filter applied");
        println!("  chains: array            - One entry per chain with matching calls");
        println!("    key: string            - 'chain-<index>'");
        println!("    thread_id: number?     - Thread of the first listed call");
        println!("    roots: array           - Call forest (key, depth, event, children)");
        println!("  generated_at: string     - ISO 8601 timestamp");
        println!();
        println!("Call graph:");
        println!("  title, subtitle: string  - Header text");
        println!("  selection: string|object - 'all' or {{\"index\": n}}");
        println!("  duration_filter: object  - Inclusive average-duration bounds (μs)");
        println!("  color_scales: object     - Per-direction min/max average (μs)");
        println!("  nodes: array             - id, display_name, category, durations, style");
        println!("  edges: array             - source, target, weight, class, style");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Callchain Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Output Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Call-tree and call-graph views for kernel network function traces.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_inputs_without_function_table() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[[[[1.0, 0, 100, 7], [1.5, 1, 100, 7]]], null]").unwrap();

        let input = InputArgs {
            chains: file.path().to_path_buf(),
            funcs: None,
        };
        let (data, table) = load_inputs(&input).unwrap();

        assert_eq!(data.receive.len(), 1);
        assert_eq!(data.receive[0].len(), 2);
        assert!(data.send.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_inputs_missing_file() {
        let input = InputArgs {
            chains: PathBuf::from("/nonexistent/chains.json"),
            funcs: None,
        };
        assert!(load_inputs(&input).is_err());
    }
}
