//! Tree command implementation.
//!
//! The tree command:
//! 1. Loads the chain payload and function table
//! 2. Processes and filters the chains of one direction
//! 3. Rebuilds a call forest per chain
//! 4. Writes the JSON report and/or prints the trees

use super::models::TreeArgs;
use super::utils::load_inputs;
use crate::output::{render_tree_report, write_tree_report};
use crate::view::{build_tree_report, TreeReport};
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the tree command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Input files missing or malformed
/// * Report write failures
pub fn execute_tree(args: TreeArgs) -> Result<TreeReport> {
    let start_time = Instant::now();

    info!("Building {} call trees", args.direction.label());

    info!("Step 1/3: Loading input files...");
    let (data, table) = load_inputs(&args.input)?;

    info!("Step 2/3: Filtering calls and building trees...");
    let report = build_tree_report(&data, &table, args.direction, &args.filter);

    debug!(
        "{} of {} chains have matching calls",
        report.chains.len(),
        report.stats.chain_count
    );

    info!("Step 3/3: Writing output...");
    if let Some(path) = &args.output_json {
        write_tree_report(&report, path).context("Failed to write tree report JSON")?;
        info!("✓ Tree report written to: {}", path.display());
    }

    if args.print_summary {
        println!("{}", render_tree_report(&report, &table));
    }

    info!("Tree command completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// Validate tree arguments
///
/// **Public** - can be called before execute_tree for early validation
pub fn validate_args(args: &TreeArgs) -> Result<()> {
    if args.input.chains.as_os_str().is_empty() {
        anyhow::bail!("Chains file path cannot be empty");
    }

    if args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: pass --output and/or --summary");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::models::InputArgs;
    use crate::parser::Direction;
    use crate::view::{CallFilter, CallTypeFilter};
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn chains_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"receive": [[[1.0, 0, 100, 7], [1.1, 0, 200, 7], [1.2, 1, 200, 7], [1.3, 1, 100, 7]]],
                "send": [[[2.0, 0, 300, 9]]]}}"#
        )
        .unwrap();
        file
    }

    #[test]
    fn test_validate_args_valid() {
        let args = TreeArgs {
            print_summary: true,
            ..Default::default()
        };
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_no_output() {
        let args = TreeArgs::default();
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_tree_writes_report() {
        let chains = chains_file();
        let dir = tempdir().unwrap();
        let output = dir.path().join("tree.json");

        let args = TreeArgs {
            input: InputArgs {
                chains: chains.path().to_path_buf(),
                funcs: None,
            },
            output_json: Some(output.clone()),
            ..Default::default()
        };

        let report = execute_tree(args).unwrap();

        assert!(output.exists());
        assert_eq!(report.chains.len(), 1);
        assert_eq!(report.chains[0].roots.len(), 1);
        assert_eq!(report.chains[0].roots[0].node_count(), 4);
    }

    #[test]
    fn test_execute_tree_send_with_filter() {
        let chains = chains_file();

        let args = TreeArgs {
            input: InputArgs {
                chains: chains.path().to_path_buf(),
                funcs: None,
            },
            direction: Direction::Send,
            filter: CallFilter {
                call_type: CallTypeFilter::Return,
                ..Default::default()
            },
            print_summary: true,
            ..Default::default()
        };

        let report = execute_tree(args).unwrap();

        assert_eq!(report.stats.chain_count, 1);
        assert!(report.chains.is_empty());
    }
}
