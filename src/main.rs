//! Callchain Studio CLI
//!
//! Rebuilds call trees and aggregated call graphs from recorded
//! kernel function call chains.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use callchain_studio::aggregator::ChainSelection;
use callchain_studio::commands::{
    display_schema, display_version, execute_details, execute_graph, execute_stats, execute_tree,
    graph, tree, validate_output_file, DetailsArgs, GraphArgs, InputArgs, TreeArgs,
};
use callchain_studio::parser::Direction;
use callchain_studio::view::{CallFilter, CallTypeFilter};

/// Callchain Studio - call trees and call graphs from function call chains
#[derive(Parser, Debug)]
#[command(name = "callchain")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Input files shared by the data commands
#[derive(Args, Debug)]
struct InputOpts {
    /// Chain payload JSON (`[receive, send]`)
    #[arg(short, long, env = "CALLCHAIN_CHAINS")]
    chains: PathBuf,

    /// Function table JSON (address -> metadata)
    #[arg(short, long, env = "CALLCHAIN_FUNCS")]
    funcs: Option<PathBuf>,
}

impl From<InputOpts> for InputArgs {
    fn from(opts: InputOpts) -> Self {
        Self {
            chains: opts.chains,
            funcs: opts.funcs,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebuild the call trees of one direction
    Tree {
        #[command(flatten)]
        input: InputOpts,

        /// Direction to list (receive or send)
        #[arg(short, long, default_value = "receive")]
        direction: Direction,

        /// Match function names (case-insensitive) or addresses
        #[arg(long)]
        filter: Option<String>,

        /// Keep only CALL or RETURN events (all, call, return)
        #[arg(long = "type", default_value = "all")]
        call_type: CallTypeFilter,

        /// Keep only events of this thread
        #[arg(long)]
        thread: Option<u64>,

        /// Output path for the JSON tree report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the trees to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Aggregate chains into a call graph
    Graph {
        #[command(flatten)]
        input: InputOpts,

        /// Chains to aggregate: `all` or a 0-based index
        #[arg(long, default_value = "all")]
        chain: ChainSelection,

        /// Minimum average duration in microseconds (defaults to the observed minimum)
        #[arg(long)]
        min_us: Option<f64>,

        /// Maximum average duration in microseconds (defaults to the observed maximum)
        #[arg(long)]
        max_us: Option<f64>,

        /// Direction used for the thread shown in single-chain subtitles
        #[arg(short, long, default_value = "receive")]
        direction: Direction,

        /// Output path for the JSON call graph
        #[arg(short, long, default_value = "graph.json")]
        output: PathBuf,

        /// Print a summary table to stdout
        #[arg(long)]
        summary: bool,

        /// Rows in the summary table
        #[arg(long, default_value = "20")]
        top: usize,
    },

    /// Show details of a single call
    Details {
        #[command(flatten)]
        input: InputOpts,

        /// Direction of the chain
        #[arg(short, long, default_value = "receive")]
        direction: Direction,

        /// 0-based chain index
        #[arg(long)]
        chain: usize,

        /// 0-based call index within the chain
        #[arg(long)]
        call: usize,
    },

    /// Show chain, call and thread totals
    Stats {
        #[command(flatten)]
        input: InputOpts,
    },

    /// Validate a tree report or call graph JSON file
    Validate {
        /// Path to the JSON file
        #[arg(long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Tree {
            input,
            direction,
            filter,
            call_type,
            thread,
            output,
            summary,
        } => {
            let args = TreeArgs {
                input: input.into(),
                direction,
                filter: CallFilter {
                    text: filter,
                    call_type,
                    thread,
                },
                output_json: output,
                print_summary: summary,
            };

            tree::validate_args(&args)?;
            execute_tree(args)?;
        }

        Commands::Graph {
            input,
            chain,
            min_us,
            max_us,
            direction,
            output,
            summary,
            top,
        } => {
            let args = GraphArgs {
                input: input.into(),
                selection: chain,
                min_micros: min_us,
                max_micros: max_us,
                focus: direction,
                output_json: output,
                print_summary: summary,
                top,
            };

            graph::validate_args(&args)?;
            execute_graph(args)?;
        }

        Commands::Details {
            input,
            direction,
            chain,
            call,
        } => {
            execute_details(DetailsArgs {
                input: input.into(),
                direction,
                chain_index: chain,
                call_index: call,
            })?;
        }

        Commands::Stats { input } => {
            execute_stats(input.into())?;
        }

        Commands::Validate { file } => {
            validate_output_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
