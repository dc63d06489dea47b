use crate::aggregator::ChainSelection;
use crate::parser::Direction;
use crate::view::CallFilter;
use std::path::PathBuf;

/// Input files shared by every command
#[derive(Debug, Clone)]
pub struct InputArgs {
    /// Chain payload (`[receive, send]` JSON)
    pub chains: PathBuf,

    /// Function table JSON (optional; names fall back to addresses)
    pub funcs: Option<PathBuf>,
}

impl Default for InputArgs {
    fn default() -> Self {
        Self {
            chains: PathBuf::from("chains.json"),
            funcs: None,
        }
    }
}

/// Arguments for the tree command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone, Default)]
pub struct TreeArgs {
    pub input: InputArgs,

    /// Direction whose chains are listed
    pub direction: Direction,

    pub filter: CallFilter,

    /// Output path for the JSON tree report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the trees to stdout
    pub print_summary: bool,
}

/// Arguments for the graph command
#[derive(Debug, Clone)]
pub struct GraphArgs {
    pub input: InputArgs,

    pub selection: ChainSelection,

    /// Lower bound of the average-duration filter (microseconds)
    pub min_micros: Option<f64>,

    /// Upper bound of the average-duration filter (microseconds)
    pub max_micros: Option<f64>,

    /// Direction used for single-chain subtitles
    pub focus: Direction,

    /// Output path for the JSON graph
    pub output_json: PathBuf,

    /// Print a summary table to stdout
    pub print_summary: bool,

    /// Rows in the summary table
    pub top: usize,
}

impl Default for GraphArgs {
    fn default() -> Self {
        Self {
            input: InputArgs::default(),
            selection: ChainSelection::All,
            min_micros: None,
            max_micros: None,
            focus: Direction::Receive,
            output_json: PathBuf::from("graph.json"),
            print_summary: false,
            top: 20,
        }
    }
}

/// Arguments for the details command
#[derive(Debug, Clone, Default)]
pub struct DetailsArgs {
    pub input: InputArgs,
    pub direction: Direction,
    pub chain_index: usize,
    pub call_index: usize,
}

