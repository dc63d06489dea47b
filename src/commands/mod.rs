//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod graph;
pub mod inspect;
pub mod models;
pub mod tree;
pub mod utils;

// Re-export main command functions
pub use graph::execute_graph;
pub use inspect::{execute_details, execute_stats, DirectionSummary, PayloadSummary};
pub use models::{DetailsArgs, GraphArgs, InputArgs, TreeArgs};
pub use tree::execute_tree;
pub use utils::{display_schema, display_version, load_inputs, validate_output_file};
