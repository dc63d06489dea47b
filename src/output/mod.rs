//! Output writers for reports.
//!
//! This module handles writing data to disk and to the terminal:
//! - JSON tree reports and call graphs
//! - Text renderings of call trees and graph summaries

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{
    read_graph, read_json, read_tree_report, validate_path, write_graph, write_json, write_tree_report,
};
pub use text::{render_forest, render_graph_summary, render_tree_report};
