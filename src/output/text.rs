//! Plain-text renderings for the terminal.

use crate::aggregator::{CallGraph, CallTreeNode};
use crate::parser::{Direction, FunctionTable};
use crate::utils::time::format_timestamp;
use crate::view::TreeReport;

/// Render a call forest as an indented tree
///
/// ```text
/// ▶ CALL   ip_rcv  0:00:01.000  #100
/// ├── ▶ CALL   ip_local_deliver  0:00:01.001  #101
/// │   └── ◀ RETURN ip_local_deliver  0:00:01.002  #101
/// └── ◀ RETURN ip_rcv  0:00:01.003  #100
/// ```
pub fn render_forest(forest: &[CallTreeNode], table: &FunctionTable) -> String {
    let mut lines = Vec::new();
    for node in forest {
        lines.push(describe_node(node, table));
        render_children(&node.children, table, "", &mut lines);
    }
    lines.join("\n")
}

fn render_children(children: &[CallTreeNode], table: &FunctionTable, prefix: &str, lines: &mut Vec<String>) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let (branch, extension) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };

        lines.push(format!("{}{}{}", prefix, branch, describe_node(child, table)));
        render_children(&child.children, table, &format!("{}{}", prefix, extension), lines);
    }
}

fn describe_node(node: &CallTreeNode, table: &FunctionTable) -> String {
    let marker = if node.event.is_return { "◀" } else { "▶" };
    format!(
        "{} {:<6} {}  {}  #{}",
        marker,
        node.event.call_type(),
        table.display_name(node.event.function_address),
        format_timestamp(node.event.timestamp),
        node.event.function_address
    )
}

/// Render every chain of a tree report, each under its own header
pub fn render_tree_report(report: &TreeReport, table: &FunctionTable) -> String {
    let mut sections = vec![format!(
        "{} chains: {} | calls: {}{}",
        report.direction.label(),
        report.stats.chain_count,
        report.stats.call_count,
        if report.filter.is_active() { " | filtered" } else { "" }
    )];

    for chain in &report.chains {
        let thread = chain
            .thread_id
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());

        sections.push(format!(
            "\nChain {} (thread {}) - {}/{} calls\n{}",
            chain.chain_index + 1,
            thread,
            chain.call_count,
            chain.original_length,
            render_forest(&chain.roots, table)
        ));
    }

    sections.join("\n")
}

/// Render the busiest graph nodes as a table
pub fn render_graph_summary(graph: &CallGraph, max_lines: usize) -> String {
    let mut lines = Vec::new();

    lines.push(format!("  {}", graph.title));
    lines.push(format!("  {}", graph.subtitle));
    lines.push("  ┏━━━━━━━━━━━━━━━━━━━━━━━━━┳━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━━━━┳━━━━━━━━━━━━┓".to_string());
    lines.push(format!(
        "  ┃ {:<23} ┃ {:^7} ┃ {:^10} ┃ {:^10} ┃ {:^10} ┃",
        "Function", "CALLS", "AVG μs", "MIN μs", "MAX μs"
    ));
    lines.push("  ┣━━━━━━━━━━━━━━━━━━━━━━━━━╋━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━━━━╋━━━━━━━━━━━━┫".to_string());

    let mut nodes: Vec<_> = graph.nodes.iter().collect();
    nodes.sort_by(|a, b| b.call_count.cmp(&a.call_count).then_with(|| a.id.cmp(&b.id)));

    for node in nodes.iter().take(max_lines) {
        let fmt_opt = |v: Option<f64>| v.map(|d| format!("{:.1}", d)).unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "  ┃ {:<23} ┃ {:>7} ┃ {:>10.1} ┃ {:>10} ┃ {:>10} ┃",
            format!("{} {}", direction_tag(node.category), node.display_name),
            node.call_count,
            node.avg_duration,
            fmt_opt(node.min_duration),
            fmt_opt(node.max_duration)
        ));
    }

    lines.push("  ┗━━━━━━━━━━━━━━━━━━━━━━━━━┻━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━━━━┻━━━━━━━━━━━━┛".to_string());

    let mut edges: Vec<_> = graph.edges.iter().collect();
    edges.sort_by(|a, b| b.weight.cmp(&a.weight));

    if !edges.is_empty() {
        lines.push(String::new());
        lines.push("  Top call edges:".to_string());
        for edge in edges.iter().take(max_lines) {
            lines.push(format!("    {} → {}  ×{}", edge.source, edge.target, edge.weight));
        }
    }

    lines.join("\n")
}

fn direction_tag(direction: Direction) -> &'static str {
    match direction {
        Direction::Receive => "RX",
        Direction::Send => "TX",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::{build_call_graph, build_call_tree, GraphOptions};
    use crate::parser::{CallEvent, ChainData};

    #[test]
    fn test_render_forest() {
        let events = vec![
            CallEvent::call(1.0, 100, 1),
            CallEvent::call(1.001, 101, 1),
            CallEvent::ret(1.002, 101, 1),
            CallEvent::ret(1.003, 100, 1),
        ];
        let forest = build_call_tree(0, &events);

        let text = render_forest(&forest, &FunctionTable::new());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("▶ CALL   Unknown_100"));
        assert!(lines[1].starts_with("├── ▶ CALL   Unknown_101"));
        assert!(lines[2].starts_with("│   └── ◀ RETURN Unknown_101"));
        assert!(lines[3].starts_with("└── ◀ RETURN Unknown_100"));
    }

    #[test]
    fn test_render_graph_summary() {
        let chain = vec![
            CallEvent::call(0.0, 1, 1),
            CallEvent::call(0.001, 2, 1),
            CallEvent::ret(0.002, 2, 1),
            CallEvent::ret(0.003, 1, 1),
        ];
        let data = ChainData::new(vec![chain], Vec::new());
        let graph = build_call_graph(&data, &FunctionTable::new(), &GraphOptions::default());

        let text = render_graph_summary(&graph, 10);

        assert!(text.contains("Aggregated Function Call Graph"));
        assert!(text.contains("RX 0x1"));
        assert!(text.contains("receive_1 → receive_2  ×1"));
    }
}
