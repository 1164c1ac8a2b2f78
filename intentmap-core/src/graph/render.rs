use super::path::HighlightedPath;
use super::types::FlowGraph;

pub fn render_dot(graph: &FlowGraph, highlight: Option<&HighlightedPath>) -> String {
    let mut lines = Vec::new();
    lines.push("digraph intentmap {".to_owned());
    lines.push("  rankdir=LR;".to_owned());
    lines.push("  node [shape=box, style=rounded];".to_owned());

    for node in &graph.nodes {
        let mut attrs = vec![
            format!("label=\"{}\"", escape(node.data.label())),
            format!("pos=\"{},{}!\"", node.position.x, -node.position.y),
        ];
        if highlight.is_some_and(|path| path.nodes.contains(&node.id)) {
            attrs.push("penwidth=3".to_owned());
        }
        lines.push(format!("  \"{}\" [{}];", escape(&node.id), attrs.join(", ")));
    }

    for edge in &graph.edges {
        let mut attrs = vec![format!("color=\"{}\"", edge.style.stroke)];
        if edge.style.stroke_dasharray.is_some() {
            attrs.push("style=dashed".to_owned());
        }
        if let Some(label) = &edge.label {
            attrs.push(format!("label=\"{}\"", escape(label)));
        }
        if highlight.is_some_and(|path| path.edges.contains(&edge.id)) {
            attrs.push("penwidth=3".to_owned());
        }
        lines.push(format!(
            "  \"{}\" -> \"{}\" [{}];",
            escape(&edge.source),
            escape(&edge.target),
            attrs.join(", ")
        ));
    }

    lines.push("}".to_owned());
    lines.join("\n")
}

/// One line per node, then one per edge.
pub fn render_text(graph: &FlowGraph) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "{} nodes, {} edges",
        graph.nodes.len(),
        graph.edges.len()
    ));
    for node in &graph.nodes {
        lines.push(format!(
            "  [{}] {} \"{}\" @ ({}, {})",
            node.kind.as_str(),
            node.id,
            node.data.label(),
            node.position.x,
            node.position.y
        ));
    }
    for edge in &graph.edges {
        let state = if edge.is_enabled() { "" } else { " (disabled)" };
        lines.push(format!(
            "  {} -> {} [{}]{state}",
            edge.source,
            edge.target,
            edge.kind.as_str()
        ));
    }
    lines.join("\n")
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
