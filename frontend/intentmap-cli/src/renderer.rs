use intentmap_core::graph::{render_dot, render_text, FlowGraph, HighlightedPath};
use intentmap_core::routing::BypassMatch;
use intentmap_core::{Error, Result};
use serde::Serialize;

use crate::cli::OutputFormat;

pub struct Renderer {
    output_format: OutputFormat,
}

impl Renderer {
    pub fn new(output_format: OutputFormat) -> Self {
        Self { output_format }
    }

    pub fn graph(&self, graph: &FlowGraph) -> Result<String> {
        match self.output_format {
            OutputFormat::Text => Ok(render_text(graph)),
            OutputFormat::Json => to_json(graph),
            OutputFormat::Dot => Ok(render_dot(graph, None)),
        }
    }

    pub fn path(&self, graph: &FlowGraph, path: &HighlightedPath) -> Result<String> {
        match self.output_format {
            OutputFormat::Text => {
                let mut lines = vec![format!(
                    "{} nodes, {} edges highlighted",
                    path.nodes.len(),
                    path.edges.len()
                )];
                lines.extend(path.nodes.iter().map(|id| format!("  node {id}")));
                lines.extend(path.edges.iter().map(|id| format!("  edge {id}")));
                Ok(lines.join("\n"))
            }
            OutputFormat::Json => to_json(path),
            OutputFormat::Dot => Ok(render_dot(graph, Some(path))),
        }
    }

    pub fn bypass(&self, matched: Option<&BypassMatch<'_>>) -> Result<String> {
        match self.output_format {
            OutputFormat::Json => to_json(&matched),
            OutputFormat::Text | OutputFormat::Dot => Ok(match matched {
                Some(found) => format!(
                    "bypass rule '{}' ({}, priority {}) -> {}",
                    found.rule.id,
                    found.rule.rule_type.as_str(),
                    found.rule.priority,
                    found.target_agent
                ),
                None => "no bypass rule matched; message goes to the orchestrator".to_owned(),
            }),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| Error::Validation(format!("failed serializing output: {err}")))
}

#[cfg(test)]
mod tests {
    use intentmap_core::graph::{FlowGraph, HighlightedPath};

    use super::Renderer;
    use crate::cli::OutputFormat;

    #[test]
    fn text_path_lists_ids() {
        let mut path = HighlightedPath::default();
        path.nodes.insert("domain-pharmacy".to_owned());
        path.nodes.insert("intent-pharmacy:invoice".to_owned());
        path.edges
            .insert("e-domain-pharmacy-intent-pharmacy:invoice".to_owned());

        let rendered = Renderer::new(OutputFormat::Text)
            .path(&FlowGraph::default(), &path)
            .expect("render");
        assert!(rendered.starts_with("2 nodes, 1 edges highlighted"));
        assert!(rendered.contains("  node intent-pharmacy:invoice"));
    }

    #[test]
    fn json_bypass_without_match_is_null() {
        let rendered = Renderer::new(OutputFormat::Json)
            .bypass(None)
            .expect("render");
        assert_eq!(rendered, "null");
    }
}
