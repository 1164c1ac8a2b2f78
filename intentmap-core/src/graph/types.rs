use std::collections::BTreeSet;

use serde::Serialize;

use super::ids::edge_id;
use super::payload::NodePayload;
use super::style::{edge_presentation, EdgeStyle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Domain,
    Intent,
    Agent,
    KeywordGroup,
    MessageInput,
    BypassRule,
    Orchestrator,
    DomainGroup,
    Supervisor,
    End,
    WorkflowNode,
}

/// Which way path highlighting walks from a clicked node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathWalk {
    Forward,
    Backward,
    Both,
}

impl PathWalk {
    pub fn forward(self) -> bool {
        matches!(self, Self::Forward | Self::Both)
    }

    pub fn backward(self) -> bool {
        matches!(self, Self::Backward | Self::Both)
    }
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Intent => "intent",
            Self::Agent => "agent",
            Self::KeywordGroup => "keyword-group",
            Self::MessageInput => "message-input",
            Self::BypassRule => "bypass-rule",
            Self::Orchestrator => "orchestrator",
            Self::DomainGroup => "domain-group",
            Self::Supervisor => "supervisor",
            Self::End => "end",
            Self::WorkflowNode => "workflow-node",
        }
    }

    pub fn walk(self) -> PathWalk {
        match self {
            Self::Domain | Self::MessageInput => PathWalk::Forward,
            Self::KeywordGroup | Self::End => PathWalk::Backward,
            _ => PathWalk::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    DomainIntent,
    IntentAgent,
    AgentKeywords,
    InputBypass,
    InputOrchestrator,
    BypassAgent,
    OrchestratorDomain,
    DomainAgent,
    AgentSupervisor,
    GroupSupervisor,
    SupervisorEnd,
    WorkflowConnection,
}

impl EdgeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DomainIntent => "domain-intent",
            Self::IntentAgent => "intent-agent",
            Self::AgentKeywords => "agent-keywords",
            Self::InputBypass => "input-bypass",
            Self::InputOrchestrator => "input-orchestrator",
            Self::BypassAgent => "bypass-agent",
            Self::OrchestratorDomain => "orchestrator-domain",
            Self::DomainAgent => "domain-agent",
            Self::AgentSupervisor => "agent-supervisor",
            Self::GroupSupervisor => "group-supervisor",
            Self::SupervisorEnd => "supervisor-end",
            Self::WorkflowConnection => "workflow-connection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    pub data: NodePayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: EdgeKind,
    pub animated: bool,
    pub style: EdgeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, kind: EdgeKind, enabled: bool) -> Self {
        let (animated, style) = edge_presentation(enabled);
        Self {
            id: edge_id(source, target),
            source: source.to_owned(),
            target: target.to_owned(),
            kind,
            animated,
            style,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.animated
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl FlowGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn node_ids(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(|node| node.id.as_str()).collect()
    }

    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(move |node| node.kind == kind)
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.kind == kind)
    }

    /// Edges whose source or target is not a node of this graph.
    pub fn dangling_edges(&self) -> Vec<&GraphEdge> {
        let ids = self.node_ids();
        self.edges
            .iter()
            .filter(|edge| {
                !ids.contains(edge.source.as_str()) || !ids.contains(edge.target.as_str())
            })
            .collect()
    }

    /// Node and edge ids that occur more than once.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut duplicates = BTreeSet::new();
        let ids = self
            .nodes
            .iter()
            .map(|node| node.id.as_str())
            .chain(self.edges.iter().map(|edge| edge.id.as_str()));
        for id in ids {
            if !seen.insert(id) {
                duplicates.insert(id);
            }
        }
        duplicates.into_iter().collect()
    }

    pub(crate) fn push_node(
        &mut self,
        id: String,
        kind: NodeKind,
        position: Position,
        data: NodePayload,
    ) {
        self.nodes.push(GraphNode {
            id,
            kind,
            position,
            data,
        });
    }

    pub(crate) fn push_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }
}
