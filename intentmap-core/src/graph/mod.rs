pub mod ids;
pub mod path;
pub mod payload;
pub mod render;
pub mod style;
pub mod types;

pub use path::{connected_path, HighlightedPath, MAX_PATH_DEPTH};
pub use payload::{
    AgentNodeData, BypassRuleNodeData, DomainGroupNodeData, DomainNodeData, IntentNodeData,
    KeywordGroupNodeData, LabelNodeData, NodePayload, WorkflowNodeData,
};
pub use render::{render_dot, render_text};
pub use style::{edge_presentation, EdgeStyle};
pub use types::{EdgeKind, FlowGraph, GraphEdge, GraphNode, NodeKind, PathWalk, Position};
