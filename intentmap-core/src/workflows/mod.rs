pub mod clipboard;
pub mod store;
pub mod transfer;
pub mod types;

pub use clipboard::Clipboard;
pub use store::{
    CanvasStore, ConnectionStore, NodeStore, WorkflowEditor, WorkflowView, MAX_ZOOM, MIN_ZOOM,
};
pub use transfer::{
    export_to_json, export_workflow, import_workflow, ExportedEdge, ExportedNode,
    ExportedWorkflow, WorkflowExport,
};
pub use types::{CanvasPoint, CanvasState, Connection, ConnectionType, NodeInstance, WorkflowMeta};
