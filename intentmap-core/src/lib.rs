pub mod config;
pub mod error;
pub mod graph;
pub mod layout;
pub mod logging;
pub mod model;
pub mod routing;
pub mod session;
pub mod workflows;

#[cfg(test)]
mod test_fixtures;

pub use config::Config;
pub use error::{Error, Result};
pub use graph::FlowGraph;
pub use model::Snapshot;

use chrono::Utc;

use layout::{IntentFlowFilter, RoutingFlowFilter};
use session::TestSession;
use workflows::{Clipboard, WorkflowEditor, WorkflowExport};

/// Entry point binding a validated [`Config`] to the graph builders,
/// test sessions and workflow editors.
pub struct IntentMap {
    config: Config,
}

impl IntentMap {
    pub fn new(config: Config) -> Result<Self> {
        config::validate_config(&config)?;
        Ok(Self { config })
    }

    pub fn from_config_path(path: &std::path::Path) -> Result<Self> {
        let config = config::load(Some(path))?;
        Self::new(config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn intent_graph(&self, snapshot: &Snapshot, filter: &IntentFlowFilter) -> FlowGraph {
        let constants = self.config.layout.intent_constants();
        layout::build_intent_flow(snapshot, filter, &constants)
    }

    pub fn routing_graph(&self, snapshot: &Snapshot, filter: &RoutingFlowFilter) -> FlowGraph {
        let constants = self.config.layout.routing_constants();
        layout::build_routing_flow(snapshot, filter, &constants)
    }

    pub fn new_test_session(&self) -> TestSession {
        TestSession::new(&self.config.session)
    }

    pub fn export_workflow(&self, editor: &WorkflowEditor) -> Result<WorkflowExport> {
        workflows::export_workflow(editor, &self.config.workflow.export_version, Utc::now())
    }

    pub fn paste(
        &self,
        editor: &mut WorkflowEditor,
        clipboard: &mut Clipboard,
    ) -> Result<Vec<uuid::Uuid>> {
        editor.paste(clipboard, self.config.workflow.paste_offset)
    }
}
