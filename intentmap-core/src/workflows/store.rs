use std::collections::BTreeSet;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::graph::ids::{edge_id, workflow_node_id};
use crate::graph::{
    EdgeKind, FlowGraph, GraphEdge, NodeKind, NodePayload, Position, WorkflowNodeData,
};

use super::clipboard::Clipboard;
use super::types::{CanvasPoint, CanvasState, Connection, NodeInstance, WorkflowMeta};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;

/// Node instances of one workflow plus the current selection.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    nodes: Vec<NodeInstance>,
    selected: BTreeSet<Uuid>,
}

impl NodeStore {
    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&NodeInstance> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn by_key(&self, instance_key: &str) -> Option<&NodeInstance> {
        self.nodes
            .iter()
            .find(|node| node.instance_key == instance_key)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn entry_point(&self) -> Option<&NodeInstance> {
        self.nodes.iter().find(|node| node.is_entry_point)
    }

    pub fn add(&mut self, mut node: NodeInstance) -> Result<Uuid> {
        node.instance_key = node.instance_key.trim().to_owned();
        let key = node.instance_key.as_str();
        if key.is_empty() {
            return Err(Error::Validation(
                "node instance_key cannot be empty".to_owned(),
            ));
        }
        if self.contains(node.id) {
            return Err(Error::Validation(format!(
                "duplicate node id '{}'",
                node.id
            )));
        }
        if self.by_key(key).is_some() {
            return Err(Error::Validation(format!(
                "duplicate node instance_key '{key}'"
            )));
        }
        if node.is_entry_point {
            if let Some(existing) = self.entry_point() {
                return Err(Error::Validation(format!(
                    "workflow already has entry point '{}'",
                    existing.instance_key
                )));
            }
        }

        let id = node.id;
        self.nodes.push(node);
        Ok(id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<NodeInstance> {
        let index = self.nodes.iter().position(|node| node.id == id)?;
        self.selected.remove(&id);
        Some(self.nodes.remove(index))
    }

    pub fn move_to(&mut self, id: Uuid, position: CanvasPoint) -> Result<()> {
        let node = self.get_mut(id)?;
        node.position = position;
        Ok(())
    }

    pub fn relabel(&mut self, id: Uuid, display_label: &str) -> Result<()> {
        let node = self.get_mut(id)?;
        node.display_label = display_label.to_owned();
        Ok(())
    }

    /// Marks `id` as the only entry point.
    pub fn set_entry_point(&mut self, id: Uuid) -> Result<()> {
        if !self.contains(id) {
            return Err(Error::NotFound(format!("workflow node '{id}'")));
        }
        for node in &mut self.nodes {
            node.is_entry_point = node.id == id;
        }
        Ok(())
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.selected.clear();
        for id in ids {
            if self.contains(id) {
                self.selected.insert(id);
            }
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.nodes.iter().map(|node| node.id).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &BTreeSet<Uuid> {
        &self.selected
    }

    /// `key_copy`, then `key_copy_2`, `key_copy_3` and so on until unused.
    pub fn unique_copy_key(&self, key: &str, reserved: &BTreeSet<String>) -> String {
        let base = copy_base(key);
        let taken =
            |candidate: &str| self.by_key(candidate).is_some() || reserved.contains(candidate);

        let first = format!("{base}_copy");
        if !taken(&first) {
            return first;
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{base}_copy_{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    fn get_mut(&mut self, id: Uuid) -> Result<&mut NodeInstance> {
        self.nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| Error::NotFound(format!("workflow node '{id}'")))
    }
}

fn copy_base(key: &str) -> &str {
    if let Some(stripped) = key.strip_suffix("_copy") {
        return stripped;
    }
    if let Some((head, tail)) = key.rsplit_once("_copy_") {
        if !tail.is_empty() && tail.chars().all(|ch| ch.is_ascii_digit()) {
            return head;
        }
    }
    key
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionStore {
    connections: Vec<Connection>,
}

impl ConnectionStore {
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    /// Adds a connection whose endpoints must exist in `nodes`.
    pub fn add(&mut self, connection: Connection, nodes: &NodeStore) -> Result<Uuid> {
        if connection.source_node_id == connection.target_node_id {
            return Err(Error::Validation(format!(
                "connection cannot loop node '{}' onto itself",
                connection.source_node_id
            )));
        }
        for endpoint in [connection.source_node_id, connection.target_node_id] {
            if !nodes.contains(endpoint) {
                return Err(Error::NotFound(format!("workflow node '{endpoint}'")));
            }
        }
        let duplicate = self.connections.iter().any(|existing| {
            existing.source_node_id == connection.source_node_id
                && existing.target_node_id == connection.target_node_id
                && existing.connection_type == connection.connection_type
        });
        if duplicate {
            return Err(Error::Validation(format!(
                "{} connection from '{}' to '{}' already exists",
                connection.connection_type.as_str(),
                connection.source_node_id,
                connection.target_node_id
            )));
        }

        let id = connection.id;
        self.connections.push(connection);
        Ok(id)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Connection> {
        let index = self
            .connections
            .iter()
            .position(|connection| connection.id == id)?;
        Some(self.connections.remove(index))
    }

    /// Drops every connection touching `node_id`, returning how many went.
    pub fn remove_touching(&mut self, node_id: Uuid) -> usize {
        let before = self.connections.len();
        self.connections
            .retain(|connection| !connection.touches(node_id));
        before - self.connections.len()
    }

    /// Connections with both endpoints inside `ids`.
    pub fn within<'a>(
        &'a self,
        ids: &'a BTreeSet<Uuid>,
    ) -> impl Iterator<Item = &'a Connection> {
        self.connections.iter().filter(move |connection| {
            ids.contains(&connection.source_node_id) && ids.contains(&connection.target_node_id)
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    state: CanvasState,
}

impl CanvasStore {
    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Sets the zoom, clamped to `[MIN_ZOOM, MAX_ZOOM]`; non-finite values are ignored.
    pub fn zoom_to(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.state.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        }
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() && dy.is_finite() {
            self.state.pan_x += dx;
            self.state.pan_y += dy;
        }
    }

    pub fn restore(&mut self, state: CanvasState) {
        self.state = CanvasState::default();
        self.pan_by(state.pan_x, state.pan_y);
        self.zoom_to(state.zoom);
    }

    pub fn reset(&mut self) {
        self.state = CanvasState::default();
    }
}

/// Read-only snapshot of the editor for renderers.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowView<'a> {
    pub meta: &'a WorkflowMeta,
    pub nodes: &'a [NodeInstance],
    pub connections: &'a [Connection],
    pub canvas: &'a CanvasState,
    pub selected: &'a BTreeSet<Uuid>,
    pub dirty: bool,
}

/// Editing state for one workflow. Mutations go through this type so the
/// node and connection stores never disagree.
#[derive(Debug, Clone, Default)]
pub struct WorkflowEditor {
    meta: WorkflowMeta,
    nodes: NodeStore,
    connections: ConnectionStore,
    canvas: CanvasStore,
    dirty: bool,
}

impl WorkflowEditor {
    pub fn new(meta: WorkflowMeta) -> Self {
        Self {
            meta,
            ..Self::default()
        }
    }

    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionStore {
        &self.connections
    }

    pub fn canvas(&self) -> &CanvasStore {
        &self.canvas
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn view(&self) -> WorkflowView<'_> {
        WorkflowView {
            meta: &self.meta,
            nodes: self.nodes.nodes(),
            connections: self.connections.connections(),
            canvas: self.canvas.state(),
            selected: self.nodes.selected(),
            dirty: self.dirty,
        }
    }

    pub fn rename(&mut self, name: &str) {
        self.meta.name = name.to_owned();
        self.dirty = true;
    }

    pub fn add_node(&mut self, node: NodeInstance) -> Result<Uuid> {
        let id = self.nodes.add(node)?;
        self.dirty = true;
        Ok(id)
    }

    /// Removes the node and every connection touching it.
    pub fn remove_node(&mut self, id: Uuid) -> Result<NodeInstance> {
        let node = self
            .nodes
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("workflow node '{id}'")))?;
        let dropped = self.connections.remove_touching(id);
        tracing::debug!(node = %node.instance_key, dropped, "removed workflow node");
        self.dirty = true;
        Ok(node)
    }

    pub fn remove_selected(&mut self) -> usize {
        let selected = self.nodes.selected().iter().copied().collect::<Vec<_>>();
        selected
            .into_iter()
            .filter(|id| self.remove_node(*id).is_ok())
            .count()
    }

    pub fn move_node(&mut self, id: Uuid, position: CanvasPoint) -> Result<()> {
        self.nodes.move_to(id, position)?;
        self.dirty = true;
        Ok(())
    }

    pub fn relabel_node(&mut self, id: Uuid, display_label: &str) -> Result<()> {
        self.nodes.relabel(id, display_label)?;
        self.dirty = true;
        Ok(())
    }

    pub fn set_entry_point(&mut self, id: Uuid) -> Result<()> {
        self.nodes.set_entry_point(id)?;
        self.dirty = true;
        Ok(())
    }

    pub fn connect(&mut self, connection: Connection) -> Result<Uuid> {
        let id = self.connections.add(connection, &self.nodes)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn disconnect(&mut self, id: Uuid) -> Result<Connection> {
        let connection = self
            .connections
            .remove(id)
            .ok_or_else(|| Error::NotFound(format!("workflow connection '{id}'")))?;
        self.dirty = true;
        Ok(connection)
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        self.nodes.select(ids);
    }

    pub fn select_all(&mut self) {
        self.nodes.select_all();
    }

    pub fn clear_selection(&mut self) {
        self.nodes.clear_selection();
    }

    pub fn zoom_to(&mut self, zoom: f64) {
        self.canvas.zoom_to(zoom);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.canvas.pan_by(dx, dy);
    }

    pub fn restore_canvas(&mut self, state: CanvasState) {
        self.canvas.restore(state);
    }

    /// Copies the current selection and the connections between selected nodes.
    pub fn copy_selection(&self, clipboard: &mut Clipboard) -> usize {
        clipboard.capture(&self.nodes, &self.connections, self.nodes.selected());
        clipboard.len()
    }

    /// Pastes the clipboard contents as fresh nodes and selects them.
    pub fn paste(&mut self, clipboard: &mut Clipboard, paste_offset: f64) -> Result<Vec<Uuid>> {
        let (nodes, connections) = clipboard.prepare_paste(&self.nodes, paste_offset);
        if nodes.is_empty() {
            return Ok(Vec::new());
        }

        let mut staged = self.nodes.clone();
        let mut staged_connections = self.connections.clone();
        let mut pasted = Vec::with_capacity(nodes.len());
        for node in nodes {
            pasted.push(staged.add(node)?);
        }
        for connection in connections {
            staged_connections.add(connection, &staged)?;
        }

        self.nodes = staged;
        self.connections = staged_connections;
        self.nodes.select(pasted.iter().copied());
        self.dirty = true;
        Ok(pasted)
    }

    /// Workflow as a graph of `node-{instance_key}` nodes at their canvas positions.
    pub fn flow_graph(&self) -> FlowGraph {
        let mut graph = FlowGraph::default();

        for node in self.nodes.nodes() {
            graph.push_node(
                workflow_node_id(&node.instance_key),
                NodeKind::WorkflowNode,
                Position::new(node.position.x, node.position.y),
                NodePayload::Workflow(WorkflowNodeData {
                    instance_key: node.instance_key.clone(),
                    node_type: node.node_type.clone(),
                    label: node.display_label.clone(),
                    is_entry_point: node.is_entry_point,
                }),
            );
        }

        for connection in self.connections.connections() {
            let (Some(source), Some(target)) = (
                self.nodes.get(connection.source_node_id),
                self.nodes.get(connection.target_node_id),
            ) else {
                continue;
            };
            let source_id = workflow_node_id(&source.instance_key);
            let target_id = workflow_node_id(&target.instance_key);
            let mut edge =
                GraphEdge::new(&source_id, &target_id, EdgeKind::WorkflowConnection, true);
            edge.id = format!(
                "{}-{}",
                edge_id(&source_id, &target_id),
                connection.connection_type.as_str()
            );
            let label = connection
                .label
                .clone()
                .unwrap_or_else(|| connection.connection_type.as_str().to_owned());
            graph.push_edge(edge.with_label(label));
        }

        graph
    }
}
