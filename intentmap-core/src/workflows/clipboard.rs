use std::collections::{BTreeMap, BTreeSet};

use uuid::Uuid;

use super::store::{ConnectionStore, NodeStore};
use super::types::{Connection, NodeInstance};

/// Copied nodes and the connections among them.
///
/// Owned by the caller and passed to the editor explicitly, so two editors
/// can share one clipboard or keep their own.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    nodes: Vec<NodeInstance>,
    connections: Vec<Connection>,
    generation: u32,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.generation = 0;
    }

    pub(crate) fn capture(
        &mut self,
        nodes: &NodeStore,
        connections: &ConnectionStore,
        ids: &BTreeSet<Uuid>,
    ) {
        self.nodes = nodes
            .nodes()
            .iter()
            .filter(|node| ids.contains(&node.id))
            .cloned()
            .collect();
        self.connections = connections.within(ids).cloned().collect();
        self.generation = 0;
    }

    /// Fresh copies ready to insert into `existing`.
    ///
    /// Every paste gets new ids and keys and shifts one more `paste_offset`
    /// down and right. Entry points are never copied.
    pub(crate) fn prepare_paste(
        &mut self,
        existing: &NodeStore,
        paste_offset: f64,
    ) -> (Vec<NodeInstance>, Vec<Connection>) {
        if self.nodes.is_empty() {
            return (Vec::new(), Vec::new());
        }
        self.generation += 1;
        let shift = paste_offset * f64::from(self.generation);

        let mut remapped = BTreeMap::new();
        let mut reserved = BTreeSet::new();
        let nodes = self
            .nodes
            .iter()
            .map(|original| {
                let key = existing.unique_copy_key(&original.instance_key, &reserved);
                reserved.insert(key.clone());
                let copy = NodeInstance {
                    id: Uuid::new_v4(),
                    instance_key: key,
                    position: original.position.offset(shift, shift),
                    is_entry_point: false,
                    ..original.clone()
                };
                remapped.insert(original.id, copy.id);
                copy
            })
            .collect::<Vec<_>>();

        let connections = self
            .connections
            .iter()
            .filter_map(|original| {
                Some(Connection {
                    id: Uuid::new_v4(),
                    source_node_id: *remapped.get(&original.source_node_id)?,
                    target_node_id: *remapped.get(&original.target_node_id)?,
                    ..original.clone()
                })
            })
            .collect();

        (nodes, connections)
    }
}
