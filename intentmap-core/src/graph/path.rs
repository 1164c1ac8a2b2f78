use std::collections::{BTreeMap, BTreeSet, VecDeque};

use serde::Serialize;

use super::types::{FlowGraph, GraphEdge};

/// Upper bound on hops in either direction; every visualizer has fewer columns.
pub const MAX_PATH_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightedPath {
    pub nodes: BTreeSet<String>,
    pub edges: BTreeSet<String>,
}

impl HighlightedPath {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains(id)
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Collects everything connected to `node_id` along the column chain.
///
/// Roots expand forward to their descendants, leaves expand backward to their
/// ancestors and intermediate nodes do both, each direction walked on its own.
pub fn connected_path(graph: &FlowGraph, node_id: &str) -> HighlightedPath {
    let Some(start) = graph.node(node_id) else {
        return HighlightedPath::default();
    };

    let mut path = HighlightedPath::default();
    path.nodes.insert(start.id.clone());

    let walk = start.kind.walk();
    if walk.forward() {
        let outgoing = adjacency(graph, Direction::Forward);
        walk_from(&start.id, &outgoing, Direction::Forward, &mut path);
    }
    if walk.backward() {
        let incoming = adjacency(graph, Direction::Backward);
        walk_from(&start.id, &incoming, Direction::Backward, &mut path);
    }

    path
}

fn adjacency(graph: &FlowGraph, direction: Direction) -> BTreeMap<&str, Vec<&GraphEdge>> {
    let mut map = BTreeMap::<&str, Vec<&GraphEdge>>::new();
    for edge in &graph.edges {
        let key = match direction {
            Direction::Forward => edge.source.as_str(),
            Direction::Backward => edge.target.as_str(),
        };
        map.entry(key).or_default().push(edge);
    }
    map
}

fn walk_from(
    start: &str,
    adjacency: &BTreeMap<&str, Vec<&GraphEdge>>,
    direction: Direction,
    path: &mut HighlightedPath,
) {
    let mut visited = BTreeSet::new();
    visited.insert(start.to_owned());
    let mut queue = VecDeque::new();
    queue.push_back((start.to_owned(), 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= MAX_PATH_DEPTH {
            continue;
        }
        let Some(edges) = adjacency.get(current.as_str()) else {
            continue;
        };
        for edge in edges {
            let next = match direction {
                Direction::Forward => &edge.target,
                Direction::Backward => &edge.source,
            };
            path.edges.insert(edge.id.clone());
            path.nodes.insert(next.clone());
            if visited.insert(next.clone()) {
                queue.push_back((next.clone(), depth + 1));
            }
        }
    }
}
