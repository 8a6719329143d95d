//! Low-level graph storage shared by the builder and [`DiagramGraph`].
//!
//! # Architecture
//!
//! - [`EdgeIndex`]: position of an edge in declaration order
//! - [`GraphInternal`]: nodes keyed by [`Id`] in insertion order, edges in a
//!   vector, plus per-node incoming and outgoing edge indices
//!
//! The graph is directed and allows self-loops and parallel edges. Undirected
//! connectors are stored source to target like any other edge; callers that
//! ignore direction use [`GraphInternal::neighbors`].
//!
//! [`DiagramGraph`]: super::DiagramGraph

use std::collections::HashMap;

use indexmap::IndexMap;

use armillary_core::identifier::Id;

/// Position of an edge in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct EdgeIndex(usize);

impl EdgeIndex {
    pub(crate) fn get(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct EdgeEntry<E> {
    source: Id,
    target: Id,
    value: E,
}

/// Core graph data structure.
///
/// `N` is the node payload, `E` the edge payload. Node iteration follows
/// insertion order.
#[derive(Debug)]
pub(crate) struct GraphInternal<N, E> {
    nodes: IndexMap<Id, N>,
    edges: Vec<EdgeEntry<E>>,
    incoming: HashMap<Id, Vec<EdgeIndex>>,
    outgoing: HashMap<Id, Vec<EdgeIndex>>,
}

impl<N, E> GraphInternal<N, E> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            incoming: HashMap::new(),
            outgoing: HashMap::new(),
        }
    }

    pub(crate) fn node(&self, id: Id) -> Option<&N> {
        self.nodes.get(&id)
    }

    /// Returns node payloads in insertion order.
    pub(crate) fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    pub(crate) fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns `(source, target, payload)` for every edge in insertion order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (Id, Id, &E)> {
        self.edges
            .iter()
            .map(|edge| (edge.source, edge.target, &edge.value))
    }

    pub(crate) fn edges_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns nodes without incoming edges, in insertion order.
    pub(crate) fn roots(&self) -> impl Iterator<Item = &N> {
        self.nodes
            .iter()
            .filter(|(id, _)| !self.incoming.contains_key(*id))
            .map(|(_, node)| node)
    }

    /// Returns the targets of edges leaving `source`, one entry per edge.
    pub(crate) fn outgoing_nodes(&self, source: Id) -> impl Iterator<Item = &N> {
        self.outgoing
            .get(&source)
            .into_iter()
            .flatten()
            .filter_map(|idx| self.nodes.get(&self.edges[idx.0].target))
    }

    /// Returns the sources of edges entering `target`, one entry per edge.
    pub(crate) fn incoming_nodes(&self, target: Id) -> impl Iterator<Item = &N> {
        self.incoming
            .get(&target)
            .into_iter()
            .flatten()
            .filter_map(|idx| self.nodes.get(&self.edges[idx.0].source))
    }

    /// Returns every node connected to `id`, ignoring direction.
    pub(crate) fn neighbors(&self, id: Id) -> impl Iterator<Item = &N> {
        self.outgoing_nodes(id).chain(self.incoming_nodes(id))
    }

    /// Adds a node. Returns the node it replaced, if any.
    pub(crate) fn add_node(&mut self, id: Id, node: N) -> Option<N> {
        self.nodes.insert(id, node)
    }

    /// Adds an edge between two existing nodes.
    ///
    /// Returns `None` and leaves the graph untouched if either endpoint is
    /// missing.
    pub(crate) fn add_edge(&mut self, source: Id, target: Id, value: E) -> Option<EdgeIndex> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }

        let idx = EdgeIndex(self.edges.len());
        self.edges.push(EdgeEntry {
            source,
            target,
            value,
        });
        self.outgoing.entry(source).or_default().push(idx);
        self.incoming.entry(target).or_default().push(idx);
        Some(idx)
    }

    /// Drops every node and edge added after the graph held `nodes` nodes and
    /// `edges` edges.
    pub(crate) fn truncate(&mut self, nodes: usize, edges: usize) {
        while self.edges.len() > edges {
            let Some(edge) = self.edges.pop() else { break };
            detach(&mut self.outgoing, edge.source);
            detach(&mut self.incoming, edge.target);
        }
        for id in self.nodes.keys().skip(nodes) {
            self.outgoing.remove(id);
            self.incoming.remove(id);
        }
        self.nodes.truncate(nodes);
    }

    /// Consumes the graph, returning node payloads and edges in insertion order.
    pub(crate) fn into_parts(self) -> (Vec<N>, Vec<(Id, Id, E)>) {
        let nodes = self.nodes.into_values().collect();
        let edges = self
            .edges
            .into_iter()
            .map(|edge| (edge.source, edge.target, edge.value))
            .collect();
        (nodes, edges)
    }
}

/// Removes the newest edge index recorded for `id`.
fn detach(adjacency: &mut HashMap<Id, Vec<EdgeIndex>>, id: Id) {
    if let Some(indices) = adjacency.get_mut(&id) {
        indices.pop();
        if indices.is_empty() {
            adjacency.remove(&id);
        }
    }
}
