//! Graph view over a closed [`Diagram`].
//!
//! [`DiagramGraph`] indexes a diagram's nodes and edges so that connectivity
//! questions (who feeds this node, which nodes have no inbound traffic) can be
//! answered without scanning the edge list.

pub(crate) mod graph_base;

use armillary_core::{
    identifier::Id,
    model::{Diagram, Edge, Node},
};

use graph_base::GraphInternal;

/// Connectivity index built from a [`Diagram`].
#[derive(Debug)]
pub struct DiagramGraph<'a> {
    graph: GraphInternal<&'a Node, &'a Edge>,
}

impl<'a> DiagramGraph<'a> {
    /// Indexes every node and edge of `diagram`.
    ///
    /// Edges whose endpoints are not nodes of the diagram are skipped; a
    /// diagram produced by the builder never contains any.
    pub fn from_diagram(diagram: &'a Diagram) -> Self {
        let mut graph = GraphInternal::new();
        for node in diagram.nodes() {
            graph.add_node(node.id(), node);
        }
        for edge in diagram.edges() {
            graph.add_edge(edge.source(), edge.target(), edge);
        }
        Self { graph }
    }

    pub fn node(&self, id: Id) -> Option<&'a Node> {
        self.graph.node(id).copied()
    }

    /// Nodes in declaration order.
    pub fn nodes(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.graph.nodes().copied()
    }

    /// Edges in declaration order.
    pub fn edges(&self) -> impl Iterator<Item = &'a Edge> + '_ {
        self.graph.edges().map(|(_, _, edge)| *edge)
    }

    /// Nodes without incoming edges: the entry points of the diagram.
    pub fn roots(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.graph.roots().copied()
    }

    /// Targets of edges leaving `id`, one per edge.
    pub fn outgoing(&self, id: Id) -> impl Iterator<Item = &'a Node> + '_ {
        self.graph.outgoing_nodes(id).copied()
    }

    /// Sources of edges entering `id`, one per edge.
    pub fn incoming(&self, id: Id) -> impl Iterator<Item = &'a Node> + '_ {
        self.graph.incoming_nodes(id).copied()
    }

    /// Nodes sharing an edge with `id` in either direction, one per edge.
    pub fn neighbors(&self, id: Id) -> impl Iterator<Item = &'a Node> + '_ {
        self.graph.neighbors(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edges_count()
    }
}

#[cfg(test)]
mod tests {
    use armillary_core::{category::NodeCategory, model::DiagramAttributes, style::EdgeStyle};

    use super::*;

    fn pipeline() -> Diagram {
        let nodes = ["clients", "vip", "haproxy", "otel"]
            .into_iter()
            .map(|key| Node::new(Id::new(key), key, NodeCategory::Generic, None))
            .collect();
        let edges = vec![
            Edge::new(Id::new("clients"), Id::new("vip"), EdgeStyle::new()),
            Edge::new(Id::new("vip"), Id::new("haproxy"), EdgeStyle::new()),
            Edge::new(Id::new("haproxy"), Id::new("otel"), EdgeStyle::new()),
            Edge::new(Id::new("haproxy"), Id::new("otel"), EdgeStyle::new()),
        ];
        Diagram::new(DiagramAttributes::new("Pipeline"), nodes, vec![], edges)
    }

    fn labels<'a>(nodes: impl Iterator<Item = &'a Node>) -> Vec<&'a str> {
        nodes.map(Node::label).collect()
    }

    #[test]
    fn test_counts() {
        let diagram = pipeline();
        let graph = DiagramGraph::from_diagram(&diagram);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edges().count(), 4);
    }

    #[test]
    fn test_roots_are_entry_points() {
        let diagram = pipeline();
        let graph = DiagramGraph::from_diagram(&diagram);
        assert_eq!(labels(graph.roots()), vec!["clients"]);
    }

    #[test]
    fn test_outgoing_and_incoming() {
        let diagram = pipeline();
        let graph = DiagramGraph::from_diagram(&diagram);

        assert_eq!(
            labels(graph.outgoing(Id::new("haproxy"))),
            vec!["otel", "otel"]
        );
        assert_eq!(labels(graph.incoming(Id::new("haproxy"))), vec!["vip"]);
        assert_eq!(
            labels(graph.neighbors(Id::new("vip"))),
            vec!["haproxy", "clients"]
        );
    }

    #[test]
    fn test_node_lookup_and_order() {
        let diagram = pipeline();
        let graph = DiagramGraph::from_diagram(&diagram);

        assert_eq!(graph.node(Id::new("otel")).map(Node::label), Some("otel"));
        assert!(graph.node(Id::new("grafana")).is_none());
        assert_eq!(
            labels(graph.nodes()),
            vec!["clients", "vip", "haproxy", "otel"]
        );
    }
}
