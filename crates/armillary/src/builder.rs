//! Stack-based construction of a [`Diagram`].
//!
//! Clusters are scoped lexically: [`DiagramBuilder::open_cluster`] pushes a
//! cluster, [`DiagramBuilder::close_cluster`] pops it, and every node declared
//! in between belongs to the innermost open cluster. Edges may connect any
//! two nodes that already exist, regardless of the clusters they live in.

use std::path::PathBuf;

use log::{debug, info, trace};

use armillary_core::{
    category::NodeCategory,
    identifier::Id,
    model::{Cluster, ClusterIndex, Diagram, DiagramAttributes, Edge, Node},
    style::{EdgeDirection, EdgeStyle},
};

use crate::{
    error::{ArmillaryError, BuildError},
    export::Renderer,
    structure::graph_base::GraphInternal,
};

/// A cluster that is still collecting members.
#[derive(Debug)]
struct PendingCluster {
    label: String,
    parent: Option<ClusterIndex>,
    nodes: Vec<Id>,
    children: Vec<ClusterIndex>,
}

/// Builder state captured before a scoped cluster runs.
#[derive(Debug)]
struct Checkpoint {
    open: Vec<ClusterIndex>,
    clusters: usize,
    nodes: usize,
    edges: usize,
}

/// Builder for a single diagram.
///
/// The builder is the open diagram context: creating it opens the diagram,
/// declarations populate it, and [`finish`](Self::finish) or
/// [`close`](Self::close) consume it. Every declaration is validated before
/// any state changes, so a rejected call leaves the builder untouched.
///
/// # Examples
///
/// ```
/// use armillary::{
///     DiagramBuilder, category::NodeCategory, model::DiagramAttributes, style::EdgeStyle,
/// };
///
/// let mut builder = DiagramBuilder::new(DiagramAttributes::new("Ingest"));
/// let clients = builder.add_node("clients", NodeCategory::MobileClient, "Clients")?;
/// let lb = builder.cluster("Edge", |b| {
///     b.add_node("haproxy", NodeCategory::LoadBalancer, "HAProxy\n:4318")
/// })?;
/// builder.connect(clients, lb, EdgeStyle::new().with_label("OTLP/HTTP"))?;
///
/// let diagram = builder.finish()?;
/// assert_eq!(diagram.nodes().len(), 2);
/// assert_eq!(diagram.cluster_path(lb), vec!["Edge"]);
/// # Ok::<(), armillary::BuildError>(())
/// ```
#[derive(Debug)]
pub struct DiagramBuilder {
    attributes: DiagramAttributes,
    graph: GraphInternal<Node, EdgeStyle>,
    clusters: Vec<PendingCluster>,
    open: Vec<ClusterIndex>,
}

impl DiagramBuilder {
    /// Opens a new diagram with the given rendering attributes.
    pub fn new(attributes: DiagramAttributes) -> Self {
        info!(title = attributes.title(); "Opening diagram");
        Self {
            attributes,
            graph: GraphInternal::new(),
            clusters: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn attributes(&self) -> &DiagramAttributes {
        &self.attributes
    }

    /// Number of nodes declared so far.
    pub fn node_count(&self) -> usize {
        self.graph.nodes_count()
    }

    /// Number of edges declared so far.
    pub fn edge_count(&self) -> usize {
        self.graph.edges_count()
    }

    /// Number of clusters currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Returns `true` if a node with this key has been declared.
    pub fn contains(&self, id: Id) -> bool {
        self.graph.contains_node(id)
    }

    /// Declares a node inside the innermost open cluster.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateNode`] if `key` was already declared.
    pub fn add_node(
        &mut self,
        key: &str,
        category: NodeCategory,
        label: impl Into<String>,
    ) -> Result<Id, BuildError> {
        let id = Id::new(key);
        if self.graph.contains_node(id) {
            return Err(BuildError::DuplicateNode { id });
        }

        let cluster = self.open.last().copied();
        let node = Node::new(id, label, category, cluster);
        debug!(node = key, category = category.name(), depth = self.open.len(); "Declared node");

        if let Some(index) = cluster {
            self.clusters[index.get()].nodes.push(id);
        }
        self.graph.add_node(id, node);
        Ok(id)
    }

    /// Declares a node whose category is given by name.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsupportedCategory`] if `category` is not a
    /// known category name, or [`BuildError::DuplicateNode`] if `key` was
    /// already declared.
    pub fn add_node_by_name(
        &mut self,
        key: &str,
        category: &str,
        label: impl Into<String>,
    ) -> Result<Id, BuildError> {
        let category = category.parse::<NodeCategory>()?;
        self.add_node(key, category, label)
    }

    /// Opens a cluster inside the innermost open cluster and makes it the
    /// innermost one.
    pub fn open_cluster(&mut self, label: impl Into<String>) -> ClusterIndex {
        let index = ClusterIndex::new(self.clusters.len());
        let parent = self.open.last().copied();
        if let Some(parent) = parent {
            self.clusters[parent.get()].children.push(index);
        }

        let label = label.into();
        debug!(cluster = label.as_str(), index = index.get(); "Opened cluster");
        self.clusters.push(PendingCluster {
            label,
            parent,
            nodes: Vec::new(),
            children: Vec::new(),
        });
        self.open.push(index);
        index
    }

    /// Closes the innermost open cluster.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::NoOpenCluster`] if no cluster is open.
    pub fn close_cluster(&mut self) -> Result<ClusterIndex, BuildError> {
        let index = self.open.pop().ok_or(BuildError::NoOpenCluster)?;
        trace!(index = index.get(); "Closed cluster");
        Ok(index)
    }

    /// Runs `build` inside a new cluster and closes it afterwards.
    ///
    /// The closure's value is passed through, which makes it convenient to
    /// return the handles declared inside the cluster.
    ///
    /// # Errors
    ///
    /// Propagates any error from `build`. Returns
    /// [`BuildError::UnbalancedCluster`] if `build` leaves a different cluster
    /// innermost than the one opened for it. On either error everything
    /// declared by the call is discarded, including the cluster itself.
    pub fn cluster<T, E>(
        &mut self,
        label: impl Into<String>,
        build: impl FnOnce(&mut Self) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<BuildError>,
    {
        let checkpoint = self.checkpoint();
        let index = self.open_cluster(label);
        let value = match build(self) {
            Ok(value) => value,
            Err(err) => {
                self.rollback(checkpoint);
                return Err(err);
            }
        };
        if self.open.last() != Some(&index) {
            let label = self.clusters[index.get()].label.clone();
            self.rollback(checkpoint);
            return Err(BuildError::UnbalancedCluster { label }.into());
        }
        self.open.pop();
        trace!(index = index.get(); "Closed cluster");
        Ok(value)
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            open: self.open.clone(),
            clusters: self.clusters.len(),
            nodes: self.graph.nodes_count(),
            edges: self.graph.edges_count(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        debug!(
            clusters = self.clusters.len() - checkpoint.clusters,
            nodes = self.graph.nodes_count() - checkpoint.nodes,
            edges = self.graph.edges_count() - checkpoint.edges;
            "Discarding failed cluster"
        );
        self.graph.truncate(checkpoint.nodes, checkpoint.edges);
        self.clusters.truncate(checkpoint.clusters);
        for cluster in &mut self.clusters {
            cluster.children.retain(|child| child.get() < checkpoint.clusters);
            cluster.nodes.retain(|id| self.graph.contains_node(*id));
        }
        self.open = checkpoint.open;
    }

    /// Declares an edge from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownNode`] naming the first endpoint that has
    /// not been declared.
    pub fn connect(&mut self, source: Id, target: Id, style: EdgeStyle) -> Result<(), BuildError> {
        for id in [source, target] {
            if !self.graph.contains_node(id) {
                return Err(BuildError::UnknownNode { id });
            }
        }

        let label = style.label().unwrap_or_default().replace('\n', " ");
        let idx = self
            .graph
            .add_edge(source, target, style)
            .ok_or(BuildError::UnknownNode { id: source })?;
        debug!(
            edge = idx.get(),
            source:% = source,
            target:% = target,
            label = label.as_str();
            "Declared edge"
        );
        Ok(())
    }

    /// Declares an undirected connector between `a` and `b`.
    ///
    /// Any direction set on `style` is replaced by [`EdgeDirection::Plain`].
    pub fn link(&mut self, a: Id, b: Id, style: EdgeStyle) -> Result<(), BuildError> {
        self.connect(a, b, style.with_direction(EdgeDirection::Plain))
    }

    /// Closes the diagram and returns the finished model.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnclosedClusters`] if any cluster is still open.
    pub fn finish(self) -> Result<Diagram, BuildError> {
        if !self.open.is_empty() {
            let open = self
                .open
                .iter()
                .map(|index| self.clusters[index.get()].label.clone())
                .collect();
            return Err(BuildError::UnclosedClusters { open });
        }

        let clusters = self
            .clusters
            .into_iter()
            .enumerate()
            .map(|(index, pending)| {
                Cluster::new(
                    ClusterIndex::new(index),
                    pending.label,
                    pending.parent,
                    pending.nodes,
                    pending.children,
                )
            })
            .collect::<Vec<_>>();

        let (nodes, edges) = self.graph.into_parts();
        let edges = edges
            .into_iter()
            .map(|(source, target, style)| Edge::new(source, target, style))
            .collect::<Vec<_>>();

        info!(
            title = self.attributes.title(),
            nodes = nodes.len(),
            clusters = clusters.len(),
            edges = edges.len();
            "Diagram closed"
        );
        Ok(Diagram::new(self.attributes, nodes, clusters, edges))
    }

    /// Closes the diagram and hands it to `renderer`.
    ///
    /// Returns the path of the written artifact. The renderer is not invoked
    /// if the diagram cannot be closed.
    pub fn close<R>(self, renderer: &R) -> Result<PathBuf, ArmillaryError>
    where
        R: Renderer + ?Sized,
    {
        let diagram = self.finish()?;
        let path = renderer.render(&diagram)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use armillary_core::style::LineStyle;

    use super::*;
    use crate::error::BuildErrorKind;

    fn builder() -> DiagramBuilder {
        DiagramBuilder::new(DiagramAttributes::new("Test"))
    }

    #[test]
    fn test_nodes_and_edges_in_declaration_order() {
        let mut b = builder();
        let a = b.add_node("a", NodeCategory::MobileClient, "A").unwrap();
        let lb = b.add_node("b", NodeCategory::LoadBalancer, "B").unwrap();
        let c = b.add_node("c", NodeCategory::Storage, "C").unwrap();
        b.connect(a, lb, EdgeStyle::new().with_label("request")).unwrap();
        b.connect(lb, c, EdgeStyle::new().with_label("forward")).unwrap();

        let diagram = b.finish().unwrap();

        let ids: Vec<_> = diagram.nodes().iter().map(Node::id).collect();
        assert_eq!(ids, vec![a, lb, c]);
        assert!(diagram.clusters().is_empty());

        let edges: Vec<_> = diagram
            .edges()
            .iter()
            .map(|edge| (edge.source(), edge.target(), edge.style().label()))
            .collect();
        assert_eq!(
            edges,
            vec![(a, lb, Some("request")), (lb, c, Some("forward"))]
        );
    }

    #[test]
    fn test_unknown_endpoint_is_rejected_without_change() {
        let mut b = builder();
        let a = b.add_node("a", NodeCategory::Generic, "A").unwrap();

        let err = b
            .connect(a, Id::new("never-declared"), EdgeStyle::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownNode { id } if id == "never-declared"));
        assert_eq!(err.kind(), BuildErrorKind::Reference);
        assert_eq!(b.edge_count(), 0);

        let err = b
            .connect(Id::new("also-missing"), a, EdgeStyle::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownNode { id } if id == "also-missing"));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn test_forward_reference_is_rejected() {
        let mut b = builder();
        let a = b.add_node("a", NodeCategory::Generic, "A").unwrap();
        let later = Id::new("later");

        assert!(b.connect(a, later, EdgeStyle::new()).is_err());

        b.add_node("later", NodeCategory::Generic, "Later").unwrap();
        assert!(b.connect(a, later, EdgeStyle::new()).is_ok());
    }

    #[test]
    fn test_duplicate_node_is_rejected_without_change() {
        let mut b = builder();
        b.add_node("minio", NodeCategory::Storage, "MinIO").unwrap();

        b.open_cluster("Elsewhere");
        let err = b
            .add_node("minio", NodeCategory::Generic, "Other")
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateNode { .. }));
        b.close_cluster().unwrap();

        let diagram = b.finish().unwrap();
        assert_eq!(diagram.nodes().len(), 1);
        assert_eq!(diagram.nodes()[0].label(), "MinIO");
        assert!(diagram.clusters()[0].nodes().is_empty());
    }

    #[test]
    fn test_cluster_membership_follows_nesting() {
        let mut b = builder();
        let e = b.add_node("e", NodeCategory::Generic, "E").unwrap();
        b.open_cluster("X");
        let d = b.add_node("d", NodeCategory::Generic, "D").unwrap();
        b.close_cluster().unwrap();
        b.connect(e, d, EdgeStyle::new()).unwrap();

        let diagram = b.finish().unwrap();
        assert_eq!(diagram.cluster_path(d), vec!["X"]);
        assert!(diagram.cluster_path(e).is_empty());
        assert_eq!(diagram.clusters()[0].nodes(), &[d]);
        assert_eq!(diagram.edges().len(), 1);
    }

    #[test]
    fn test_nested_clusters_form_tree() {
        let mut b = builder();
        let outer = b.open_cluster("Node 1");
        let lb = b.open_cluster("Load Balancing");
        b.add_node("keepalived", NodeCategory::Blank, "Keepalived").unwrap();
        b.close_cluster().unwrap();
        let metrics = b.open_cluster("Metrics Stack");
        b.close_cluster().unwrap();
        b.close_cluster().unwrap();
        let other = b.open_cluster("Node 2");
        b.close_cluster().unwrap();

        let diagram = b.finish().unwrap();
        let clusters = diagram.clusters();
        assert_eq!(clusters.len(), 4);
        assert_eq!(clusters[outer.get()].children(), &[lb, metrics]);
        assert_eq!(clusters[lb.get()].parent(), Some(outer));
        assert_eq!(clusters[other.get()].parent(), None);
        assert_eq!(
            diagram.cluster_path(Id::new("keepalived")),
            vec!["Node 1", "Load Balancing"]
        );

        let roots: Vec<_> = diagram.root_clusters().map(Cluster::index).collect();
        assert_eq!(roots, vec![outer, other]);
    }

    #[test]
    fn test_finish_with_open_cluster_fails() {
        let mut b = builder();
        b.open_cluster("Y");
        b.add_node("n", NodeCategory::Generic, "N").unwrap();

        let err = b.finish().unwrap_err();
        assert!(
            matches!(&err, BuildError::UnclosedClusters { open } if open == &["Y".to_string()])
        );
        assert_eq!(err.kind(), BuildErrorKind::Structural);
    }

    #[test]
    fn test_close_cluster_without_open_fails() {
        let mut b = builder();
        assert!(matches!(b.close_cluster(), Err(BuildError::NoOpenCluster)));
    }

    #[test]
    fn test_scoped_cluster_closes_itself() {
        let mut b = builder();
        let (prom, thanos) = b
            .cluster("Metrics Stack", |b| {
                let prom = b.add_node("prom", NodeCategory::TimeSeriesDb, "Prometheus")?;
                let thanos = b.add_node("thanos", NodeCategory::Storage, "Thanos Sidecar")?;
                Ok::<_, BuildError>((prom, thanos))
            })
            .unwrap();
        assert_eq!(b.depth(), 0);

        b.link(prom, thanos, EdgeStyle::new().with_line(LineStyle::Dashed)).unwrap();
        let diagram = b.finish().unwrap();
        assert_eq!(diagram.clusters()[0].nodes(), &[prom, thanos]);
        assert_eq!(
            diagram.edges()[0].style().direction(),
            EdgeDirection::Plain
        );
    }

    #[test]
    fn test_scoped_cluster_detects_leaked_cluster() {
        let mut b = builder();
        let err = b
            .cluster("Outer", |b| {
                b.open_cluster("Leaked");
                Ok::<_, BuildError>(())
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::UnbalancedCluster { label } if label == "Outer"));
        assert_eq!(b.depth(), 0);

        let diagram = b.finish().unwrap();
        assert!(diagram.clusters().is_empty());
    }

    #[test]
    fn test_scoped_cluster_propagates_errors() {
        let mut b = builder();
        let err = b
            .cluster("Broken", |b| b.add_node_by_name("x", "kafka", "Kafka"))
            .unwrap_err();
        assert_eq!(err.kind(), BuildErrorKind::UnsupportedCategory);
        assert_eq!(b.node_count(), 0);
        assert_eq!(b.depth(), 0);

        let diagram = b.finish().unwrap();
        assert!(diagram.clusters().is_empty());
    }

    #[test]
    fn test_failed_scoped_cluster_discards_partial_work() {
        let mut b = builder();
        let clients = b
            .add_node("clients", NodeCategory::MobileClient, "Clients")
            .unwrap();
        let outer = b.open_cluster("Node 1");

        let err = b
            .cluster("Metrics Stack", |b| {
                let prom = b.add_node("prom", NodeCategory::TimeSeriesDb, "Prometheus")?;
                b.connect(clients, prom, EdgeStyle::new())?;
                b.cluster("Inner", |b| {
                    b.add_node("sidecar", NodeCategory::Storage, "Sidecar")
                })?;
                b.connect(prom, Id::new("missing"), EdgeStyle::new())
            })
            .unwrap_err();
        assert!(matches!(err, BuildError::UnknownNode { .. }));
        assert_eq!(b.depth(), 1);
        assert_eq!(b.node_count(), 1);
        assert_eq!(b.edge_count(), 0);
        assert!(!b.contains(Id::new("prom")));

        b.add_node("keepalived", NodeCategory::Blank, "Keepalived").unwrap();
        b.close_cluster().unwrap();
        let diagram = b.finish().unwrap();

        assert_eq!(diagram.clusters().len(), 1);
        assert!(diagram.clusters()[outer.get()].children().is_empty());
        assert_eq!(
            diagram.clusters()[outer.get()].nodes(),
            &[Id::new("keepalived")]
        );
        let roots: Vec<_> = diagram.root_clusters().map(Cluster::index).collect();
        assert_eq!(roots, vec![outer]);
    }

    #[test]
    fn test_add_node_by_name() {
        let mut b = builder();
        let loki = b.add_node_by_name("loki", "loki", "Loki\n:3100").unwrap();
        let diagram = b.finish().unwrap();
        assert_eq!(
            diagram.node(loki).map(Node::category),
            Some(NodeCategory::Logging)
        );
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let mut b = builder();
        let minio = b.add_node("minio", NodeCategory::Storage, "MinIO").unwrap();
        let bucket = b.add_node("bucket", NodeCategory::Storage, "Bucket").unwrap();
        let style = EdgeStyle::new().with_label("Erasure\nCoding");
        b.connect(minio, bucket, style.clone()).unwrap();
        b.connect(minio, bucket, style).unwrap();

        assert_eq!(b.finish().unwrap().edges().len(), 2);
    }
}
