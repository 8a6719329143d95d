//! The diagram model.
//!
//! These types are the closed, immutable result of a build pass: a
//! [`Diagram`] owns its [`Node`]s, [`Cluster`]s and [`Edge`]s in declaration
//! order together with the [`DiagramAttributes`] that drive rendering.
//!
//! # Pipeline Position
//!
//! ```text
//! DiagramBuilder (declarations)
//!     ↓ finish
//! Diagram (these types)
//!     ↓ export
//! DOT graph
//!     ↓ render
//! Image file
//! ```

use std::{fmt, str::FromStr};

use log::trace;
use serde::Deserialize;

use crate::{category::NodeCategory, color::Color, identifier::Id, style::EdgeStyle};

/// Position of a cluster in [`Diagram::clusters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterIndex(usize);

impl ClusterIndex {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A labeled component of the diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    label: String,
    category: NodeCategory,
    cluster: Option<ClusterIndex>,
}

impl Node {
    /// Creates a node. `cluster` is the innermost enclosing cluster, if any.
    pub fn new(
        id: Id,
        label: impl Into<String>,
        category: NodeCategory,
        cluster: Option<ClusterIndex>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            category,
            cluster,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Display text; may contain line breaks.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// Innermost cluster enclosing this node, `None` for top-level nodes.
    pub fn cluster(&self) -> Option<ClusterIndex> {
        self.cluster
    }
}

/// A named visual grouping of nodes and nested clusters.
///
/// A cluster's parent is always declared before it, so
/// `parent.get() < index.get()` holds for every cluster and the parent links
/// form a tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    index: ClusterIndex,
    label: String,
    parent: Option<ClusterIndex>,
    nodes: Vec<Id>,
    children: Vec<ClusterIndex>,
}

impl Cluster {
    pub fn new(
        index: ClusterIndex,
        label: impl Into<String>,
        parent: Option<ClusterIndex>,
        nodes: Vec<Id>,
        children: Vec<ClusterIndex>,
    ) -> Self {
        Self {
            index,
            label: label.into(),
            parent,
            nodes,
            children,
        }
    }

    pub fn index(&self) -> ClusterIndex {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn parent(&self) -> Option<ClusterIndex> {
        self.parent
    }

    /// Nodes declared directly inside this cluster, in declaration order.
    pub fn nodes(&self) -> &[Id] {
        &self.nodes
    }

    /// Clusters opened directly inside this cluster, in declaration order.
    pub fn children(&self) -> &[ClusterIndex] {
        &self.children
    }
}

/// A styled connector between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: Id,
    target: Id,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(source: Id, target: Id, style: EdgeStyle) -> Self {
        Self {
            source,
            target,
            style,
        }
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn style(&self) -> &EdgeStyle {
        &self.style
    }
}

/// Layout direction of the rendered graph.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Direction {
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    /// Returns the Graphviz `rankdir` value.
    pub fn to_dot_value(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::BottomTop => "BT",
            Self::LeftRight => "LR",
            Self::RightLeft => "RL",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TB" => Ok(Self::TopBottom),
            "BT" => Ok(Self::BottomTop),
            "LR" => Ok(Self::LeftRight),
            "RL" => Ok(Self::RightLeft),
            _ => Err(format!(
                "invalid direction `{s}`, valid values: TB, BT, LR, RL"
            )),
        }
    }
}

/// File format of the rendered artifact.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Svg,
    Pdf,
    /// Graphviz source, written without invoking Graphviz
    Dot,
}

impl OutputFormat {
    /// File extension, without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Svg => "svg",
            Self::Pdf => "pdf",
            Self::Dot => "dot",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            "svg" => Ok(Self::Svg),
            "pdf" => Ok(Self::Pdf),
            "dot" | "gv" => Ok(Self::Dot),
            _ => Err(format!(
                "unsupported output format `{s}`, valid values: png, jpg, svg, pdf, dot"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Font face and point size.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    name: String,
    size: f32,
}

impl Font {
    pub fn new(name: impl Into<String>, size: f32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> f32 {
        self.size
    }
}

/// Rendering metadata of a diagram: title, output naming and style defaults.
///
/// Defaults mirror a left-to-right PNG with "Sans-Serif" text, 15pt titles
/// and 13pt node and edge labels.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramAttributes {
    title: String,
    filename: String,
    format: OutputFormat,
    direction: Direction,
    graph_font: Font,
    node_font: Font,
    edge_font: Font,
    background_color: Option<Color>,
    cluster_color: Option<Color>,
    edge_color: Option<Color>,
    pad: f32,
}

impl DiagramAttributes {
    /// Creates attributes for a diagram titled `title`.
    ///
    /// The output file stem is derived from the title: lowercased with
    /// whitespace replaced by underscores.
    ///
    /// ```
    /// use armillary_core::model::DiagramAttributes;
    ///
    /// let attributes = DiagramAttributes::new("OpenTelemetry HA Infrastructure");
    /// assert_eq!(attributes.filename(), "opentelemetry_ha_infrastructure");
    /// ```
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        let filename = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        Self {
            title,
            filename,
            format: OutputFormat::default(),
            direction: Direction::default(),
            graph_font: Font::new("Sans-Serif", 15.0),
            node_font: Font::new("Sans-Serif", 13.0),
            edge_font: Font::new("Sans-Serif", 13.0),
            background_color: None,
            cluster_color: None,
            edge_color: None,
            pad: 2.0,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_graph_font(mut self, font: Font) -> Self {
        self.graph_font = font;
        self
    }

    pub fn with_node_font(mut self, font: Font) -> Self {
        self.node_font = font;
        self
    }

    pub fn with_edge_font(mut self, font: Font) -> Self {
        self.edge_font = font;
        self
    }

    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = Some(color);
        self
    }

    /// Sets the fill used behind clusters; nested clusters get a deeper tint.
    pub fn with_cluster_color(mut self, color: Color) -> Self {
        self.cluster_color = Some(color);
        self
    }

    /// Sets the color of edges that do not carry their own.
    pub fn with_edge_color(mut self, color: Color) -> Self {
        self.edge_color = Some(color);
        self
    }

    /// Sets the margin around the drawing, in inches.
    pub fn with_pad(mut self, pad: f32) -> Self {
        self.pad = pad;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Output file stem, without extension.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn graph_font(&self) -> &Font {
        &self.graph_font
    }

    pub fn node_font(&self) -> &Font {
        &self.node_font
    }

    pub fn edge_font(&self) -> &Font {
        &self.edge_font
    }

    pub fn background_color(&self) -> Option<Color> {
        self.background_color
    }

    pub fn cluster_color(&self) -> Option<Color> {
        self.cluster_color
    }

    pub fn edge_color(&self) -> Option<Color> {
        self.edge_color
    }

    pub fn pad(&self) -> f32 {
        self.pad
    }

    /// File name of the rendered artifact: stem plus format extension.
    pub fn output_file_name(&self) -> String {
        format!("{}.{}", self.filename, self.format.extension())
    }
}

/// A closed diagram, ready to be exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    attributes: DiagramAttributes,
    nodes: Vec<Node>,
    clusters: Vec<Cluster>,
    edges: Vec<Edge>,
}

impl Diagram {
    /// Assembles a diagram from its parts, each in declaration order.
    pub fn new(
        attributes: DiagramAttributes,
        nodes: Vec<Node>,
        clusters: Vec<Cluster>,
        edges: Vec<Edge>,
    ) -> Self {
        trace!(
            title = attributes.title(),
            nodes = nodes.len(),
            clusters = clusters.len(),
            edges = edges.len();
            "Assembled diagram"
        );
        Self {
            attributes,
            nodes,
            clusters,
            edges,
        }
    }

    pub fn attributes(&self) -> &DiagramAttributes {
        &self.attributes
    }

    /// Every node, in declaration order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Every cluster, in declaration order; `clusters()[i].index().get() == i`.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Every edge, in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node by id.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    pub fn cluster(&self, index: ClusterIndex) -> Option<&Cluster> {
        self.clusters.get(index.get())
    }

    /// Nodes declared outside of any cluster.
    pub fn top_level_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.cluster().is_none())
    }

    /// Clusters declared outside of any cluster.
    pub fn root_clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters
            .iter()
            .filter(|cluster| cluster.parent().is_none())
    }

    /// Labels of the clusters enclosing `id`, outermost first.
    ///
    /// Empty for top-level nodes and unknown ids.
    pub fn cluster_path(&self, id: Id) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self.node(id).and_then(Node::cluster);
        while let Some(cluster) = current.and_then(|index| self.cluster(index)) {
            path.push(cluster.label());
            current = cluster.parent();
        }
        path.reverse();
        path
    }
}
