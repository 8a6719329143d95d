//! Translation of a [`Diagram`] into a Graphviz digraph.
//!
//! The output mirrors the model one to one: every cluster becomes a
//! `subgraph cluster_<index>` nested the same way as the cluster tree, every
//! node is emitted inside its innermost cluster, and every edge is emitted at
//! the top level in declaration order.

use dot_structures::{
    Attribute, Edge as DotEdge, EdgeTy, Graph, GraphAttributes, Id as DotId, Node as DotNode,
    NodeId, Stmt, Subgraph, Vertex,
};

use armillary_core::{
    category::NodeCategory,
    color::Color,
    identifier::Id,
    model::{Cluster, Diagram, DiagramAttributes, Edge, Node},
};

/// Cluster fills used by depth when the diagram does not set its own.
const CLUSTER_FILLS: [&str; 4] = ["#e5f5fd", "#ebf3e7", "#ece8f6", "#fdf7e3"];

const TEXT_COLOR: &str = "#2d3436";
const CLUSTER_BORDER: &str = "#aeb6be";
const DEFAULT_EDGE_COLOR: &str = "#7b8894";

/// Builds the Graphviz digraph for `diagram`.
pub fn to_dot(diagram: &Diagram) -> Graph {
    let attributes = diagram.attributes();

    let mut stmts = vec![
        Stmt::GAttribute(GraphAttributes::Graph(graph_attributes(attributes))),
        Stmt::GAttribute(GraphAttributes::Node(node_defaults(attributes))),
        Stmt::GAttribute(GraphAttributes::Edge(edge_defaults(attributes))),
    ];
    stmts.extend(diagram.top_level_nodes().map(node_stmt));
    stmts.extend(
        diagram
            .root_clusters()
            .map(|cluster| Stmt::Subgraph(cluster_subgraph(diagram, cluster, 0))),
    );
    stmts.extend(diagram.edges().iter().map(edge_stmt));

    Graph::DiGraph {
        id: quoted(attributes.filename()),
        strict: false,
        stmts,
    }
}

/// Quotes and escapes `text` as a DOT string.
///
/// Backslashes and double quotes are escaped; line breaks become `\n` so
/// multi-line labels survive as centered lines.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('"');
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            _ => escaped.push(ch),
        }
    }
    escaped.push('"');
    escaped
}

/// Graphviz `shape` and optional `style` used for a category.
pub fn category_shape(category: NodeCategory) -> (&'static str, Option<&'static str>) {
    match category {
        NodeCategory::Generic => ("box", None),
        NodeCategory::LoadBalancer => ("hexagon", None),
        NodeCategory::Storage => ("cylinder", None),
        NodeCategory::TimeSeriesDb => ("box3d", None),
        NodeCategory::Logging => ("note", None),
        NodeCategory::MobileClient => ("component", None),
        NodeCategory::Blank => ("plaintext", None),
        NodeCategory::Service => ("box", Some("rounded")),
        NodeCategory::Dashboard => ("tab", None),
    }
}

fn quoted(text: &str) -> DotId {
    DotId::Escaped(escape(text))
}

fn plain(value: impl ToString) -> DotId {
    DotId::Plain(value.to_string())
}

fn attr(key: &str, value: DotId) -> Attribute {
    Attribute(plain(key), value)
}

fn color_attr(key: &str, color: Color) -> Attribute {
    attr(key, quoted(&color.to_hex()))
}

fn graph_attributes(attributes: &DiagramAttributes) -> Vec<Attribute> {
    let font = attributes.graph_font();
    let mut attrs = Vec::new();
    if !attributes.title().is_empty() {
        attrs.push(attr("label", quoted(attributes.title())));
        attrs.push(attr("labelloc", plain("t")));
    }
    attrs.extend([
        attr("rankdir", plain(attributes.direction().to_dot_value())),
        attr("fontname", quoted(font.name())),
        attr("fontsize", plain(font.size())),
        attr("fontcolor", quoted(TEXT_COLOR)),
        attr("pad", plain(attributes.pad())),
        attr("nodesep", plain("0.60")),
        attr("ranksep", plain("0.75")),
        attr("compound", plain("true")),
    ]);
    if let Some(color) = attributes.background_color() {
        attrs.push(color_attr("bgcolor", color));
    }
    attrs
}

fn node_defaults(attributes: &DiagramAttributes) -> Vec<Attribute> {
    let font = attributes.node_font();
    vec![
        attr("shape", plain("box")),
        attr("fontname", quoted(font.name())),
        attr("fontsize", plain(font.size())),
        attr("fontcolor", quoted(TEXT_COLOR)),
        attr("margin", quoted("0.2,0.1")),
    ]
}

fn edge_defaults(attributes: &DiagramAttributes) -> Vec<Attribute> {
    let font = attributes.edge_font();
    let color = attributes
        .edge_color()
        .map(|color| color.to_hex())
        .unwrap_or_else(|| DEFAULT_EDGE_COLOR.to_string());
    vec![
        attr("fontname", quoted(font.name())),
        attr("fontsize", plain(font.size())),
        attr("fontcolor", quoted(TEXT_COLOR)),
        attr("color", quoted(&color)),
    ]
}

fn node_id(id: Id) -> NodeId {
    NodeId(quoted(&id.key()), None)
}

fn node_stmt(node: &Node) -> Stmt {
    let (shape, style) = category_shape(node.category());
    let mut attributes = vec![attr("label", quoted(node.label())), attr("shape", plain(shape))];
    if let Some(style) = style {
        attributes.push(attr("style", quoted(style)));
    }
    Stmt::Node(DotNode {
        id: node_id(node.id()),
        attributes,
    })
}

fn cluster_subgraph(diagram: &Diagram, cluster: &Cluster, depth: usize) -> Subgraph {
    let fill = diagram
        .attributes()
        .cluster_color()
        .map(|color| color.to_hex())
        .unwrap_or_else(|| CLUSTER_FILLS[depth % CLUSTER_FILLS.len()].to_string());
    let font = diagram.attributes().graph_font();

    let mut stmts = vec![
        Stmt::Attribute(attr("label", quoted(cluster.label()))),
        Stmt::Attribute(attr("labeljust", plain("l"))),
        Stmt::Attribute(attr("style", quoted("rounded,filled"))),
        Stmt::Attribute(attr("bgcolor", quoted(&fill))),
        Stmt::Attribute(attr("pencolor", quoted(CLUSTER_BORDER))),
        Stmt::Attribute(attr("fontname", quoted(font.name()))),
        Stmt::Attribute(attr("fontsize", plain(12))),
    ];
    stmts.extend(
        cluster
            .nodes()
            .iter()
            .filter_map(|id| diagram.node(*id))
            .map(node_stmt),
    );
    stmts.extend(
        cluster
            .children()
            .iter()
            .filter_map(|index| diagram.cluster(*index))
            .map(|child| Stmt::Subgraph(cluster_subgraph(diagram, child, depth + 1))),
    );

    Subgraph {
        id: plain(format!("cluster_{}", cluster.index())),
        stmts,
    }
}

fn edge_stmt(edge: &Edge) -> Stmt {
    let style = edge.style();
    let mut attributes = Vec::new();
    if let Some(label) = style.label() {
        attributes.push(attr("label", quoted(label)));
    }
    if let Some(color) = style.color() {
        attributes.push(color_attr("color", color));
    }
    attributes.push(attr("style", plain(style.line().to_dot_value())));
    attributes.push(attr("dir", plain(style.direction().to_dot_value())));

    Stmt::Edge(DotEdge {
        ty: EdgeTy::Pair(
            Vertex::N(node_id(edge.source())),
            Vertex::N(node_id(edge.target())),
        ),
        attributes,
    })
}
