//! Built-in deployment topologies.
//!
//! Both topologies describe the same two-node high-availability pipeline:
//! clients reach a keepalived virtual IP, HAProxy forwards OTLP to an
//! OpenTelemetry aggregator, metrics flow through Prometheus and a Thanos
//! sidecar, logs through Loki, and everything lands in a distributed MinIO
//! cluster. [`Topology::Thanos`] adds a global Thanos tier and Grafana on
//! top of it.

use std::fmt;

use clap::ValueEnum;
use log::debug;

use armillary::{
    ArmillaryError, DiagramBuilder,
    category::NodeCategory,
    color::Color,
    identifier::Id,
    model::{DiagramAttributes, Direction, Font, OutputFormat},
    style::{EdgeDirection, EdgeStyle, LineStyle},
};

/// A diagram shipped with the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// The HA pipeline with per-node Thanos sidecars.
    Basic,
    /// The HA pipeline plus Thanos Receive, Query, Store Gateway, Compactor
    /// and Grafana.
    Thanos,
}

/// Which topologies a run renders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopologySelection {
    Basic,
    Thanos,
    #[default]
    All,
}

impl TopologySelection {
    pub fn topologies(self) -> &'static [Topology] {
        match self {
            Self::Basic => &[Topology::Basic],
            Self::Thanos => &[Topology::Thanos],
            Self::All => &[Topology::Basic, Topology::Thanos],
        }
    }
}

impl fmt::Display for TopologySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Basic => "basic",
            Self::Thanos => "thanos",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

impl Topology {
    pub fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Thanos => "thanos",
        }
    }

    /// Rendering attributes embedded for this topology.
    pub fn attributes(self) -> Result<DiagramAttributes, ArmillaryError> {
        let (title, filename) = match self {
            Self::Basic => ("OpenTelemetry HA Infrastructure", "otel-infrastructure"),
            Self::Thanos => (
                "OpenTelemetry HA Infrastructure with Thanos",
                "otel-infrastructure-thanos",
            ),
        };
        let white = Color::new("white").map_err(ArmillaryError::Style)?;
        let attributes = DiagramAttributes::new(title)
            .with_filename(filename)
            .with_format(OutputFormat::Png)
            .with_direction(Direction::TopBottom)
            .with_graph_font(Font::new("Sans-Serif Bold", 20.0))
            .with_node_font(Font::new("Sans-Serif Bold", 14.0))
            .with_edge_font(Font::new("Sans-Serif", 12.0))
            .with_background_color(white)
            .with_pad(0.5);
        Ok(attributes)
    }

    /// Declares every node, cluster and edge of this topology.
    ///
    /// The returned builder has no open cluster and is ready to be closed.
    pub fn declare(self, attributes: DiagramAttributes) -> Result<DiagramBuilder, ArmillaryError> {
        let palette = Palette::new()?;
        let mut builder = DiagramBuilder::new(attributes);

        let pipeline = declare_pipeline(&mut builder, &palette)?;
        if self == Self::Thanos {
            declare_thanos_tier(&mut builder, &palette, &pipeline)?;
        }

        debug!(
            topology = self.name(),
            nodes = builder.node_count(),
            edges = builder.edge_count();
            "Topology declared"
        );
        Ok(builder)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge colors used across both topologies.
struct Palette {
    blue: Color,
    red: Color,
    green: Color,
    orange: Color,
    purple: Color,
    brown: Color,
}

impl Palette {
    fn new() -> Result<Self, ArmillaryError> {
        let color = |name: &str| Color::new(name).map_err(ArmillaryError::Style);
        Ok(Self {
            blue: color("blue")?,
            red: color("red")?,
            green: color("green")?,
            orange: color("orange")?,
            purple: color("purple")?,
            brown: color("brown")?,
        })
    }
}

fn edge(label: &str, color: Color) -> EdgeStyle {
    EdgeStyle::new().with_label(label).with_color(color)
}

/// Placement of one HA node.
struct HaNodeSpec {
    index: u8,
    address: &'static str,
    role: &'static str,
    priority: u8,
}

const HA_NODES: [HaNodeSpec; 2] = [
    HaNodeSpec {
        index: 1,
        address: "192.168.110.214",
        role: "MASTER",
        priority: 100,
    },
    HaNodeSpec {
        index: 2,
        address: "192.168.110.119",
        role: "BACKUP",
        priority: 90,
    },
];

/// Handles of the components running on one HA node.
struct HaNode {
    keepalived: Id,
    haproxy: Id,
    otel: Id,
    prometheus: Id,
    sidecar: Id,
    loki: Id,
    minio: Id,
}

/// Handles the Thanos tier connects to.
struct Pipeline {
    nodes: Vec<HaNode>,
    metrics_bucket: Id,
}

fn declare_ha_node(b: &mut DiagramBuilder, spec: &HaNodeSpec) -> Result<HaNode, ArmillaryError> {
    let n = spec.index;
    let label = format!("Node {n} ({}) - {}", spec.address, spec.role);

    b.cluster(label, |b| {
        let (keepalived, haproxy) = b.cluster("Load Balancing", |b| {
            let keepalived = b.add_node(
                &format!("node{n}-keepalived"),
                NodeCategory::Blank,
                format!("Keepalived\nPriority: {}", spec.priority),
            )?;
            let haproxy = b.add_node(
                &format!("node{n}-haproxy"),
                NodeCategory::LoadBalancer,
                "HAProxy\n:4318",
            )?;
            Ok::<_, ArmillaryError>((keepalived, haproxy))
        })?;

        let otel = b.add_node(
            &format!("node{n}-otel"),
            NodeCategory::Service,
            "OTel Aggregator\n:14318",
        )?;

        let (prometheus, sidecar) = b.cluster("Metrics Stack", |b| {
            let prometheus = b.add_node(
                &format!("node{n}-prometheus"),
                NodeCategory::TimeSeriesDb,
                "Prometheus\n:9090",
            )?;
            let sidecar = b.add_node(
                &format!("node{n}-thanos-sidecar"),
                NodeCategory::Storage,
                "Thanos Sidecar\n:10901/10902",
            )?;
            Ok::<_, ArmillaryError>((prometheus, sidecar))
        })?;

        let loki = b.add_node(
            &format!("node{n}-loki"),
            NodeCategory::Logging,
            "Loki\n:3100",
        )?;

        let minio = b.cluster(format!("Object Storage Node {n}"), |b| {
            b.add_node(
                &format!("node{n}-minio"),
                NodeCategory::Storage,
                format!("MinIO Node {n}\n:9000\n/data1 + /data2"),
            )
        })?;

        Ok(HaNode {
            keepalived,
            haproxy,
            otel,
            prometheus,
            sidecar,
            loki,
            minio,
        })
    })
}

fn declare_pipeline(b: &mut DiagramBuilder, palette: &Palette) -> Result<Pipeline, ArmillaryError> {
    let clients = b.add_node("clients", NodeCategory::MobileClient, "External\nClients")?;
    let vip = b.add_node("vip", NodeCategory::Blank, "VIP\n192.168.110.140")?;

    let nodes = HA_NODES
        .iter()
        .map(|spec| declare_ha_node(b, spec))
        .collect::<Result<Vec<_>, _>>()?;

    let (metrics_bucket, logs_bucket) = b.cluster("MinIO Distributed Cluster", |b| {
        let metrics = b.add_node(
            "bucket-thanos-metrics",
            NodeCategory::Storage,
            "Bucket:\nthanos-metrics",
        )?;
        let logs = b.add_node(
            "bucket-loki-data",
            NodeCategory::Storage,
            "Bucket:\nloki-data",
        )?;
        Ok::<_, ArmillaryError>((metrics, logs))
    })?;

    b.connect(
        clients,
        vip,
        edge("OTLP/HTTP", palette.blue).with_line(LineStyle::Bold),
    )?;
    for node in &nodes {
        b.connect(vip, node.keepalived, edge("VRRP", palette.red))?;
    }
    for node in &nodes {
        b.link(
            node.keepalived,
            node.haproxy,
            EdgeStyle::new().with_color(palette.red),
        )?;
    }
    for node in &nodes {
        b.connect(node.haproxy, node.otel, edge("Forward", palette.blue))?;
    }
    for node in &nodes {
        b.connect(node.otel, node.prometheus, edge("Metrics", palette.green))?;
        b.connect(node.otel, node.loki, edge("Logs", palette.orange))?;
    }
    for node in &nodes {
        b.link(
            node.prometheus,
            node.sidecar,
            edge("Scrape", palette.green).with_line(LineStyle::Dashed),
        )?;
    }
    for node in &nodes {
        b.connect(
            node.sidecar,
            metrics_bucket,
            edge("Upload", palette.purple).with_line(LineStyle::Bold),
        )?;
    }
    for node in &nodes {
        b.connect(
            node.loki,
            logs_bucket,
            edge("Store", palette.orange).with_line(LineStyle::Bold),
        )?;
    }
    let erasure = edge("Erasure\nCoding", palette.brown).with_line(LineStyle::Bold);
    for node in &nodes {
        b.connect(node.minio, metrics_bucket, erasure.clone())?;
        b.connect(node.minio, logs_bucket, erasure.clone())?;
    }
    for pair in nodes.windows(2) {
        b.link(
            pair[0].minio,
            pair[1].minio,
            edge("Distributed\nCluster", palette.brown).with_line(LineStyle::Dotted),
        )?;
    }

    Ok(Pipeline {
        nodes,
        metrics_bucket,
    })
}

fn declare_thanos_tier(
    b: &mut DiagramBuilder,
    palette: &Palette,
    pipeline: &Pipeline,
) -> Result<(), ArmillaryError> {
    let (receive, query, gateway, compactor) = b.cluster("Thanos Global View", |b| {
        let receive = b.cluster("Ingestion", |b| {
            b.add_node(
                "thanos-receive",
                NodeCategory::Service,
                "Thanos Receive\n:10908",
            )
        })?;
        let (query, gateway) = b.cluster("Query", |b| {
            let query = b.add_node(
                "thanos-query",
                NodeCategory::Service,
                "Thanos Query\n:10904",
            )?;
            let gateway = b.add_node(
                "thanos-store-gateway",
                NodeCategory::Service,
                "Thanos Store Gateway\n:10906",
            )?;
            Ok::<_, ArmillaryError>((query, gateway))
        })?;
        let compactor = b.cluster("Compaction", |b| {
            b.add_node(
                "thanos-compactor",
                NodeCategory::Service,
                "Thanos Compactor",
            )
        })?;
        Ok::<_, ArmillaryError>((receive, query, gateway, compactor))
    })?;
    let grafana = b.add_node("grafana", NodeCategory::Dashboard, "Grafana\n:3000")?;

    let store_api = edge("StoreAPI", palette.purple).with_line(LineStyle::Dashed);
    let bucket = pipeline.metrics_bucket;

    for node in &pipeline.nodes {
        b.connect(node.otel, receive, edge("Remote\nWrite", palette.green))?;
    }
    b.connect(
        receive,
        bucket,
        edge("Upload", palette.purple).with_line(LineStyle::Bold),
    )?;
    for node in &pipeline.nodes {
        b.connect(query, node.sidecar, store_api.clone())?;
    }
    b.connect(query, receive, store_api.clone())?;
    b.connect(query, gateway, store_api)?;
    b.connect(gateway, bucket, edge("Read", palette.purple))?;
    b.connect(
        compactor,
        bucket,
        edge("Compact\nDownsample", palette.purple)
            .with_line(LineStyle::Dotted)
            .with_direction(EdgeDirection::Bidirectional),
    )?;
    b.connect(grafana, query, edge("PromQL", palette.green))?;
    for node in &pipeline.nodes {
        b.connect(grafana, node.loki, edge("LogQL", palette.orange))?;
    }
    Ok(())
}
